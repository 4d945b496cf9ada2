// src/analyze/detector.rs
//! Scam classifier.
//!
//! Three keyword/pattern families are tested against the lower-cased text:
//! urgency, financial and link. A message is a scam when it carries a link,
//! or when urgency and money appear together. Confidence and category are
//! derived from the same flags, so `classify` is a pure function of its input.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::lexicon::{contains_any, FINANCIAL_WORDS, URGENCY_WORDS};

static LINK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"https?://", r"www\."]
        .iter()
        .map(|p| Regex::new(p).expect("link pattern"))
        .collect()
});

/// Coarse classifier certainty; drives the engagement stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScamCategory {
    UpiFraud,
    Phishing,
    AccountThreat,
    SocialEngineering,
    Unknown,
}

impl ScamCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScamCategory::UpiFraud => "UPI_FRAUD",
            ScamCategory::Phishing => "PHISHING",
            ScamCategory::AccountThreat => "ACCOUNT_THREAT",
            ScamCategory::SocialEngineering => "SOCIAL_ENGINEERING",
            ScamCategory::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ScamCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence tags, appended in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    UrgencyLanguage,
    AccountThreat,
    PaymentRedirection,
    PhishingLink,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::UrgencyLanguage => "urgency_language",
            Signal::AccountThreat => "account_threat",
            Signal::PaymentRedirection => "payment_redirection",
            Signal::PhishingLink => "phishing_link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub scam_detected: bool,
    pub confidence: Confidence,
    pub category: ScamCategory,
    pub signals: Vec<Signal>,
}

impl Default for DetectionResult {
    fn default() -> Self {
        Self {
            scam_detected: false,
            confidence: Confidence::Low,
            category: ScamCategory::Unknown,
            signals: Vec::new(),
        }
    }
}

impl DetectionResult {
    pub fn has_signal(&self, s: Signal) -> bool {
        self.signals.contains(&s)
    }
}

/// Classify one inbound message. Never fails; blank text is "no scam".
pub fn classify(text: &str) -> DetectionResult {
    if text.trim().is_empty() {
        return DetectionResult::default();
    }

    let lower = text.to_lowercase();

    let urgency = contains_any(&lower, URGENCY_WORDS);
    let financial = contains_any(&lower, FINANCIAL_WORDS);
    let link = LINK_PATTERNS.iter().any(|re| re.is_match(&lower));
    let mentions_account = lower.contains("account");

    let mut signals = Vec::with_capacity(4);
    if urgency {
        signals.push(Signal::UrgencyLanguage);
    }
    if mentions_account {
        signals.push(Signal::AccountThreat);
    }
    if financial {
        signals.push(Signal::PaymentRedirection);
    }
    if link {
        signals.push(Signal::PhishingLink);
    }

    let confidence = if link && urgency && financial {
        Confidence::High
    } else if urgency && financial {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    let category = if lower.contains("upi") {
        ScamCategory::UpiFraud
    } else if link {
        ScamCategory::Phishing
    } else if mentions_account {
        ScamCategory::AccountThreat
    } else {
        ScamCategory::Unknown
    };

    DetectionResult {
        scam_detected: link || (urgency && financial),
        confidence,
        category,
        signals,
    }
}
