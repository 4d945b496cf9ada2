// src/analyze/extractor.rs
//! Intelligence extraction.
//!
//! Hard entities (account numbers, UPI handles, links, phone numbers) are pulled
//! with regexes from the original-case text. Soft fields (keywords, brand,
//! urgency indicators, tactics) are vocabulary hits on the lower-cased text.
//! Lists keep first-occurrence order and are not deduplicated.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::lexicon::{
    contains_any, matches_in, ATTACK_TACTICS, BRAND_KEYWORDS, SUSPICIOUS_KEYWORDS, URGENCY_WORDS,
};

/// Chars kept in `messageSample` before truncation.
pub const SAMPLE_MAX_CHARS: usize = 120;
pub const SAMPLE_ELLIPSIS: &str = "...";

static BANK_ACCOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{9,18}\b").expect("bank account regex"));
static UPI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[\w.-]+@[\w.-]+\b").expect("upi regex"));
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("link regex"));
// `\b` after the digits rejects an 11th digit.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+91\d{10}\b").expect("phone regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub bank_accounts: Vec<String>,
    pub upi_ids: Vec<String>,
    pub phishing_links: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub suspicious_keywords: Vec<String>,
    pub impersonated_bank: Option<String>,
    pub urgency_indicators: Vec<String>,
    pub attack_tactics: Vec<String>,
    pub message_sample: String,
}

impl ExtractionResult {
    /// True when any hard entity was found. Soft fields alone never count.
    pub fn has_intelligence(&self) -> bool {
        !(self.bank_accounts.is_empty()
            && self.upi_ids.is_empty()
            && self.phishing_links.is_empty()
            && self.phone_numbers.is_empty())
    }
}

/// Extract structured intelligence from one message. Never fails.
pub fn extract(text: &str) -> ExtractionResult {
    if text.is_empty() {
        return ExtractionResult::default();
    }

    let lower = text.to_lowercase();

    let attack_tactics = ATTACK_TACTICS
        .iter()
        .filter(|(_, words)| contains_any(&lower, words))
        .map(|(tag, _)| tag.to_string())
        .collect();

    ExtractionResult {
        bank_accounts: find_all(&BANK_ACCOUNT_RE, text),
        upi_ids: find_all(&UPI_RE, text),
        phishing_links: find_all(&LINK_RE, text),
        phone_numbers: find_all(&PHONE_RE, text),
        suspicious_keywords: owned(matches_in(&lower, SUSPICIOUS_KEYWORDS)),
        impersonated_bank: BRAND_KEYWORDS
            .iter()
            .find(|b| lower.contains(*b))
            .map(|b| b.to_string()),
        urgency_indicators: owned(matches_in(&lower, URGENCY_WORDS)),
        attack_tactics,
        message_sample: message_sample(text),
    }
}

/// First `SAMPLE_MAX_CHARS` chars, plus an ellipsis when the text was longer.
pub fn message_sample(text: &str) -> String {
    match text.char_indices().nth(SAMPLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}{SAMPLE_ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

fn find_all(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

fn owned(words: Vec<&str>) -> Vec<String> {
    words.into_iter().map(str::to_string).collect()
}
