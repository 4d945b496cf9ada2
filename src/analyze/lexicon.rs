//! Keyword vocabularies shared by the detector and the extractor.
//!
//! All entries are lower-case; callers match them against lower-cased text
//! with plain substring search.

/// Pressure words: the scammer wants the target to act before thinking.
pub const URGENCY_WORDS: &[&str] = &[
    "urgent",
    "immediately",
    "asap",
    "blocked",
    "suspended",
    "verify",
    "action required",
];

/// Words that put money or banking on the table.
pub const FINANCIAL_WORDS: &[&str] = &[
    "payment", "transfer", "deposit", "upi", "account", "bank", "refund",
];

/// Reported back as `suspiciousKeywords`, in this order.
pub const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "urgent",
    "verify",
    "blocked",
    "suspended",
    "limited",
    "action required",
];

/// Brand keywords in priority order; the first hit is the impersonated brand.
pub const BRAND_KEYWORDS: &[&str] = &[
    "sbi", "hdfc", "icici", "axis", "kotak", "bank", "upi", "paytm", "gpay", "phonepe",
];

/// Tactic tag plus the keywords that reveal it.
pub const ATTACK_TACTICS: &[(&str, &[&str])] = &[
    ("account_threat", &["blocked", "suspended", "freeze"]),
    ("credential_harvest", &["verify", "update", "confirm"]),
    ("payment_redirection", &["send", "transfer", "pay"]),
];

/// Words from `vocab` that occur in `lower`, in vocabulary order.
pub fn matches_in<'a>(lower: &str, vocab: &[&'a str]) -> Vec<&'a str> {
    vocab.iter().copied().filter(|w| lower.contains(w)).collect()
}

pub fn contains_any(lower: &str, vocab: &[&str]) -> bool {
    vocab.iter().any(|w| lower.contains(w))
}
