// src/analyze/mod.rs
//! Analysis pipeline entry: classify a message and extract its intelligence.

pub mod detector;
pub mod extractor;
pub mod lexicon;

use serde::Serialize;

// Re-export convenient types.
pub use crate::analyze::detector::{classify, Confidence, DetectionResult, ScamCategory, Signal};
pub use crate::analyze::extractor::{extract, ExtractionResult};

/// Both views of one inbound message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageAnalysis {
    pub detection: DetectionResult,
    pub extraction: ExtractionResult,
}

/// Run detector and extractor over the same text. Pure; no session state.
pub fn analyze_message(text: &str) -> MessageAnalysis {
    MessageAnalysis {
        detection: classify(text),
        extraction: extract(text),
    }
}
