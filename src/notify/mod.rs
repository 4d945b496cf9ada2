//! Intelligence callback: report shape, sink trait and the once-per-session dispatcher.

pub mod callback;
pub mod dispatcher;

use serde::{Deserialize, Serialize};

use crate::analyze::ExtractionResult;

pub use callback::HttpCallbackNotifier;
pub use dispatcher::CallbackDispatcher;

/// Body POSTed to the collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceReport {
    pub session_id: String,
    pub scam_detected: bool,
    pub total_messages_exchanged: usize,
    pub extracted_intelligence: ExtractionResult,
    pub agent_notes: String,
}

/// Outcome of a single best-effort delivery. Logged and discarded by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { status: u16 },
    Failed { reason: String },
    /// No sink configured.
    Disabled,
}

impl DeliveryOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryOutcome::Delivered { .. } => "delivered",
            DeliveryOutcome::Failed { .. } => "failed",
            DeliveryOutcome::Disabled => "disabled",
        }
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Single attempt. Must not panic; failures come back as `DeliveryOutcome::Failed`.
    async fn deliver(&self, report: &IntelligenceReport) -> DeliveryOutcome;
}
