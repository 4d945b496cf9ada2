use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{DeliveryOutcome, IntelligenceReport, Notifier};
use crate::analyze::{DetectionResult, ExtractionResult};
use crate::logging::anon_hash;
use crate::metrics;
use crate::session::SessionStore;

pub const DEFAULT_MIN_MESSAGES: usize = 3;

/// Sends at most one intelligence report per session.
///
/// Eligibility and latch consumption happen in one step inside the session
/// store; only the winner builds a report. Delivery runs on a spawned task so
/// the reply path never waits for the sink.
#[derive(Clone)]
pub struct CallbackDispatcher {
    sink: Arc<dyn Notifier>,
    store: Arc<SessionStore>,
    min_messages: usize,
}

impl CallbackDispatcher {
    pub fn new(sink: Arc<dyn Notifier>, store: Arc<SessionStore>) -> Self {
        Self {
            sink,
            store,
            min_messages: DEFAULT_MIN_MESSAGES,
        }
    }

    /// Message count that makes a detected session eligible without hard entities.
    pub fn with_min_messages(mut self, n: usize) -> Self {
        self.min_messages = n.max(1);
        self
    }

    pub fn min_messages(&self) -> usize {
        self.min_messages
    }

    /// Claim the session's latch if eligible and build the report. Synchronous;
    /// returns `None` for every caller except the single winner.
    pub fn claim(
        &self,
        session_id: &str,
        extraction: &ExtractionResult,
        agent_notes: String,
    ) -> Option<IntelligenceReport> {
        let snap = self.store.claim_callback(
            session_id,
            extraction.has_intelligence(),
            self.min_messages,
        )?;
        Some(IntelligenceReport {
            session_id: snap.session_id,
            scam_detected: true,
            total_messages_exchanged: snap.messages.len(),
            extracted_intelligence: extraction.clone(),
            agent_notes,
        })
    }

    /// Fire-and-forget dispatch. The returned handle may be dropped; awaiting it
    /// only exposes the logged outcome.
    pub fn maybe_dispatch(
        &self,
        session_id: &str,
        extraction: &ExtractionResult,
        agent_notes: String,
    ) -> Option<JoinHandle<DeliveryOutcome>> {
        let report = self.claim(session_id, extraction, agent_notes)?;
        let sink = Arc::clone(&self.sink);
        Some(tokio::spawn(async move { deliver_and_log(sink.as_ref(), &report).await }))
    }
}

async fn deliver_and_log(sink: &dyn Notifier, report: &IntelligenceReport) -> DeliveryOutcome {
    let id = anon_hash(&report.session_id);
    let outcome = sink.deliver(report).await;
    match &outcome {
        DeliveryOutcome::Delivered { status } => info!(
            target: "callback",
            %id, status, total = report.total_messages_exchanged,
            "intelligence report delivered"
        ),
        DeliveryOutcome::Failed { reason } => {
            warn!(target: "callback", %id, %reason, "intelligence report lost")
        }
        DeliveryOutcome::Disabled => {
            info!(target: "callback", %id, "callback sink disabled; report dropped")
        }
    }
    metrics::record_callback(&outcome);
    outcome
}

/// Free-text summary for `agentNotes`.
pub fn agent_notes(detection: &DetectionResult, extraction: &ExtractionResult, reply: &str) -> String {
    let signals = detection
        .signals
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let mut notes = format!(
        "Category {}; confidence {}; signals [{}]",
        detection.category,
        detection.confidence.as_str(),
        signals
    );

    if !extraction.attack_tactics.is_empty() {
        notes.push_str(&format!("; tactics [{}]", extraction.attack_tactics.join(", ")));
    }
    if let Some(bank) = &extraction.impersonated_bank {
        notes.push_str(&format!("; impersonating {bank}"));
    }
    notes.push_str(&format!("; last reply: {reply}"));
    notes
}
