//! models.rs: wire shapes of the `/honeypot` endpoint.

use serde::{Deserialize, Serialize};

use crate::analyze::ExtractionResult;
use crate::engine::{EngagementMetrics, EngagementOutcome};
use crate::session::Message;

/// Inbound request. Only `sessionId` and `message.text` drive the pipeline;
/// history and metadata are accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoneypotRequest {
    pub session_id: String,
    #[serde(default)]
    pub message: Message,
    #[serde(default)]
    pub conversation_history: Vec<Message>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoneypotResponse {
    pub status: &'static str,
    /// Session-cumulative flag.
    pub scam_detected: bool,
    pub engagement_metrics: EngagementMetrics,
    pub extracted_intelligence: ExtractionResult,
    pub agent_notes: String,
    pub reply: String,
}

impl From<EngagementOutcome> for HoneypotResponse {
    fn from(out: EngagementOutcome) -> Self {
        let engagement_metrics = out.metrics();
        Self {
            status: "success",
            scam_detected: out.session.detected,
            engagement_metrics,
            extracted_intelligence: out.extraction,
            agent_notes: out.reply.clone(),
            reply: out.reply,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub detail: &'static str,
}

impl ErrorResponse {
    pub fn new(detail: &'static str) -> Self {
        Self {
            status: "error",
            detail,
        }
    }
}
