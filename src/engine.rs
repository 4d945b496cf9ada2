//! engine.rs: per-message orchestration.
//!
//! Wires detector, extractor, session store, reply policy and callback
//! dispatcher for one inbound message. The reply is computed before the
//! callback is spawned and never depends on its outcome.

use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyze::{self, DetectionResult, ExtractionResult};
use crate::config::HoneypotConfig;
use crate::logging::anon_hash;
use crate::metrics;
use crate::notify::dispatcher::agent_notes;
use crate::notify::{CallbackDispatcher, HttpCallbackNotifier, Notifier};
use crate::reply;
use crate::session::{Message, SessionSnapshot, SessionStore};

/// Everything the HTTP layer needs to answer one message.
#[derive(Debug, Clone)]
pub struct EngagementOutcome {
    pub detection: DetectionResult,
    pub extraction: ExtractionResult,
    pub session: SessionSnapshot,
    pub reply: String,
    /// True when this message won the session's callback latch.
    pub callback_dispatched: bool,
}

/// Session-level view returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    pub engagement_duration_seconds: u64,
    pub total_messages_exchanged: usize,
}

impl EngagementOutcome {
    pub fn metrics(&self) -> EngagementMetrics {
        EngagementMetrics {
            engagement_duration_seconds: self.session.engagement_duration_secs(),
            total_messages_exchanged: self.session.total_messages(),
        }
    }
}

pub struct Honeypot {
    store: Arc<SessionStore>,
    dispatcher: CallbackDispatcher,
    rng: Mutex<StdRng>,
}

impl Honeypot {
    pub fn new(
        store: Arc<SessionStore>,
        sink: Arc<dyn Notifier>,
        min_messages: usize,
        reply_seed: Option<u64>,
    ) -> Self {
        let rng = match reply_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            dispatcher: CallbackDispatcher::new(sink, Arc::clone(&store)).with_min_messages(min_messages),
            store,
            rng: Mutex::new(rng),
        }
    }

    /// Build with an HTTP callback sink as configured. Fails only on an unparseable callback URL.
    pub fn from_config(cfg: &HoneypotConfig) -> Result<Self> {
        let sink = match &cfg.callback_url {
            Some(url) => {
                reqwest::Url::parse(url)
                    .with_context(|| format!("invalid callback URL {url:?}"))?;
                HttpCallbackNotifier::new(url.clone()).with_timeout(cfg.callback_timeout)
            }
            None => HttpCallbackNotifier::disabled(),
        };
        info!(
            callback_enabled = sink.is_enabled(),
            min_messages = cfg.callback_min_messages,
            "honeypot engine configured"
        );
        Ok(Self::new(
            Arc::new(SessionStore::new()),
            Arc::new(sink),
            cfg.callback_min_messages,
            cfg.reply_seed,
        ))
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Process one inbound message for `session_id`. Total: never fails.
    ///
    /// Must run inside a Tokio runtime when the message can trigger a callback.
    pub fn handle(&self, session_id: &str, message: Message) -> EngagementOutcome {
        let analyze::MessageAnalysis {
            detection,
            extraction,
        } = analyze::analyze_message(&message.text);
        metrics::record_message(&detection);

        let session = self
            .store
            .record_message(session_id, message, detection.scam_detected);

        let has_entities = extraction.has_intelligence();
        let reply = {
            let mut rng = self.rng.lock();
            reply::select_reply(session.detected, detection.confidence, has_entities, &mut *rng)
        }
        .to_string();

        let id = anon_hash(session_id);
        debug!(
            %id,
            scam = session.detected,
            confidence = detection.confidence.as_str(),
            category = detection.category.as_str(),
            messages = session.total_messages(),
            "message analyzed"
        );

        let notes = agent_notes(&detection, &extraction, &reply);
        let callback_dispatched = self
            .dispatcher
            .maybe_dispatch(session_id, &extraction, notes)
            .is_some();
        if callback_dispatched {
            info!(%id, messages = session.total_messages(), "intelligence callback dispatched");
        }

        EngagementOutcome {
            detection,
            extraction,
            session,
            reply,
            callback_dispatched,
        }
    }
}
