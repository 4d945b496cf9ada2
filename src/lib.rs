// src/lib.rs
// Public library surface for integration tests (and the binary).

pub mod analyze;
pub mod api;
pub mod config;
pub mod engine;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod notify;
pub mod reply;
pub mod session;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{classify, extract, DetectionResult, ExtractionResult};
pub use crate::api::{create_router, router, AppState};
pub use crate::config::HoneypotConfig;
pub use crate::engine::{EngagementOutcome, Honeypot};
pub use crate::session::{Message, SessionStore};

/// Build the full Router from the process environment.
///
/// Fails only when the configured callback URL does not parse.
pub fn app_from_env() -> anyhow::Result<axum::Router> {
    let cfg = HoneypotConfig::from_env();
    let state = AppState::from_config(&cfg)?;
    Ok(create_router(state))
}
