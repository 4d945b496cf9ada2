//! Prometheus counters for the honeypot pipeline.

use std::sync::OnceLock;

use axum::{routing::get, Router};
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::analyze::DetectionResult;
use crate::notify::DeliveryOutcome;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder once per process and return its handle.
///
/// If another recorder already owns the global slot, the returned handle
/// renders an empty exposition instead of failing.
pub fn handle() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!("prometheus recorder not installed: {e}");
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

/// Router exposing `/metrics` in the Prometheus exposition format.
pub fn router(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let h = handle.clone();
            async move { h.render() }
        }),
    )
}

pub fn record_message(detection: &DetectionResult) {
    counter!("honeypot_messages_total").increment(1);
    if detection.scam_detected {
        counter!("honeypot_scam_detected_total", "category" => detection.category.as_str())
            .increment(1);
    }
}

pub fn record_callback(outcome: &DeliveryOutcome) {
    counter!("honeypot_callbacks_total", "outcome" => outcome.label()).increment(1);
}
