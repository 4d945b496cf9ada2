use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::config::HoneypotConfig;
use crate::engine::Honeypot;
use crate::metrics;
use crate::models::{ErrorResponse, HoneypotRequest, HoneypotResponse};

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Honeypot>,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(engine: Honeypot, api_key: Option<String>) -> Self {
        Self {
            engine: Arc::new(engine),
            api_key: api_key.map(Arc::from),
        }
    }

    pub fn from_config(cfg: &HoneypotConfig) -> anyhow::Result<Self> {
        Ok(Self::new(Honeypot::from_config(cfg)?, cfg.api_key.clone()))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/honeypot", post(honeypot))
        .with_state(state)
        .merge(metrics::router(metrics::handle()))
        .layer(CorsLayer::very_permissive())
}

/// Alias kept for callers that expect `api::router`.
pub fn router(state: AppState) -> Router {
    create_router(state)
}

fn check_api_key(expected: Option<&str>, headers: &HeaderMap) -> Result<(), Response> {
    let Some(expected) = expected else {
        warn!("request rejected: API key not configured");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("API key not configured")),
        )
            .into_response());
    };
    let given = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if given != Some(expected) {
        return Err((StatusCode::UNAUTHORIZED, Json(ErrorResponse::new("Unauthorized"))).into_response());
    }
    Ok(())
}

async fn honeypot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<HoneypotRequest>,
) -> Response {
    if let Err(rejection) = check_api_key(state.api_key.as_deref(), &headers) {
        return rejection;
    }

    let out = state.engine.handle(&body.session_id, body.message);
    Json(HoneypotResponse::from(out)).into_response()
}
