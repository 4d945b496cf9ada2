//! Scam Honeypot: Binary Entrypoint
//! Boots the Axum HTTP server with the honeypot engine and shared session store.

use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // No-op unless HONEYPOT_DEV_LOG=1.
    scam_honeypot::logging::init_dev_tracing();

    let cfg = scam_honeypot::HoneypotConfig::from_env();
    if cfg.api_key.is_none() {
        tracing::warn!("API_KEY is not set; /honeypot will answer 500 until it is");
    }

    let state = scam_honeypot::AppState::from_config(&cfg)?;
    let router = scam_honeypot::create_router(state);

    Ok(router.into())
}
