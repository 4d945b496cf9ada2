//! Tracing setup and log-safe identifiers.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_DEV_LOG: &str = "HONEYPOT_DEV_LOG";

/// Short, stable SHA-256 prefix for log lines. Raw session ids and message
/// text never reach the logs.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Install a compact fmt subscriber when `HONEYPOT_DEV_LOG=1`.
///
/// Uses `try_init` because the hosting runtime may already own the global
/// subscriber; in that case this is a no-op.
pub fn init_dev_tracing() {
    let on = std::env::var(ENV_DEV_LOG)
        .ok()
        .is_some_and(|v| v == "1");
    if !on {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scam_honeypot=info,callback=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}
