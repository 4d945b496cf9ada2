// src/config/honeypot.rs
//! Process configuration, read from the environment (`.env` is loaded by the binary).

use std::time::Duration;

use tracing::warn;

use crate::notify::dispatcher::DEFAULT_MIN_MESSAGES;

pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_CALLBACK_URL: &str = "HONEYPOT_CALLBACK_URL";
pub const ENV_CALLBACK_TIMEOUT_SECS: &str = "HONEYPOT_CALLBACK_TIMEOUT_SECS";
pub const ENV_CALLBACK_MIN_MESSAGES: &str = "HONEYPOT_CALLBACK_MIN_MESSAGES";
pub const ENV_REPLY_SEED: &str = "HONEYPOT_REPLY_SEED";

pub const DEFAULT_CALLBACK_URL: &str = "https://hackathon.guvi.in/api/updateHoneyPotFinalResult";
pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 5;
const MAX_CALLBACK_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoneypotConfig {
    /// Shared secret expected in `x-api-key`. `None` makes every request fail with 500.
    pub api_key: Option<String>,
    /// `None` disables the intelligence callback.
    pub callback_url: Option<String>,
    pub callback_timeout: Duration,
    pub callback_min_messages: usize,
    /// Seed for reply selection; `None` seeds from the OS.
    pub reply_seed: Option<u64>,
}

impl Default for HoneypotConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            callback_url: Some(DEFAULT_CALLBACK_URL.to_string()),
            callback_timeout: Duration::from_secs(DEFAULT_CALLBACK_TIMEOUT_SECS),
            callback_min_messages: DEFAULT_MIN_MESSAGES,
            reply_seed: None,
        }
    }
}

impl HoneypotConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup. Invalid numbers fall back to defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();

        let api_key = lookup(ENV_API_KEY)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // Set-but-empty disables; unset keeps the default endpoint.
        let callback_url = match lookup(ENV_CALLBACK_URL) {
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(s.trim().to_string()),
            None => d.callback_url,
        };

        let timeout_secs = parse_num::<u64>(&lookup, ENV_CALLBACK_TIMEOUT_SECS)
            .unwrap_or(DEFAULT_CALLBACK_TIMEOUT_SECS)
            .clamp(1, MAX_CALLBACK_TIMEOUT_SECS);

        let callback_min_messages = parse_num::<usize>(&lookup, ENV_CALLBACK_MIN_MESSAGES)
            .unwrap_or(d.callback_min_messages)
            .max(1);

        Self {
            api_key,
            callback_url,
            callback_timeout: Duration::from_secs(timeout_secs),
            callback_min_messages,
            reply_seed: parse_num::<u64>(&lookup, ENV_REPLY_SEED),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn without_callback(mut self) -> Self {
        self.callback_url = None;
        self
    }
}

fn parse_num<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("{key}={raw:?} is not a valid number; using default");
            None
        }
    }
}
