use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{DeliveryOutcome, IntelligenceReport, Notifier};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// POSTs the report as JSON to the collection endpoint. One attempt, no retries.
#[derive(Clone, Debug)]
pub struct HttpCallbackNotifier {
    url: Option<String>,
    client: Client,
    timeout: Duration,
}

impl HttpCallbackNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sink that never sends; every delivery reports `Disabled`.
    pub fn disabled() -> Self {
        Self {
            url: None,
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Empty or missing URL disables delivery.
    pub fn from_url(url: Option<&str>) -> Self {
        match url.map(str::trim) {
            Some(u) if !u.is_empty() => Self::new(u),
            _ => Self::disabled(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }
}

#[async_trait]
impl Notifier for HttpCallbackNotifier {
    async fn deliver(&self, report: &IntelligenceReport) -> DeliveryOutcome {
        let Some(url) = &self.url else {
            tracing::debug!("callback disabled (no HONEYPOT_CALLBACK_URL)");
            return DeliveryOutcome::Disabled;
        };

        let res = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(report)
            .send()
            .await;

        match res {
            Ok(rsp) => {
                let status = rsp.status();
                if status.is_success() {
                    DeliveryOutcome::Delivered {
                        status: status.as_u16(),
                    }
                } else {
                    DeliveryOutcome::Failed {
                        reason: format!("callback HTTP error: {status}"),
                    }
                }
            }
            Err(e) if e.is_timeout() => DeliveryOutcome::Failed {
                reason: format!("callback timed out after {:?}", self.timeout),
            },
            Err(e) => DeliveryOutcome::Failed {
                reason: format!("callback request failed: {e}"),
            },
        }
    }
}
