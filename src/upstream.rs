// Tap Sim REST API client.
//
// Every attempt is bounded by a timeout. A transient failure gets exactly one
// retry after a jittered backoff; after that the caller sees a `FetchError`.

use std::future::Future;
use std::time::{Duration, Instant};

use rand::Rng;
use serde_json::Value;

use crate::config::Config;
use crate::error::FetchError;
use crate::metrics;

/// Upstream endpoints the bot reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Eggs sorted by price, most expensive first.
    Eggs,
    /// Item catalogue, first `limit` rows.
    Items { limit: u32 },
    /// Pets sorted by value, most valuable first.
    TopValues,
    Enchants,
    Snipes,
    Ads,
}

impl Endpoint {
    /// Path and query relative to the API base.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Eggs => "eggs?sort=price&order=desc&limit=100".to_string(),
            Endpoint::Items { limit } => format!("items?limit={limit}"),
            Endpoint::TopValues => {
                "items?type=Pet&sort=value&order=desc&page=1&limit=50".to_string()
            }
            Endpoint::Enchants => "plaza/enchants".to_string(),
            Endpoint::Snipes => "plaza/snipes?basis=value&maxPercent=80".to_string(),
            Endpoint::Ads => "ads?page=1&limit=20".to_string(),
        }
    }

    /// Low-cardinality label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::Eggs => "eggs",
            Endpoint::Items { .. } => "items",
            Endpoint::TopValues => "top_values",
            Endpoint::Enchants => "enchants",
            Endpoint::Snipes => "snipes",
            Endpoint::Ads => "ads",
        }
    }
}

/// Something that can produce the raw JSON document for an endpoint.
pub trait RecordSource: Send + Sync {
    fn fetch(&self, endpoint: Endpoint) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// Retry behaviour for upstream requests.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Backoff before the retry, with up to 50% random jitter added.
    fn backoff_with_jitter(&self) -> Duration {
        let base = self.backoff.as_millis() as u64;
        let jitter = if base == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=base / 2)
        };
        Duration::from_millis(base + jitter)
    }
}

/// Run `attempt` once, and once more after a backoff if the first failure
/// was transient. Each attempt is cut off at `policy.timeout`.
pub async fn fetch_with_retry<F, Fut>(
    policy: RetryPolicy,
    endpoint: Endpoint,
    attempt: F,
) -> Result<Value, FetchError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Value, FetchError>>,
{
    let mut tries = 0;
    loop {
        tries += 1;
        let started = Instant::now();
        let result = match tokio::time::timeout(policy.timeout, attempt()).await {
            Ok(r) => r,
            Err(_) => Err(FetchError::Timeout {
                endpoint: endpoint.label().to_string(),
                secs: policy.timeout.as_secs(),
            }),
        };
        metrics::UPSTREAM_FETCH_DURATION_SECONDS
            .with_label_values(&[endpoint.label()])
            .observe(started.elapsed().as_secs_f64());

        match result {
            Ok(value) => {
                metrics::UPSTREAM_FETCHES_TOTAL
                    .with_label_values(&[endpoint.label(), "ok"])
                    .inc();
                return Ok(value);
            }
            Err(e) => {
                metrics::UPSTREAM_FETCHES_TOTAL
                    .with_label_values(&[endpoint.label(), e.kind()])
                    .inc();
                if tries >= 2 || !e.is_transient() {
                    tracing::warn!(endpoint = endpoint.label(), tries, "Upstream fetch failed: {e}");
                    return Err(e);
                }
                let delay = policy.backoff_with_jitter();
                tracing::debug!(
                    endpoint = endpoint.label(),
                    delay_ms = delay.as_millis() as u64,
                    "Retrying upstream fetch after error: {e}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// HTTP client for the Tap Sim API.
#[derive(Debug, Clone)]
pub struct TapSimClient {
    http: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
}

impl TapSimClient {
    pub fn new(base_url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            policy,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_base.clone(),
            RetryPolicy {
                timeout: config.fetch_timeout,
                backoff: config.retry_backoff,
            },
        )
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    async fn get_once(&self, endpoint: Endpoint) -> Result<Value, FetchError> {
        let url = self.url_for(endpoint);
        tracing::debug!("Fetching {url}");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.label().to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl RecordSource for TapSimClient {
    fn fetch(&self, endpoint: Endpoint) -> impl Future<Output = Result<Value, FetchError>> + Send {
        fetch_with_retry(self.policy, endpoint, move || self.get_once(endpoint))
    }
}
