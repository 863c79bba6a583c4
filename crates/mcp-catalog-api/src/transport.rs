use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::client::CatalogError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// What came back from the wire: status code plus raw body text.
/// Consumed entirely within one pipeline run.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Network layer for the catalog pipeline.
///
/// The pipeline treats any transport failure as opaque and final; retry
/// policy lives behind this trait, never on top of it.
pub trait Transport: Send + Sync {
    /// Issue the catalog's GET-with-body request and return the raw
    /// response. Implementations may retry internally.
    fn send(
        &self,
        url: &Url,
        body: String,
    ) -> impl std::future::Future<Output = Result<ApiResponse, CatalogError>> + Send;
}

/// Default reqwest-backed transport.
///
/// The remote API expects GET requests carrying a body — non-standard,
/// but reqwest passes the body through unchanged. Transport-level
/// failures (connect, timeout) are retried up to `max_retries` extra
/// times with a fixed delay; HTTP error statuses are returned to the
/// validator untouched.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpTransport {
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_policy(
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            DEFAULT_MAX_RETRIES,
            Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        )
    }

    /// Build a transport with an explicit per-request timeout and retry
    /// policy.
    pub fn with_policy(
        timeout: Duration,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Result<Self, CatalogError> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner,
            max_retries,
            retry_delay,
        })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, url: &Url, body: String) -> Result<ApiResponse, CatalogError> {
        let mut attempt = 0;
        loop {
            match self
                .inner
                .get(url.clone())
                .body(body.clone())
                .send()
                .await
            {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    let body = resp.text().await?;
                    return Ok(ApiResponse { status, body });
                }
                Err(err) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %err, "catalog request failed, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
