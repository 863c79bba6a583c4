use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::config::GeneralSettings;
use crate::request::{SearchRequest, build_signed_request};
use crate::response::{ResultRecord, extract, validate};
use crate::transport::{HttpTransport, Transport};

/// Everything that can go wrong in one search pipeline run.
///
/// Configuration errors fire before any network call; the first error
/// short-circuits the remaining stages. Every variant carries a stable
/// message suitable for direct display.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("station required")]
    StationRequired,
    #[error("station \"{0}\" not found")]
    StationNotFound(String),
    #[error("station \"{0}\" has no API keys configured")]
    StationKeysMissing(String),
    #[error("catalog URL is not configured")]
    MissingCatalogUrl,
    #[error("invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("there was an error contacting the API")]
    RequestUnsuccessful,
    #[error("the API reported an error: {message}")]
    Api { message: String },
}

/// Client for the MCP video-catalog search API.
///
/// Constructed once with injected settings and used for any number of
/// concurrent searches; every call builds its own signed request from
/// immutable inputs, so the client holds no per-request state.
#[derive(Debug, Clone)]
pub struct CatalogClient<T = HttpTransport> {
    settings: GeneralSettings,
    transport: T,
}

impl CatalogClient<HttpTransport> {
    /// Create a client with the default HTTP transport.
    pub fn new(settings: GeneralSettings) -> Result<Self, CatalogError> {
        let transport = HttpTransport::new()?;
        Self::with_transport(settings, transport)
    }
}

impl<T: Transport> CatalogClient<T> {
    /// Create a client over a caller-supplied transport.
    pub fn with_transport(settings: GeneralSettings, transport: T) -> Result<Self, CatalogError> {
        if settings.mcp_url.trim().is_empty() {
            return Err(CatalogError::MissingCatalogUrl);
        }
        Ok(Self {
            settings,
            transport,
        })
    }

    pub fn settings(&self) -> &GeneralSettings {
        &self.settings
    }

    /// Run one search: resolve the station, build and sign the request,
    /// send it, validate the envelope, and extract the result records.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<ResultRecord>, CatalogError> {
        let station = self.settings.resolve_station(&request.station)?;
        let method = request.kind.method();
        let signed = build_signed_request(&self.settings.mcp_url, station, request, unix_now())?;

        debug!(method = %method, station = %station.id, url = %signed.url, "catalog search");

        let response = self.transport.send(&signed.url, signed.body).await?;
        let body = response.body;
        let doc = validate(response.status, &body)?;
        Ok(extract(method, &doc))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
