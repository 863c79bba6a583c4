use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use crate::client::CatalogError;
use crate::config::StationConfig;

type HmacSha256 = Hmac<Sha256>;

/// What the caller wants to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    /// Live channels.
    Live,
    /// Video-on-demand entries.
    Vod,
    /// Playlists.
    Playlist,
}

/// Remote operation name carried in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    ListEmbeddableChannels,
    ListVideos,
    ListPlaylists,
}

impl SearchKind {
    /// Map the search intent to the remote API method.
    ///
    /// The mapping is exhaustive; adding a `SearchKind` variant without a
    /// method is a compile error.
    pub fn method(self) -> ApiMethod {
        match self {
            SearchKind::Live => ApiMethod::ListEmbeddableChannels,
            SearchKind::Vod => ApiMethod::ListVideos,
            SearchKind::Playlist => ApiMethod::ListPlaylists,
        }
    }
}

impl ApiMethod {
    /// Wire name of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            ApiMethod::ListEmbeddableChannels => "list_embeddable_channels",
            ApiMethod::ListVideos => "list_videos",
            ApiMethod::ListPlaylists => "list_playlists",
        }
    }
}

impl std::fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog search, immutable once constructed.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub kind: SearchKind,
    /// Station id used to resolve credentials.
    pub station: String,
    /// Free-text keyword filter, applied server-side when present.
    pub keyword: Option<String>,
}

impl SearchRequest {
    pub fn new(kind: SearchKind, station: impl Into<String>) -> Self {
        Self {
            kind,
            station: station.into(),
            keyword: None,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }
}

/// A fully formed, signed API request ready for the transport.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub url: Url,
    /// The exact body bytes the signature was computed over.
    pub body: String,
    /// Unix timestamp embedded in both the signature and the `ts`
    /// query parameter. The remote verifies they match.
    pub timestamp: u64,
}

/// One server-side filter: a (field, condition, value) triple contributed
/// to the parallel `filter_by[]` / `filter_cond[]` / `filter_value[]`
/// query sequences. New filter types add entries here, not new branches
/// in the URL assembly.
struct Filter {
    by: &'static str,
    cond: &'static str,
    value: String,
}

fn filters_for(request: &SearchRequest) -> Vec<Filter> {
    let mut filters = Vec::new();
    if let Some(keyword) = &request.keyword {
        let keyword = sanitize(keyword);
        if !keyword.is_empty() {
            filters.push(Filter {
                by: "name",
                cond: "lk",
                value: keyword,
            });
        }
    }
    filters
}

/// Strip markup-significant characters from a user-supplied filter value.
///
/// Plain-text normalization, not entity encoding: the characters are
/// removed, not escaped.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '&' | '"' | '\''))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Build the request body for a method.
///
/// A fresh string per call; request state never outlives one build.
fn request_body(method: ApiMethod) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?><request><type>{}</type><params></params></request>",
        method.as_str()
    )
}

/// `base64(HMAC-SHA256(body || decimal(timestamp)))` keyed with the
/// station's private key. The signature covers the exact transmitted
/// body bytes with the timestamp digits appended.
fn sign(body: &str, timestamp: u64, private_key: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(private_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body.as_bytes());
    mac.update(timestamp.to_string().as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Assemble the signed request for a resolved station.
///
/// `timestamp` is injected by the caller so the pipeline stays
/// deterministic under test; [`crate::CatalogClient`] passes the current
/// unix time.
pub fn build_signed_request(
    catalog_url: &str,
    station: &StationConfig,
    request: &SearchRequest,
    timestamp: u64,
) -> Result<SignedRequest, CatalogError> {
    let body = request_body(request.kind.method());
    let signature = sign(&body, timestamp, &station.private_key);

    let mut url = Url::parse(&format!("{}/api", catalog_url.trim_end_matches('/')))?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("ts", &timestamp.to_string());
        pairs.append_pair("sgn", &signature);
        pairs.append_pair("id", &station.public_key);

        let filters = filters_for(request);
        for f in &filters {
            pairs.append_pair("filter_by[]", f.by);
        }
        for f in &filters {
            pairs.append_pair("filter_cond[]", f.cond);
        }
        for f in &filters {
            pairs.append_pair("filter_value[]", &f.value);
        }
    }

    Ok(SignedRequest {
        url,
        body,
        timestamp,
    })
}
