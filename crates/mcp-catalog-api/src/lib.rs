//! Client for the MCP video-catalog search API.
//!
//! Given a station (tenant) and a search intent — live channels, VOD, or
//! playlists — this crate builds a signed GET-with-body request, sends it,
//! and turns the XML envelope into result records or a typed error.
//!
//! ```no_run
//! use mcp_catalog_api::{CatalogClient, GeneralSettings, SearchKind, SearchRequest};
//!
//! # async fn run(settings: GeneralSettings) -> Result<(), mcp_catalog_api::CatalogError> {
//! let client = CatalogClient::new(settings)?;
//! let request = SearchRequest::new(SearchKind::Vod, "123").with_keyword("news");
//! let videos = client.search(&request).await?;
//! for video in &videos {
//!     println!("{:?}", video.field("title"));
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod request;
mod response;
mod transport;

pub use client::{CatalogClient, CatalogError};
pub use config::{GeneralSettings, StationConfig};
pub use request::{ApiMethod, SearchKind, SearchRequest, SignedRequest, build_signed_request};
pub use response::{ResultRecord, extract, validate};
pub use transport::{ApiResponse, HttpTransport, Transport};
