use serde::{Deserialize, Serialize};

use crate::client::CatalogError;

/// Plugin-level settings consumed by the catalog client.
///
/// Mirrors the host configuration surface
/// `{ mcpUrl, stations: [{ id, publicKey, privateKey }] }`. The settings
/// are read-only; the client takes ownership once at construction and
/// never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    /// Base URL of the MCP catalog endpoint.
    pub mcp_url: String,
    /// Stations (tenants) authorized to query the catalog.
    #[serde(default)]
    pub stations: Vec<StationConfig>,
}

/// Credentials for one station (tenant).
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationConfig {
    /// Station id, unique within the settings.
    pub id: String,
    /// Public key, sent as the `id` query parameter.
    pub public_key: String,
    /// Private HMAC key. Never logged.
    pub private_key: String,
}

impl GeneralSettings {
    /// Look up a station by exact id match.
    ///
    /// Station ids are expected to be unique; with duplicates the first
    /// match wins (configuration precondition, not validated here).
    /// An empty id, an unknown id, and a station with blank keys are
    /// distinct configuration errors, not empty defaults — all of them
    /// fire before any network call.
    pub fn resolve_station(&self, station_id: &str) -> Result<&StationConfig, CatalogError> {
        if station_id.is_empty() {
            return Err(CatalogError::StationRequired);
        }
        let station = self
            .stations
            .iter()
            .find(|s| s.id == station_id)
            .ok_or_else(|| CatalogError::StationNotFound(station_id.to_string()))?;
        if station.public_key.is_empty() || station.private_key.is_empty() {
            return Err(CatalogError::StationKeysMissing(station_id.to_string()));
        }
        Ok(station)
    }
}

impl std::fmt::Debug for StationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationConfig")
            .field("id", &self.id)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
