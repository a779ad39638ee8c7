//! Error kinds worth matching on. Everything else travels as `anyhow::Error`
//! with request context attached.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    /// The backend answered with a non-success status.
    #[error("request to {url} failed with HTTP {status}")]
    Status { url: String, status: u16 },

    /// The backend answered 404 for a country-scoped resource.
    #[error("no data for country code {0}")]
    NotFound(String),

    /// A country code that cannot be placed in a URL path.
    #[error("invalid country code {0:?}, expected 2 or 3 letters")]
    InvalidCode(String),

    /// The map-data endpoint returned GeoJSON that is not a FeatureCollection.
    #[error("map data is not a GeoJSON FeatureCollection")]
    NotAFeatureCollection,
}
