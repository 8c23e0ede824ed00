//! Error types for loading the map inputs.

use thiserror::Error;

/// Errors that can occur while loading the band table or the boundary data.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Local file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Remote request failed before a response arrived
    #[error("Failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Remote server answered with a non-success status
    #[error("Fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Band table is not valid CSV
    #[error("Invalid band table: {0}")]
    Csv(#[from] csv::Error),

    /// Boundary data is not valid JSON
    #[error("Invalid boundary JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Boundary data parsed but cannot be turned into features
    #[error("Unsupported boundary data: {0}")]
    Geography(String),
}

/// Result type for loading operations
pub type LoadResult<T> = Result<T, LoadError>;
