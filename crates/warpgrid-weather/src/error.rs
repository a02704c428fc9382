//! Error types for the weather scaler.

use thiserror::Error;

/// Result type alias for scaler operations.
pub type ScalerResult<T> = Result<T, ScalerError>;

/// Errors that can occur while building or querying a weather scaler.
#[derive(Debug, Error)]
pub enum ScalerError {
    /// Bad or missing trigger metadata. No scaler is created.
    #[error("error parsing weather metadata: {0}")]
    Config(String),

    /// The request failed, timed out, or the body could not be read.
    #[error("weather fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The body is not a `consolidated_weather` document.
    #[error("weather response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded but carried no readings.
    #[error("no weather readings returned by {0}")]
    DataAbsent(String),

    /// A query was issued after `close()`.
    #[error("scaler is closed")]
    Closed,
}

impl ScalerError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
