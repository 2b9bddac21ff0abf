//! Error types for the tracker client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tracker returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
