use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the analytics engine and the category loaders.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("at least one event is required for interval analysis")]
    InsufficientData,

    #[error("category '{category}' has no events to chart")]
    NoEvents { category: String },

    #[error("malformed timestamp '{input}': {reason}")]
    MalformedTimestamp { input: String, reason: String },

    #[error("malformed category file {path}: {reason}")]
    MalformedCategory { path: PathBuf, reason: String },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalyticsError {
    pub fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTimestamp { input: input.to_string(), reason: reason.into() }
    }
}

pub type Result<T, E = AnalyticsError> = std::result::Result<T, E>;
