//! Error types for the price lookup pipeline.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("product name is required")]
    MissingProductName,

    #[error("market feed access key is not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("market feed returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("market feed did not answer within {0:?}")]
    Timeout(Duration),

    #[error("JSON parse error: {0}")]
    Json(#[from] simd_json::Error),
}

/// Coarse classification reported across the inbound boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller sent something unusable. Not retried.
    Input,
    /// The pipeline itself could not run (e.g. no access key).
    Unavailable,
    /// One feed call failed. Absorbed by the cascade.
    Upstream,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingProductName => ErrorKind::Input,
            Self::MissingApiKey => ErrorKind::Unavailable,
            Self::Http(_) | Self::Status { .. } | Self::Timeout(_) | Self::Json(_) => {
                ErrorKind::Upstream
            }
        }
    }

    /// Fatal errors abort the whole cascade instead of moving to the next candidate.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Unavailable
    }
}

/// Why a single raw feed record was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordRejection {
    #[error("arrival date {0:?} is not a valid DD/MM/YYYY date")]
    InvalidDate(String),

    #[error("{field} {value:?} is not a number")]
    InvalidPrice { field: &'static str, value: String },

    #[error("{field} {value} is negative")]
    NegativePrice { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::MissingProductName.kind(), ErrorKind::Input);
        assert_eq!(Error::MissingApiKey.kind(), ErrorKind::Unavailable);
        assert_eq!(
            Error::Timeout(Duration::from_secs(1)).kind(),
            ErrorKind::Upstream
        );

        // Only a missing key stops the cascade
        assert!(Error::MissingApiKey.is_fatal());
        assert!(!Error::Status {
            status: 503,
            body: String::new()
        }
        .is_fatal());
        assert!(!Error::MissingProductName.is_fatal());
    }
}
