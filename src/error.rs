//! Error types for the translation layer

use thiserror::Error;

/// Result type alias for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Errors raised while answering a federated search request
#[derive(Error, Debug)]
pub enum FeedError {
    /// A record has no usable value for a field the mapping requires
    #[error("record {index} is missing required field `{field}`")]
    MissingRequiredField { index: usize, field: &'static str },

    /// A record value cannot be carried by the output encoding
    #[error("record {index} has a malformed `{field}` value: {reason}")]
    MalformedRecord {
        index: usize,
        field: &'static str,
        reason: String,
    },

    /// The search engine call failed, timed out or returned garbage
    #[error("upstream query failed: {0}")]
    UpstreamQueryFailure(String),

    /// The feed and the description document disagree on the paging base
    #[error("paging index mismatch: description declares {declared}, feed emits {emitted}")]
    PagingIndexMismatch { declared: u64, emitted: u64 },

    /// The incoming search request could not be interpreted
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Template rendering error
    #[error("rendering failed: {0}")]
    Render(#[from] tera::Error),
}

impl FeedError {
    /// Whether the error concerns a single record rather than the whole request
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            FeedError::MissingRequiredField { .. } | FeedError::MalformedRecord { .. }
        )
    }
}
