//! Request parameter parsing
//!
//! Interprets the parameters a feed consumer fills into the description's
//! URL template:
//! - `q`: search terms (required)
//! - `start`: zero-based index of the first result, empty means 0
//! - `count`: page size, empty or 0 means the configured default

use crate::config::OpenSearchSettings;
use crate::error::{FeedError, Result};
use serde::{Deserialize, Serialize};

/// Raw query parameters of a search request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub start: Option<String>,
    pub count: Option<String>,
    /// Output format: `atom` (default) or `json`
    pub format: Option<String>,
}

/// Output format of a search response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Atom,
    Json,
}

/// A validated page request handed to the query executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Search terms, passed on verbatim
    pub terms: String,
    /// Zero-based offset of the first record
    pub start: u64,
    /// Number of records per page
    pub count: u64,
}

impl PageRequest {
    pub fn new(terms: impl Into<String>, start: u64, count: u64) -> Self {
        Self {
            terms: terms.into(),
            start,
            count,
        }
    }

    /// Build a page request from raw parameters
    pub fn from_params(params: &SearchParams, limits: &OpenSearchSettings) -> Result<Self> {
        let terms = match params.q.as_deref() {
            Some(q) if !q.trim().is_empty() => q.to_string(),
            _ => return Err(FeedError::InvalidRequest("missing search terms".to_string())),
        };

        let start = parse_number("start", params.start.as_deref())?.unwrap_or(0);

        let count = match parse_number("count", params.count.as_deref())? {
            None | Some(0) => limits.default_count,
            Some(n) => n.min(limits.max_count),
        };

        Ok(Self {
            terms,
            start,
            count,
        })
    }
}

impl OutputFormat {
    pub fn from_params(params: &SearchParams) -> Result<Self> {
        match params.format.as_deref().map(str::trim) {
            None | Some("") | Some("atom") => Ok(OutputFormat::Atom),
            Some("json") => Ok(OutputFormat::Json),
            Some(other) => Err(FeedError::InvalidRequest(format!(
                "unsupported format: {}",
                other
            ))),
        }
    }
}

/// Parse an optional non-negative integer; an empty value counts as absent
fn parse_number(name: &str, value: Option<&str>) -> Result<Option<u64>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some).map_err(|_| {
            FeedError::InvalidRequest(format!("{} must be a non-negative integer, got '{}'", name, v))
        }),
    }
}
