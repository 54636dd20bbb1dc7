//! Query executor trait

use crate::error::Result;
use crate::query::PageRequest;
use crate::results::SearchResult;
use async_trait::async_trait;

/// The search engine boundary: runs one paged query and returns its matches.
///
/// Timeouts and retries belong to implementations of this trait; the
/// translator never performs I/O.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Executor name, used in logs and metrics
    fn name(&self) -> &str;

    /// Run a query and return one consistent result page.
    ///
    /// Any failure, including an inconsistent page, is reported as
    /// [`FeedError::UpstreamQueryFailure`](crate::error::FeedError::UpstreamQueryFailure).
    async fn execute(&self, request: &PageRequest) -> Result<SearchResult>;
}
