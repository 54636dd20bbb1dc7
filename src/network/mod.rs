//! HTTP networking module
//!
//! Provides the HTTP client used to reach the search engine.

mod client;
mod types;

pub use client::HttpClient;
pub use types::{HttpMethod, HttpRequest, HttpResponse};
