//! Solr-OpenSearch: serve Apache Solr search results to Salesforce Federated Search
//!
//! Translates Solr select responses into Atom feeds extended with OpenSearch
//! paging elements and vendor-namespaced record fields, and publishes the
//! matching OpenSearch description document.

pub mod config;
pub mod description;
pub mod error;
pub mod feed;
pub mod metrics;
pub mod network;
pub mod query;
pub mod render;
pub mod results;
pub mod solr;
pub mod web;

pub use config::Settings;
pub use error::{FeedError, Result};
pub use feed::{FeedDocument, Translator, TranslatorConfig};
pub use results::{Record, SearchResult};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
