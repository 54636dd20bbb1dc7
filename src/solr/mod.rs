//! Solr query executor module
//!
//! Defines the query executor boundary and its Solr implementation.

mod executor;
mod response;
mod traits;

pub use executor::SolrExecutor;
pub use response::{parse_select_response, record_from_doc};
pub use traits::QueryExecutor;
