//! Result handling module
//!
//! Defines the page of records handed over by the query executor.

mod types;

pub use types::*;
