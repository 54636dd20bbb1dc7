//! Feed translation module
//!
//! Turns a page of search records into an Atom feed carrying OpenSearch
//! paging metadata and vendor-namespaced record fields.

mod model;
pub mod sanitize;
mod translator;

pub use model::{EntryExtension, FeedDocument, FeedEntry};
pub use translator::{RequiredFieldMode, Translator, TranslatorConfig};
