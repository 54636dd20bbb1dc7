//! Feed document model

use serde::Serialize;

/// A search result page rendered as an OpenSearch-extended Atom feed.
///
/// Field names serialize in camelCase so the JSON form and the XML
/// templates share the OpenSearch vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedDocument {
    /// Feed title
    pub title: String,
    /// Stable feed identifier derived from the query and page
    pub id: String,
    /// Latest entry date, or the Unix epoch for an empty page
    pub updated: String,
    /// Upstream match count, never the post-filter entry count
    pub total_results: u64,
    /// Index of the first entry, counted from the declared paging base
    pub start_index: u64,
    /// Requested page size
    pub items_per_page: u64,
    /// Search terms echoed back
    pub search_terms: String,
    pub entries: Vec<FeedEntry>,
}

impl FeedDocument {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One record rendered as a feed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub title: String,
    pub id: String,
    pub updated: String,
    pub summary: String,
    /// Vendor-namespaced fields read by the federated search consumer
    pub extension: EntryExtension,
}

/// Vendor extension elements of a feed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryExtension {
    pub record_type: String,
    pub sender: String,
    /// Receivers flattened into a single string
    pub receivers: String,
    pub subject: String,
    pub body: String,
    pub emaildate: String,
    /// Tags flattened into a single string
    pub tags: String,
}
