//! OpenSearch description document
//!
//! Advertises the query URL template, paging convention, record type and
//! sortable fields of this endpoint to the federated search consumer.

use crate::config::Settings;
use crate::error::{FeedError, Result};
use serde::Serialize;

/// Paging base used for `startIndex` in both the description and the feed.
///
/// The consumer assumes one-based indexing when this is not declared, which
/// silently skips the first record of every page.
pub const INDEX_OFFSET: u64 = 0;

/// Character encoding for queries and feeds
pub const ENCODING: &str = "UTF-8";

/// Media type of the search results referenced by the URL template
pub const RESULTS_TYPE: &str = "application/atom+xml";

/// Capability document served to the feed consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSearchDescription {
    pub short_name: String,
    pub description: String,
    pub contact: Option<String>,
    /// Query URL with `{searchTerms}`, `{startIndex?}` and `{count?}`
    pub template: String,
    pub results_type: String,
    pub index_offset: u64,
    pub record_types: Vec<RecordTypeDescription>,
    pub input_encoding: String,
    pub output_encoding: String,
    /// Declared ceiling only; nothing here enforces it
    pub max_results: u64,
}

/// A record type and the fields it exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTypeDescription {
    pub name: String,
    pub label: String,
    pub label_plural: String,
    pub fields: Vec<FieldDescription>,
}

impl RecordTypeDescription {
    /// Names of the sortable fields
    pub fn sortable_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.sortable)
            .map(|f| f.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescription {
    pub name: String,
    pub label: String,
    pub field_type: String,
    pub sortable: bool,
}

/// Extension fields every entry carries, with display label and type
const ENTRY_FIELDS: [(&str, &str, &str); 6] = [
    ("sender", "Sender", "string"),
    ("receivers", "Receivers", "string"),
    ("subject", "Subject", "string"),
    ("body", "Body", "textarea"),
    ("emaildate", "Date", "datetime"),
    ("tags", "Tags", "string"),
];

impl OpenSearchDescription {
    /// Build the description from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let os = &settings.opensearch;

        let fields = ENTRY_FIELDS
            .iter()
            .map(|(name, label, field_type)| FieldDescription {
                name: name.to_string(),
                label: label.to_string(),
                field_type: field_type.to_string(),
                sortable: os.sortable_fields.iter().any(|s| s.as_str() == *name),
            })
            .collect();

        Self {
            short_name: os.short_name.clone(),
            description: os.description.clone(),
            contact: os.contact.clone(),
            template: query_template(&settings.public_url()),
            results_type: RESULTS_TYPE.to_string(),
            index_offset: INDEX_OFFSET,
            record_types: vec![RecordTypeDescription {
                name: settings.mapping.record_type.clone(),
                label: os.record_label.clone(),
                label_plural: os.record_label_plural.clone(),
                fields,
            }],
            input_encoding: ENCODING.to_string(),
            output_encoding: ENCODING.to_string(),
            max_results: os.max_results,
        }
    }
}

/// Build the search URL template for a public base URL
pub fn query_template(base_url: &str) -> String {
    format!(
        "{}/search?q={{searchTerms}}&start={{startIndex?}}&count={{count?}}",
        base_url.trim_end_matches('/')
    )
}

/// Check that the description declares the paging base the feed emits.
///
/// `emitted_first_index` is the `startIndex` a translated feed carries for
/// the first page.
pub fn check_paging_contract(
    description: &OpenSearchDescription,
    emitted_first_index: u64,
) -> Result<()> {
    if description.index_offset != emitted_first_index
        || !description.template.contains("{startIndex")
    {
        return Err(FeedError::PagingIndexMismatch {
            declared: description.index_offset,
            emitted: emitted_first_index,
        });
    }
    Ok(())
}
