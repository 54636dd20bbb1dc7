//! Search result to feed translation

use super::model::{EntryExtension, FeedDocument, FeedEntry};
use super::sanitize::strip_invalid;
use crate::description::INDEX_OFFSET;
use crate::error::{FeedError, Result};
use crate::results::{Record, SearchResult};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Feed `updated` for a page without entries
pub const EMPTY_FEED_UPDATED: &str = "1970-01-01T00:00:00Z";

/// How records with unusable required fields are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredFieldMode {
    /// Fail the whole document
    #[default]
    Strict,
    /// Drop the record and log it
    Lenient,
}

impl std::str::FromStr for RequiredFieldMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!("unknown required field mode: {}", other)),
        }
    }
}

/// Mapping profile for one translator instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Feed title
    pub feed_title: String,
    /// Constant record type emitted on every entry
    pub record_type: String,
    /// Separator placed between values of multi-valued fields.
    /// Empty by default, which concatenates values back to back.
    pub flatten_delimiter: String,
    pub mode: RequiredFieldMode,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            feed_title: "Solr Search Results".to_string(),
            record_type: "Email".to_string(),
            flatten_delimiter: String::new(),
            mode: RequiredFieldMode::Strict,
        }
    }
}

/// Converts one search result page into one feed document.
///
/// Stateless apart from its configuration; a single instance can serve
/// any number of concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate a result page
    pub fn translate(&self, result: &SearchResult) -> Result<FeedDocument> {
        let mut entries = Vec::with_capacity(result.records.len());

        for (index, record) in result.records.iter().enumerate() {
            match self.translate_record(index, record) {
                Ok(entry) => entries.push(entry),
                Err(e) if e.is_record_level() && self.config.mode == RequiredFieldMode::Lenient => {
                    warn!(
                        record = index,
                        id = record.id.as_deref().unwrap_or("<none>"),
                        "Skipping record: {}",
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            "Translated {} of {} records for '{}'",
            entries.len(),
            result.records.len(),
            result.query
        );

        Ok(FeedDocument {
            title: self.config.feed_title.clone(),
            id: self.feed_id(result),
            updated: latest_update(&entries).unwrap_or_else(|| EMPTY_FEED_UPDATED.to_string()),
            total_results: result.total_matches,
            start_index: INDEX_OFFSET + result.start_offset,
            items_per_page: result.page_size,
            search_terms: strip_invalid(&result.query).into_owned(),
            entries,
        })
    }

    /// Translate a single record at `index` within its page
    pub fn translate_record(&self, index: usize, record: &Record) -> Result<FeedEntry> {
        let id = required(index, "id", record.id.as_deref())?;
        let subject = required(index, "subject", record.subject.as_deref())?;
        let sender = required(index, "sender", record.sender.as_deref())?;
        let body = required(index, "body", record.body.as_deref())?;
        let date = required(index, "date", record.date.as_deref())?;

        DateTime::parse_from_rfc3339(&date).map_err(|e| FeedError::MalformedRecord {
            index,
            field: "date",
            reason: format!("not an RFC 3339 timestamp ({})", e),
        })?;

        Ok(FeedEntry {
            title: subject.clone(),
            id,
            updated: date.clone(),
            summary: subject.clone(),
            extension: EntryExtension {
                record_type: self.config.record_type.clone(),
                sender,
                receivers: self.flatten(&record.receivers),
                subject,
                body,
                emaildate: date,
                tags: self.flatten(&record.tags),
            },
        })
    }

    /// Join multi-valued field values with the configured delimiter
    pub fn flatten(&self, values: &[String]) -> String {
        values
            .iter()
            .map(|v| strip_invalid(v))
            .collect::<Vec<_>>()
            .join(self.config.flatten_delimiter.as_str())
    }

    fn feed_id(&self, result: &SearchResult) -> String {
        format!(
            "urn:{}:search:{}:{}:{}",
            self.config.record_type.to_ascii_lowercase(),
            urlencoding::encode(&result.query),
            INDEX_OFFSET + result.start_offset,
            result.page_size
        )
    }
}

/// Validate and sanitize a required scalar value
fn required(index: usize, field: &'static str, value: Option<&str>) -> Result<String> {
    let raw = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => return Err(FeedError::MissingRequiredField { index, field }),
    };

    let clean = strip_invalid(raw);
    if clean.trim().is_empty() {
        return Err(FeedError::MalformedRecord {
            index,
            field,
            reason: "only contains characters not allowed in XML".to_string(),
        });
    }

    Ok(clean.into_owned())
}

/// Most recent entry date, keeping the entry's original text
fn latest_update(entries: &[FeedEntry]) -> Option<String> {
    entries
        .iter()
        .filter_map(|e| {
            DateTime::parse_from_rfc3339(&e.updated)
                .ok()
                .map(|parsed: DateTime<FixedOffset>| (parsed, &e.updated))
        })
        .max_by_key(|(parsed, _)| *parsed)
        .map(|(_, text)| text.clone())
}
