//! Search result type definitions

use serde::{Deserialize, Serialize};

/// One page of matches as returned by the query executor
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total number of records matching the query server-side
    pub total_matches: u64,
    /// Zero-based index of the first record of this page
    pub start_offset: u64,
    /// Requested page size
    pub page_size: u64,
    /// Original search terms
    pub query: String,
    /// Records of this page, in relevance order
    pub records: Vec<Record>,
}

impl SearchResult {
    /// Create an empty page for a query
    pub fn new(query: impl Into<String>, start_offset: u64, page_size: u64) -> Self {
        Self {
            total_matches: 0,
            start_offset,
            page_size,
            query: query.into(),
            records: Vec::new(),
        }
    }

    /// Set the server-side match count
    pub fn with_total(mut self, total_matches: u64) -> Self {
        self.total_matches = total_matches;
        self
    }

    /// Append a record to the page
    pub fn with_record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    /// Verify the page is internally consistent.
    ///
    /// A page never holds more records than its size and never claims more
    /// records than exist in total.
    pub fn check_page(&self) -> std::result::Result<(), String> {
        if self.page_size == 0 {
            return Err("page size must be positive".to_string());
        }
        let len = self.records.len() as u64;
        if len > self.page_size {
            return Err(format!(
                "page holds {} records but page size is {}",
                len, self.page_size
            ));
        }
        // An empty page past the last match claims nothing
        if len > 0 {
            match self.start_offset.checked_add(len) {
                Some(end) if end <= self.total_matches => {}
                Some(end) => {
                    return Err(format!(
                        "records {}..{} exceed total of {} matches",
                        self.start_offset, end, self.total_matches
                    ));
                }
                None => {
                    return Err(format!(
                        "start offset {} overflows with {} records",
                        self.start_offset, len
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A single matched document.
///
/// Scalar fields stay optional here because the search engine may omit any
/// stored value; whether that is acceptable is decided during translation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    pub id: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub sender: Option<String>,
    /// RFC 3339 timestamp
    pub date: Option<String>,
    #[serde(default)]
    pub receivers: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Record {
    /// Create a record with every scalar field set
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        sender: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            subject: Some(subject.into()),
            body: Some(body.into()),
            sender: Some(sender.into()),
            date: Some(date.into()),
            receivers: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_receivers<I, S>(mut self, receivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.receivers = receivers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> Record {
        Record::new(id, "subject", "body", "a@example.com", "2024-09-14T23:16:18Z")
    }

    #[test]
    fn test_consistent_page() {
        let page = SearchResult::new("q", 0, 2)
            .with_total(5)
            .with_record(record("1"))
            .with_record(record("2"));
        assert!(page.check_page().is_ok());
    }

    #[test]
    fn test_page_larger_than_size() {
        let page = SearchResult::new("q", 0, 1)
            .with_total(5)
            .with_record(record("1"))
            .with_record(record("2"));
        assert!(page.check_page().is_err());
    }

    #[test]
    fn test_page_beyond_total() {
        let page = SearchResult::new("q", 4, 10)
            .with_total(5)
            .with_record(record("5"))
            .with_record(record("6"));
        let err = page.check_page().unwrap_err();
        assert!(err.contains("exceed total"));
    }

    #[test]
    fn test_start_offset_overflow() {
        let page = SearchResult::new("q", u64::MAX, 10)
            .with_total(5)
            .with_record(record("1"));
        let err = page.check_page().unwrap_err();
        assert!(err.contains("overflows"));
    }

    #[test]
    fn test_zero_page_size() {
        let page = SearchResult::new("q", 0, 0);
        assert!(page.check_page().is_err());
    }

    #[test]
    fn test_empty_page_past_end() {
        let page = SearchResult::new("q", 40, 10).with_total(3);
        assert!(page.check_page().is_ok());
    }
}
