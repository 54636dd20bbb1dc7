//! Solr JSON select response parsing

use crate::config::FieldMap;
use crate::error::{FeedError, Result};
use crate::query::PageRequest;
use crate::results::{Record, SearchResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Solr's own default for `rows`
const SOLR_DEFAULT_ROWS: u64 = 10;

#[derive(Debug, Deserialize)]
struct SelectResponse {
    #[serde(rename = "responseHeader", default)]
    header: ResponseHeader,
    response: Option<DocList>,
    error: Option<SolrError>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseHeader {
    #[serde(default)]
    params: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct DocList {
    #[serde(rename = "numFound")]
    num_found: u64,
    #[serde(default)]
    start: u64,
    #[serde(default)]
    docs: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct SolrError {
    msg: Option<String>,
}

/// Parse a JSON select response into a result page.
///
/// Without a `request`, the query and page size are read from the echoed
/// `responseHeader.params`.
pub fn parse_select_response(
    text: &str,
    fields: &FieldMap,
    request: Option<&PageRequest>,
) -> Result<SearchResult> {
    let parsed: SelectResponse = serde_json::from_str(text)
        .map_err(|e| FeedError::UpstreamQueryFailure(format!("invalid Solr response: {}", e)))?;

    if let Some(error) = parsed.error {
        return Err(FeedError::UpstreamQueryFailure(
            error.msg.unwrap_or_else(|| "Solr reported an error".to_string()),
        ));
    }

    let doc_list = parsed.response.ok_or_else(|| {
        FeedError::UpstreamQueryFailure("Solr response has no result list".to_string())
    })?;

    let (query, page_size) = match request {
        Some(req) => (req.terms.clone(), req.count),
        None => {
            let params = &parsed.header.params;
            let query = param(params, "q").unwrap_or_default();
            let rows = param(params, "rows")
                .and_then(|r| r.parse().ok())
                .unwrap_or(SOLR_DEFAULT_ROWS);
            (query, rows)
        }
    };

    let result = SearchResult {
        total_matches: doc_list.num_found,
        start_offset: doc_list.start,
        page_size,
        query,
        records: doc_list
            .docs
            .iter()
            .map(|doc| record_from_doc(doc, fields))
            .collect(),
    };

    result
        .check_page()
        .map_err(|e| FeedError::UpstreamQueryFailure(format!("inconsistent page: {}", e)))?;

    Ok(result)
}

/// Map a stored Solr document onto a record
pub fn record_from_doc(doc: &Map<String, Value>, fields: &FieldMap) -> Record {
    Record {
        id: scalar(doc, &fields.id),
        subject: scalar(doc, &fields.subject),
        body: scalar(doc, &fields.body),
        sender: scalar(doc, &fields.sender),
        date: scalar(doc, &fields.date),
        receivers: list(doc, &fields.receivers),
        tags: list(doc, &fields.tags),
    }
}

/// Single value of a field; multi-valued fields yield their first value
fn scalar(doc: &Map<String, Value>, name: &str) -> Option<String> {
    match doc.get(name)? {
        Value::Array(values) => values.iter().find_map(text),
        other => text(other),
    }
}

fn list(doc: &Map<String, Value>, name: &str) -> Vec<String> {
    match doc.get(name) {
        Some(Value::Array(values)) => values.iter().filter_map(text).collect(),
        Some(other) => text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn param(params: &HashMap<String, Value>, name: &str) -> Option<String> {
    match params.get(name)? {
        Value::Array(values) => values.first().and_then(text),
        other => text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "responseHeader": {
                "status": 0,
                "QTime": 3,
                "params": { "q": "scientist", "rows": "10", "wt": "json" }
            },
            "response": {
                "numFound": 1,
                "start": 0,
                "numFoundExact": true,
                "docs": [{
                    "id": "b3249981",
                    "subject": ["Congress dog determine relate admit win trade."],
                    "body": ["Whose scientist thought arm."],
                    "sender": "james70@example.net",
                    "date": "2024-09-14T23:16:18Z",
                    "receivers": ["a@x.com", "b@x.com"],
                    "tags": "single",
                    "_version_": 1810000000000000000u64
                }]
            }
        })
    }

    #[test]
    fn test_parse_with_request() {
        let request = PageRequest::new("scientist", 0, 25);
        let result =
            parse_select_response(&sample().to_string(), &FieldMap::default(), Some(&request))
                .unwrap();

        assert_eq!(result.total_matches, 1);
        assert_eq!(result.start_offset, 0);
        assert_eq!(result.page_size, 25);
        assert_eq!(result.query, "scientist");

        let record = &result.records[0];
        assert_eq!(record.id.as_deref(), Some("b3249981"));
        assert_eq!(
            record.subject.as_deref(),
            Some("Congress dog determine relate admit win trade.")
        );
        assert_eq!(record.sender.as_deref(), Some("james70@example.net"));
        assert_eq!(record.receivers, ["a@x.com", "b@x.com"]);
        assert_eq!(record.tags, ["single"]);
    }

    #[test]
    fn test_parse_from_echoed_params() {
        let result = parse_select_response(&sample().to_string(), &FieldMap::default(), None)
            .unwrap();
        assert_eq!(result.query, "scientist");
        assert_eq!(result.page_size, 10);
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let body = json!({
            "response": { "numFound": 1, "start": 0, "docs": [{ "id": 42 }] }
        });
        let result = parse_select_response(&body.to_string(), &FieldMap::default(), None).unwrap();

        let record = &result.records[0];
        assert_eq!(record.id.as_deref(), Some("42"));
        assert_eq!(record.sender, None);
        assert!(record.receivers.is_empty());
    }

    #[test]
    fn test_custom_field_map() {
        let fields = FieldMap {
            sender: "from_address".to_string(),
            ..Default::default()
        };
        let body = json!({
            "response": { "numFound": 1, "start": 0, "docs": [{ "from_address": "x@y.z" }] }
        });
        let result = parse_select_response(&body.to_string(), &fields, None).unwrap();
        assert_eq!(result.records[0].sender.as_deref(), Some("x@y.z"));
    }

    #[test]
    fn test_solr_error_body() {
        let body = json!({
            "responseHeader": { "status": 400 },
            "error": { "msg": "undefined field foo", "code": 400 }
        });
        let err = parse_select_response(&body.to_string(), &FieldMap::default(), None).unwrap_err();
        assert!(matches!(err, FeedError::UpstreamQueryFailure(ref m) if m == "undefined field foo"));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_select_response("<html>", &FieldMap::default(), None).unwrap_err();
        assert!(matches!(err, FeedError::UpstreamQueryFailure(_)));
    }

    #[test]
    fn test_inconsistent_page_rejected() {
        let body = json!({
            "response": { "numFound": 1, "start": 0, "docs": [{ "id": "1" }, { "id": "2" }] }
        });
        let err = parse_select_response(&body.to_string(), &FieldMap::default(), None).unwrap_err();
        assert!(matches!(err, FeedError::UpstreamQueryFailure(_)));
    }

    #[test]
    fn test_overflowing_start_rejected() {
        let body = json!({
            "response": { "numFound": 5, "start": u64::MAX, "docs": [{ "id": "1" }] }
        });
        let err = parse_select_response(&body.to_string(), &FieldMap::default(), None).unwrap_err();
        assert!(matches!(err, FeedError::UpstreamQueryFailure(_)));
    }
}
