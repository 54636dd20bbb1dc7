//! Solr select handler executor

use super::response::parse_select_response;
use super::traits::QueryExecutor;
use crate::config::{FieldMap, SolrMethod, SolrSettings, RESERVED_SOLR_PARAMS};
use crate::error::{FeedError, Result};
use crate::network::{HttpClient, HttpRequest, HttpResponse};
use crate::query::PageRequest;
use crate::results::SearchResult;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// Runs paged queries against one Solr core
pub struct SolrExecutor {
    client: HttpClient,
    select_url: String,
    method: SolrMethod,
    fields: FieldMap,
    query_fields: Vec<String>,
    extra_params: Vec<(String, String)>,
}

impl SolrExecutor {
    /// Create an executor for the configured core
    pub fn new(client: HttpClient, solr: &SolrSettings, fields: FieldMap) -> anyhow::Result<Self> {
        let base = Url::parse(&solr.base_url)?;
        let select_url = format!(
            "{}/{}/select",
            base.as_str().trim_end_matches('/'),
            solr.core
        );

        let query_fields = if solr.query_fields.is_empty() {
            fields.text_fields().into_iter().map(String::from).collect()
        } else {
            solr.query_fields.clone()
        };

        // Sorted so identical settings always produce identical requests
        let mut extra_params: Vec<(String, String)> = solr
            .extra_params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        extra_params.sort();

        Ok(Self {
            client,
            select_url,
            method: solr.method,
            fields,
            query_fields,
            extra_params,
        })
    }

    /// Select handler URL
    pub fn select_url(&self) -> &str {
        &self.select_url
    }

    /// Build the select request for a page
    pub fn build_request(&self, page: &PageRequest) -> HttpRequest {
        let request = match self.method {
            SolrMethod::Get => HttpRequest::get(&self.select_url),
            SolrMethod::Post => HttpRequest::post(&self.select_url),
        };

        let mut request = request
            .header("Accept", "application/json")
            .param("q", page.terms.as_str())
            .param("start", page.start.to_string())
            .param("rows", page.count.to_string())
            .param("wt", "json")
            .param("fl", self.fields.stored_fields().join(","))
            .param("defType", "edismax")
            .param("qf", self.query_fields.join(" "));

        for (key, value) in &self.extra_params {
            if RESERVED_SOLR_PARAMS.contains(&key.as_str()) {
                continue;
            }
            match request.params.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1 = value.clone(),
                None => request.params.push((key.clone(), value.clone())),
            }
        }

        request
    }
}

#[async_trait]
impl QueryExecutor for SolrExecutor {
    fn name(&self) -> &str {
        "solr"
    }

    async fn execute(&self, page: &PageRequest) -> Result<SearchResult> {
        let request = self.build_request(page);
        let start = Instant::now();

        debug!(
            "Querying {} for '{}' (start={}, rows={})",
            self.select_url, page.terms, page.start, page.count
        );

        let response = self.client.execute(request).await.map_err(|e| {
            warn!("Solr request failed: {:#}", e);
            FeedError::UpstreamQueryFailure(format!("{:#}", e))
        })?;

        if !response.is_success() {
            let detail = error_detail(&response);
            warn!("Solr returned HTTP {}: {}", response.status, detail);
            return Err(FeedError::UpstreamQueryFailure(format!(
                "Solr returned HTTP {}: {}",
                response.status, detail
            )));
        }

        let result = parse_select_response(&response.text, &self.fields, Some(page))?;

        debug!(
            "Solr returned {} of {} matches in {:?}",
            result.records.len(),
            result.total_matches,
            start.elapsed()
        );

        Ok(result)
    }
}

/// Error message from a failed Solr response, falling back to the body
fn error_detail(response: &HttpResponse) -> String {
    response
        .json::<serde_json::Value>()
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("msg"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| response.text.chars().take(200).collect())
}
