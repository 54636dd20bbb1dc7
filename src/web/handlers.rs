//! HTTP request handlers

use super::state::AppState;
use crate::error::{FeedError, Result};
use crate::query::{OutputFormat, PageRequest, SearchParams};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::time::Instant;

/// Content type of search result feeds
pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml; charset=utf-8";

/// Content type of the description document
pub const DESCRIPTION_CONTENT_TYPE: &str = "application/opensearchdescription+xml; charset=utf-8";

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let status = match self {
            FeedError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            FeedError::MissingRequiredField { .. } | FeedError::MalformedRecord { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            FeedError::UpstreamQueryFailure(_) => StatusCode::BAD_GATEWAY,
            FeedError::PagingIndexMismatch { .. } | FeedError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!("Search failed: {}", self);
        } else {
            tracing::warn!("Search rejected: {}", self);
        }

        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Search handler: runs the query and returns the translated feed
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let started = Instant::now();
    state.metrics.inc_search();

    let response = match run_search(&state, &params).await {
        Ok(response) => response,
        Err(e) => {
            match &e {
                FeedError::UpstreamQueryFailure(_) => state.metrics.record_upstream_failure(),
                e if e.is_record_level() => state.metrics.record_translation_failure(),
                _ => {}
            }
            e.into_response()
        }
    };

    state
        .metrics
        .record_response_time(started.elapsed().as_millis() as u64);
    response
}

async fn run_search(state: &AppState, params: &SearchParams) -> Result<Response> {
    let format = OutputFormat::from_params(params)?;
    let page = PageRequest::from_params(params, &state.settings.opensearch)?;

    let result = state.executor.execute(&page).await?;
    let feed = state.translator.translate(&result)?;

    state
        .metrics
        .record_translation(feed.len(), result.records.len() - feed.len());

    match format {
        OutputFormat::Json => Ok(Json(feed).into_response()),
        OutputFormat::Atom => {
            let xml = state.templates.render_feed(&feed)?;
            Ok(([(header::CONTENT_TYPE, ATOM_CONTENT_TYPE)], xml).into_response())
        }
    }
}

/// OpenSearch description handler
pub async fn description(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, DESCRIPTION_CONTENT_TYPE)],
        state.description_xml.as_str().to_owned(),
    )
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "executor": state.executor.name(),
    }))
}

/// Metrics handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
