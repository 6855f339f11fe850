use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::router::AppState;
use super::types::{parse_limit, ApiError, QueryParams};
use crate::models::DocId;

/// `GET /search?q=<query>&l=<limit>`: posting ids as a JSON array.
pub async fn search(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let params = QueryParams::parse(raw.as_deref().unwrap_or(""))?;
    let query = params.unique("q")?.unwrap_or("");
    let limit = parse_limit(params.unique("l")?)?;

    let started = Instant::now();
    state.metrics.searches_total.inc();

    let postings = state.index.search(query, limit).map_err(|err| {
        state.metrics.search_errors.inc();
        ApiError::SearchFailed(err)
    })?;

    state
        .metrics
        .search_latency
        .observe(started.elapsed().as_secs_f64());

    Ok(Json(postings))
}

/// `GET /docs?ids=<space-separated>&l=<limit>`: one raw document per
/// line, in requested order.
pub async fn docs(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let documents = state
        .docs
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("no documents loaded".to_owned()))?;

    let params = QueryParams::parse(raw.as_deref().unwrap_or(""))?;
    let limit = parse_limit(params.unique("l")?)?;

    let selected: Vec<DocId> = match params.concatenated("ids") {
        Some(ids) => {
            let mut selected = Vec::new();
            for raw_id in ids.split(' ').filter(|s| !s.is_empty()) {
                if let Some(limit) = limit {
                    if selected.len() >= limit {
                        break;
                    }
                }
                let id: DocId = raw_id
                    .parse()
                    .map_err(|_| ApiError::BadRequest(format!("non-numeric id: '{raw_id}'")))?;
                if !documents.contains_key(&id) {
                    return Err(ApiError::NotFound(format!("invalid document id: {id}")));
                }
                selected.push(id);
            }
            if limit != Some(0) && selected.is_empty() {
                return Err(ApiError::BadRequest(
                    "no document ids have been passed".to_owned(),
                ));
            }
            selected
        }
        None => {
            let mut selected: Vec<DocId> = documents.keys().copied().collect();
            if let Some(limit) = limit {
                selected.truncate(limit);
            }
            selected
        }
    };

    let mut body = Vec::new();
    for id in &selected {
        body.extend_from_slice(&documents[id]);
        body.push(b'\n');
    }
    state.metrics.documents_served.inc_by(selected.len() as f64);

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    ))
}

/// `GET /rawIndex`: the serialized index blob, byte-exact.
pub async fn raw_index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        state.index.raw_bytes(),
    )
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

/// `GET /metrics`
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, state.metrics.render())
}
