//! Request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::Json;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use certum_types::Verdict;

use crate::server::ApiState;
use crate::ApiError;

#[derive(Debug, Deserialize)]
pub struct VerifyBody {
    pub input: String,
}

/// `GET /verify?...`. An `input` parameter is verified as given; otherwise
/// the request URI itself is handed to the resolver, which knows the
/// identifier-carrying parameters.
pub async fn verify_query(
    State(state): State<Arc<ApiState>>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Verdict>, ApiError> {
    if params.is_empty() {
        return Err(ApiError::MissingInput);
    }
    let raw = match params.get("input") {
        Some(input) => input.clone(),
        None => uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .ok_or(ApiError::MissingInput)?,
    };
    debug!(input = %raw, "verify query");
    Ok(Json(state.verifier.verify(&raw).await))
}

/// `POST /verify` with `{"input": ...}`.
pub async fn verify_body(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<VerifyBody>, JsonRejection>,
) -> Result<Json<Verdict>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    if body.input.trim().is_empty() {
        return Err(ApiError::MissingInput);
    }
    Ok(Json(state.verifier.verify(&body.input).await))
}

/// `GET /result/:id`.
pub async fn result(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Json<Verdict> {
    Json(state.verifier.verify(&format!("/result/{id}")).await)
}

/// `GET /health`.
pub async fn health(State(state): State<Arc<ApiState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "cluster": state.verifier.cluster().as_str(),
    }))
}
