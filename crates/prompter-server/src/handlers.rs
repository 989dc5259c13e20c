//! Prompt API endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/prompt` | Submit a prompt, returns `{id}` |
//! | `GET` | `/wait?id=ID` | Hold until answered, returns `{id, answer}` |
//! | `POST` | `/answer` | Answer a prompt, returns `{ok: true}` |
//!
//! Bodies are read as raw bytes and parsed leniently: the `Content-Type`
//! header is not required, an empty body counts as `{}`, and mistyped
//! fields are coerced (see [`prompter_types::wire`]).

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use prompter_core::{AnswerOutcome, AnswerSource};
use prompter_types::{
    AnswerRequest, AnswerResponse, PromptId, SubmitRequest, SubmitResponse, WaitResponse,
};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /wait` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct WaitQuery {
    /// Prompt to wait on; a missing id is treated as `""`.
    pub id: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /prompt
// ---------------------------------------------------------------------------

/// Create a prompt from the caller's message and options.
///
/// Never fails on well-formed JSON: missing or mistyped fields fall back
/// to an empty message and no options.
pub async fn submit_prompt(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let body = parse_body(&body)?;
    let id = state.broker.submit(SubmitRequest::from_json(&body)).await;
    Ok(Json(SubmitResponse { id }))
}

// ---------------------------------------------------------------------------
// GET /wait
// ---------------------------------------------------------------------------

/// Return the prompt's answer, holding the connection open until there
/// is one.
///
/// Unknown ids fail with `404` immediately. There is no server-side
/// timeout.
pub async fn wait_for_answer(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WaitQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let raw_id = query.id.unwrap_or_default();
    let answer = state.broker.wait(&raw_id).await?;
    let id = PromptId::parse(&raw_id).ok_or_else(|| ApiError::NotFound(raw_id.clone()))?;
    Ok(Json(WaitResponse { id, answer }))
}

// ---------------------------------------------------------------------------
// POST /answer
// ---------------------------------------------------------------------------

/// Answer a prompt.
///
/// Responds `{ok: true}` both for a fresh answer and for a prompt that
/// was already answered; only an unknown id is an error.
pub async fn answer_prompt(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request = AnswerRequest::from_json(&parse_body(&body)?);
    let outcome = state
        .broker
        .answer(&request.id, request.answer, AnswerSource::Network)
        .await?;
    if outcome == AnswerOutcome::AlreadyAnswered {
        debug!(prompt_id = %request.id, "Answer ignored, reporting ok");
    }
    Ok(Json(AnswerResponse { ok: true }))
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

/// Any other method or path.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Parse a request body as JSON, treating an empty body as `{}`.
fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_an_empty_object() {
        assert_eq!(parse_body(b"").unwrap(), serde_json::json!({}));
    }

    #[test]
    fn invalid_json_is_a_bad_request() {
        assert!(matches!(parse_body(b"{not json"), Err(ApiError::BadRequest(_))));
    }
}
