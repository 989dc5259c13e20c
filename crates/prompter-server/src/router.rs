//! Axum router construction for the prompt API and panel host.
//!
//! Assembles all routes into a single [`Router`] with request tracing and
//! per-request panic containment.

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::ApiError;
use crate::handlers;
use crate::panel;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `POST /prompt` -- submit a prompt
/// - `GET /wait` -- long-held wait for an answer
/// - `POST /answer` -- answer a prompt
/// - `GET /panel` -- panel page
/// - `GET /panel/ws` -- panel `WebSocket`
///
/// Any other method or path gets `404 Not found`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Prompt API
        .route(
            "/prompt",
            post(handlers::submit_prompt).fallback(handlers::not_found),
        )
        .route(
            "/wait",
            get(handlers::wait_for_answer).fallback(handlers::not_found),
        )
        .route(
            "/answer",
            post(handlers::answer_prompt).fallback(handlers::not_found),
        )
        // Panel host
        .route("/panel", get(panel::panel_page).fallback(handlers::not_found))
        .route("/panel/ws", get(panel::panel_ws).fallback(handlers::not_found))
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn a panic inside a handler into a `500` for that request only.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| (*s).to_owned()))
        .unwrap_or_else(|| String::from("unknown fault"));
    warn!(error = %detail, "Request handler panicked");
    ApiError::Internal(detail).into_response()
}
