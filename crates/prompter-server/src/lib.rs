//! Local HTTP front door and panel host for the Prompter broker.
//!
//! This crate provides an Axum server bound to loopback that exposes:
//!
//! - **Prompt API** -- `POST /prompt`, `GET /wait?id=`, `POST /answer`,
//!   plain JSON for external callers
//! - **Panel host** -- `GET /panel` serves the panel page, which connects
//!   to `GET /panel/ws`; that `WebSocket` is the human-facing surface
//!
//! # Architecture
//!
//! Handlers never touch broker state directly; they call the gateway
//! operations on [`prompter_core::Broker`]. A long `GET /wait` holds its
//! connection open by awaiting the broker's one-shot signal. Faults are
//! contained per request: panics are caught at the outermost layer and
//! turned into `500` responses.

pub mod error;
pub mod handlers;
pub mod panel;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{ServerHandle, StartupError, spawn_server};
pub use state::AppState;
