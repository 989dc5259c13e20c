//! Shared application state for the HTTP server.

use std::sync::Arc;

use prompter_core::Broker;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// broker is the only route to prompt state from any handler.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide prompt broker.
    pub broker: Arc<Broker>,
}

impl AppState {
    /// Create application state around an existing broker.
    pub const fn new(broker: Arc<Broker>) -> Self {
        Self { broker }
    }
}
