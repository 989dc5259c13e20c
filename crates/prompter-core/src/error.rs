//! Error types for the broker core.

/// Errors surfaced by the gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// No prompt exists with the given id.
    #[error("unknown prompt id: {0}")]
    NotFound(String),

    /// The broker shut down while the caller was waiting.
    #[error("broker is shutting down")]
    Closed,
}

/// Errors raised while rendering the panel.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// The panel template failed to compile or render.
    #[error("panel template error: {0}")]
    Template(#[from] minijinja::Error),
}
