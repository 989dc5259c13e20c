//! Error types for the Prompter binary.
//!
//! [`AppError`] is the top-level error type that wraps every failure mode
//! during startup and shutdown.

/// Top-level error for the Prompter binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: prompter_core::ConfigError,
    },

    /// The panel template could not be prepared.
    #[error("panel error: {source}")]
    Panel {
        /// The underlying panel error.
        #[from]
        source: prompter_core::PanelError,
    },

    /// The HTTP server failed to start or stop cleanly.
    #[error("server error: {source}")]
    Server {
        /// The underlying startup error.
        #[from]
        source: prompter_server::StartupError,
    },

    /// Waiting for the shutdown signal failed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
