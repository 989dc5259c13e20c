//! Server startup helper for embedding in a host process.
//!
//! Provides [`spawn_server`] which binds eagerly and launches the HTTP
//! server on a background Tokio task, and [`ServerHandle`] which stops
//! it again. Stopping shuts the broker down first, so suspended
//! `GET /wait` requests complete and graceful shutdown can release the
//! listener.
//!
//! # Usage
//!
//! ```rust,ignore
//! use prompter_server::{spawn_server, AppState, ServerConfig};
//! use std::sync::Arc;
//!
//! let broker = Arc::new(Broker::new()?);
//! let handle = spawn_server(&ServerConfig::new(5533), Arc::new(AppState::new(broker))).await?;
//! // ...
//! handle.stop().await?;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use prompter_core::Broker;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError, bind, log_listening, serve};
use crate::state::AppState;

/// Errors that can occur when spawning or stopping the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or exited with an error.
    #[error("server error: {0}")]
    Server(#[from] ServerError),

    /// The server task panicked or was cancelled.
    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A running server on a background task.
pub struct ServerHandle {
    local_addr: SocketAddr,
    broker: Arc<Broker>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<Result<(), ServerError>>,
}

impl ServerHandle {
    /// The address actually bound (useful with port `0`).
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Shut the broker down, stop accepting connections, and wait for the
    /// server task to release the listener.
    ///
    /// # Errors
    ///
    /// Returns the server's own error if it failed while serving, or
    /// [`StartupError::Task`] if its task panicked.
    pub async fn stop(self) -> Result<(), StartupError> {
        self.broker.shutdown().await;
        if self.shutdown.send(()).is_err() {
            tracing::debug!("Server task already finished");
        }
        self.task.await??;
        Ok(())
    }
}

/// Spawn the HTTP server on a background Tokio task.
///
/// Binds before spawning so that an unavailable port is reported to the
/// caller instead of being logged from the background task.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the listener cannot bind.
pub async fn spawn_server(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<ServerHandle, StartupError> {
    let listener = bind(config).await?;
    let local_addr = listener.local_addr().map_err(|e| {
        StartupError::Server(ServerError::Bind(format!("no local address: {e}")))
    })?;
    log_listening(local_addr);

    let broker = Arc::clone(&state.broker);
    let (shutdown, shutdown_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let signal = async move {
            let _stopped = shutdown_rx.await;
        };
        let result = serve(listener, state, signal).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Prompter server exited with error");
        }
        result
    });

    Ok(ServerHandle {
        local_addr,
        broker,
        shutdown,
        task,
    })
}
