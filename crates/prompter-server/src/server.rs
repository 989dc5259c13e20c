//! HTTP server lifecycle management.
//!
//! Provides [`start_server`] which binds to a loopback TCP port and runs
//! the Axum server until the provided shutdown future completes.

use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Configuration for the HTTP server.
///
/// The server only ever binds to loopback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// The TCP port to listen on; `0` picks a free port.
    pub port: u16,
}

impl ServerConfig {
    /// Configuration for the given port.
    pub const fn new(port: u16) -> Self {
        Self { port }
    }

    /// The loopback address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 5533 }
    }
}

/// Bind the listener for `config`.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the port is unavailable.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let addr = config.addr();
    TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))
}

/// Serve requests on an already bound listener until `shutdown`
/// completes, then finish in-flight requests and release the listener.
///
/// # Errors
///
/// Returns [`ServerError::Serve`] on a fatal I/O error.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    info!("Prompter server stopped");
    Ok(())
}

/// Bind and run the HTTP server until `shutdown` completes.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind or the server
/// encounters a fatal I/O error.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = bind(config).await?;
    log_listening(config.addr());
    serve(listener, state, shutdown).await
}

/// Log the API and panel addresses once the listener is bound.
pub(crate) fn log_listening(addr: SocketAddr) {
    info!(%addr, panel = %format!("http://{addr}/panel"), "Prompter listening");
}

/// Errors that can occur when starting or running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
