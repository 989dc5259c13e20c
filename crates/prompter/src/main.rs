//! Prompter broker binary.
//!
//! Runs the prompt broker on a loopback port: external processes submit
//! prompts and wait for answers over HTTP, and a human answers them in the
//! panel at `http://127.0.0.1:<port>/panel`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `prompter-config.yaml` (+ `PROMPTER_PORT`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the broker
//! 4. Bind and start the HTTP server
//! 5. Wait for Ctrl-C, then stop the server and release the port

mod error;

use std::path::Path;
use std::sync::Arc;

use prompter_core::config::CONFIG_FILE;
use prompter_core::{Broker, PrompterConfig};
use prompter_server::{AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, startup, or shutdown fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration. Logging is not up yet, so report after init.
    let config_path = Path::new(CONFIG_FILE);
    let config = PrompterConfig::load(config_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        port = config.server.port,
        config_file_found = config_path.exists(),
        "prompter starting"
    );

    // 3. Create the broker.
    let broker = Arc::new(Broker::new()?);

    // 4. Start the HTTP server.
    let state = Arc::new(AppState::new(Arc::clone(&broker)));
    let handle =
        prompter_server::spawn_server(&ServerConfig::new(config.server.port), state).await?;
    info!(addr = %handle.local_addr(), "Prompt API ready");

    // 5. Run until interrupted.
    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    handle.stop().await?;

    info!("prompter shutdown complete");
    Ok(())
}
