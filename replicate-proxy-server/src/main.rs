//! Replicate Proxy Server
//!
//! Two ways in:
//! - `serve`: HTTP listener; every request goes through the dispatcher
//! - `invoke`: one trigger event (gateway / edge / direct JSON) from a file
//!   or stdin, reply printed to stdout
//!
//! Access via: http://localhost:3000

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

mod cli;
mod invoke;
mod router;
mod server_utils;
mod state;
#[cfg(test)]
mod test_helpers;

use cli::{Cli, Commands};
use replicate_proxy_core::{config, logger, PredictionBackend, ReplicateClient};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let resolved = config::resolve_env();
    let settings = resolved.settings.clone();
    logger::init(settings.log_level);
    resolved.report();

    let backend: Arc<dyn PredictionBackend> = Arc::new(ReplicateClient::from_settings(&settings)?);

    match cli.command {
        Some(Commands::Invoke { event }) => {
            invoke::run(event.as_deref(), &settings, backend.as_ref()).await
        },
        Some(Commands::Serve { host, port }) => serve(&host, port, backend).await,
        None => serve(&cli.host, cli.port, backend).await,
    }
}

async fn serve(host: &str, port: u16, backend: Arc<dyn PredictionBackend>) -> Result<()> {
    info!("Replicate proxy starting on {}:{}...", host, port);

    let app = router::build_router(AppState::new(backend));
    let listener = server_utils::create_listener(host, port).await?;

    info!("Listening on http://{}", listener.local_addr()?);
    info!("Proxy endpoint at http://{}/api/replicate", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(server_utils::shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
