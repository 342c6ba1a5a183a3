pub mod routes;

use crate::config::Config;
use anyhow::{Context, Result};
use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Serves the logbook API on localhost until `shutdown` resolves.
pub async fn run_server<F>(config: Arc<Config>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, config.api_port));
    let app = routes::router(routes::ApiState { config });

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind logbook API on {addr}"))?;
    info!(address = %addr, "logbook API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .with_context(|| format!("Logbook API on {addr} stopped unexpectedly"))?;

    info!("logbook API stopped");
    Ok(())
}
