#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::sync::Arc;

use args::Args;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use vox_config::Config;
use vox_mq::{Broker, ChannelBroker, MqConnector, RedisBroker};
use vox_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    if let Some(listen) = args.listen {
        config.server.listen_address = Some(listen);
    }

    tracing::info!(
        config_path = %args.config.display(),
        speakers = config.speakers.len(),
        "starting vox"
    );

    // Connect the broker bridge
    let broker: Arc<dyn Broker> = match config.broker.url {
        Some(ref url) => Arc::new(RedisBroker::new(url).map_err(|e| anyhow::anyhow!("broker setup failed: {e}"))?),
        None => {
            tracing::warn!("broker.url not set, using the in-process channel broker");
            Arc::new(ChannelBroker::new())
        }
    };

    let connector = MqConnector::start(broker, config.broker.clone())
        .await
        .map_err(|e| anyhow::anyhow!("failed to start mq connector: {e}"))?;

    // Build server
    let server = Server::new(&config, Arc::clone(&connector));

    // Set up graceful shutdown
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    // Run server
    server.serve(shutdown).await?;

    // Fail any calls still in flight so nothing waits forever
    connector.shutdown();

    tracing::info!("vox stopped");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
