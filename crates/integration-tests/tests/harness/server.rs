//! Test server wrapper that starts Vox on a random port

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use vox_config::Config;
use vox_mq::{ChannelBroker, MqConnector};
use vox_server::Server;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
    connector: Arc<MqConnector>,
    broker: Arc<ChannelBroker>,
}

impl TestServer {
    /// Start a test server over an in-process channel broker
    ///
    /// Binds to port 0 for automatic port assignment. The broker is
    /// returned through [`broker`](Self::broker) so tests can attach
    /// workers to it.
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let broker = Arc::new(ChannelBroker::new());
        let connector = MqConnector::start(broker.clone(), config.broker.clone())
            .await
            .map_err(|e| anyhow::anyhow!("connector start failed: {e}"))?;

        let server = Server::new(&config, Arc::clone(&connector));
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self {
            addr,
            shutdown,
            client,
            connector,
            broker,
        })
    }

    /// Full URL for a path on the running server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// The in-process broker workers attach to
    pub fn broker(&self) -> Arc<ChannelBroker> {
        Arc::clone(&self.broker)
    }

    /// The connector behind the server, for registry assertions
    pub fn connector(&self) -> &Arc<MqConnector> {
        &self.connector
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
        self.connector.shutdown();
    }
}
