#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! HTTP surface of the Vox gateway
//!
//! A thin axum layer over the [`vox_mq::MqConnector`]: validate,
//! call, map the outcome to a transport response.

mod error;
mod routes;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use uuid::Uuid;
use vox_config::{Config, SpeakerConfig};
use vox_mq::{MqConnector, MqError, SynthesisPayload};

pub use error::ErrorMessage;
pub use types::{Catalog, Speaker, SynthesisRequest};

/// Shared state for the request handlers
pub struct AppState {
    connector: Arc<MqConnector>,
    speakers: IndexMap<String, SpeakerConfig>,
}

impl AppState {
    /// Validate and run one synthesis call with the default time budget
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<(SynthesisPayload, Uuid), MqError> {
        request.validate(&self.speakers)?;

        self.connector
            .call(request, &request.speaker, self.connector.default_timeout())
            .await
    }
}

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration and a started connector
    pub fn new(config: &Config, connector: Arc<MqConnector>) -> Self {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let state = Arc::new(AppState {
            connector,
            speakers: config.speakers.clone(),
        });

        let mut app = Router::new()
            .route("/v2", get(routes::get_catalog).post(routes::synthesize))
            .route("/v2/verbose", post(routes::synthesize_verbose))
            .route("/v2/stream_with_headers", post(routes::synthesize_with_headers))
            .with_state(state);

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health_handler));
        }

        app = app.layer(TraceLayer::new_for_http());

        Self {
            router: app,
            listen_address,
        }
    }

    /// Consume the server, returning its router (test harness hook)
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve until the cancellation token fires
    ///
    /// # Errors
    ///
    /// Returns an error if binding the listener or serving fails
    pub async fn serve(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        tracing::info!(address = %self.listen_address, "vox listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
            })
            .await?;

        Ok(())
    }
}

/// Liveness probe
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
