use std::net::SocketAddr;

use serde::Deserialize;

use crate::health::HealthConfig;

/// HTTP server configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address, defaults to `0.0.0.0:3000` when unset
    pub listen_address: Option<SocketAddr>,
    /// Health check endpoint
    #[serde(default)]
    pub health: HealthConfig,
}
