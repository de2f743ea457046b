use std::time::Duration;

use serde::Deserialize;

/// Broker and request/reply configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    /// Broker URL (e.g. `redis://localhost:6379`). When unset the
    /// gateway runs with the in-process channel broker, which is only
    /// useful for tests and local experiments.
    #[serde(default)]
    pub url: Option<String>,
    /// Destination prefix for outbound synthesis jobs; the speaker
    /// routing key is appended (`<prefix>.<speaker>`)
    #[serde(default = "default_request_prefix")]
    pub request_prefix: String,
    /// Destination this process consumes worker replies from
    #[serde(default = "default_reply_destination")]
    pub reply_destination: String,
    /// Per-call time budget when the caller does not supply one
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
    /// How often the timeout supervisor sweeps for expired calls
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

impl BrokerConfig {
    /// Destination a job for `routing_key` is published to
    pub fn request_destination(&self, routing_key: &str) -> String {
        format!("{}.{routing_key}", self.request_prefix)
    }

    pub const fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: None,
            request_prefix: default_request_prefix(),
            reply_destination: default_reply_destination(),
            default_timeout_secs: default_timeout_secs(),
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}

fn default_request_prefix() -> String {
    "vox.requests".to_string()
}

fn default_reply_destination() -> String {
    "vox.replies".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_secs() -> u64 {
    45
}

#[allow(clippy::missing_const_for_fn)]
fn default_sweep_interval_ms() -> u64 {
    250
}
