#![allow(clippy::must_use_candidate)]

pub mod broker;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod speakers;

use indexmap::IndexMap;
use serde::Deserialize;

pub use broker::BrokerConfig;
pub use health::HealthConfig;
pub use server::ServerConfig;
pub use speakers::SpeakerConfig;

/// Top-level Vox configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Broker and request/reply configuration
    #[serde(default)]
    pub broker: BrokerConfig,
    /// Speaker catalog keyed by speaker name
    #[serde(default)]
    pub speakers: IndexMap<String, SpeakerConfig>,
}
