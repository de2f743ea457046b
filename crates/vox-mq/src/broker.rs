pub mod channel;
pub mod redis;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors at the broker transport boundary
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Transport could not be constructed (bad URL, bad options)
    #[error("broker configuration: {0}")]
    Config(String),

    /// Publishing a message failed
    #[error("publish to '{destination}' failed: {reason}")]
    Publish { destination: String, reason: String },

    /// Establishing a subscription failed
    #[error("subscribe to '{destination}' failed: {reason}")]
    Subscribe { destination: String, reason: String },
}

/// Transport seam the bridge consumes the broker through
///
/// Implementations own connection setup, authentication, and
/// reconnection. The bridge treats a subscription as an unbounded,
/// order-unspecified stream of raw message bytes; a temporary gap in
/// the stream is tolerated (pending calls are reclaimed by timeout).
#[async_trait]
pub trait Broker: Send + Sync {
    /// Publish one message to a destination
    async fn publish(&self, destination: &str, message: Vec<u8>) -> Result<(), BrokerError>;

    /// Subscribe to a destination, yielding raw message bytes
    async fn subscribe(&self, destination: &str) -> Result<mpsc::Receiver<Vec<u8>>, BrokerError>;
}
