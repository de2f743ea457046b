use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;

use super::{Broker, BrokerError};

const CHANNEL_CAPACITY: usize = 256;

/// Broker transport over redis pub/sub
pub struct RedisBroker {
    client: redis::Client,
}

impl RedisBroker {
    /// Create a broker for the given redis URL
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid
    pub fn new(url: &str) -> Result<Self, BrokerError> {
        let client = redis::Client::open(url).map_err(|e| BrokerError::Config(format!("invalid URL: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Broker for RedisBroker {
    async fn publish(&self, destination: &str, message: Vec<u8>) -> Result<(), BrokerError> {
        use redis::AsyncCommands;

        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| BrokerError::Publish {
                destination: destination.to_owned(),
                reason: format!("connection failed: {e}"),
            })?;

        let _: () = conn
            .publish(destination, message)
            .await
            .map_err(|e| BrokerError::Publish {
                destination: destination.to_owned(),
                reason: format!("PUBLISH failed: {e}"),
            })?;

        Ok(())
    }

    async fn subscribe(&self, destination: &str) -> Result<mpsc::Receiver<Vec<u8>>, BrokerError> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| BrokerError::Subscribe {
                destination: destination.to_owned(),
                reason: format!("connection failed: {e}"),
            })?;

        pubsub.subscribe(destination).await.map_err(|e| BrokerError::Subscribe {
            destination: destination.to_owned(),
            reason: format!("SUBSCRIBE failed: {e}"),
        })?;

        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let destination = destination.to_owned();

        tokio::spawn(async move {
            let mut messages = pubsub.on_message();
            while let Some(message) = messages.next().await {
                if sender.send(message.get_payload_bytes().to_vec()).await.is_err() {
                    break;
                }
            }
            tracing::warn!(destination, "redis subscription stream ended");
        });

        Ok(receiver)
    }
}
