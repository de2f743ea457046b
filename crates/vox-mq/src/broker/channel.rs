use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;

use super::{Broker, BrokerError};

const DEFAULT_CAPACITY: usize = 256;

/// In-process broker over tokio channels
///
/// One subscriber per destination; publishing to a destination nobody
/// subscribed to drops the message, matching the fire-and-forget
/// semantics of an unbound broker queue. Used by tests and by the
/// embedded mode of the gateway.
#[derive(Default)]
pub struct ChannelBroker {
    destinations: DashMap<String, mpsc::Sender<Vec<u8>>>,
}

impl ChannelBroker {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Broker for ChannelBroker {
    async fn publish(&self, destination: &str, message: Vec<u8>) -> Result<(), BrokerError> {
        let Some(sender) = self.destinations.get(destination).map(|entry| entry.value().clone()) else {
            tracing::trace!(destination, "no subscriber, dropping message");
            return Ok(());
        };

        if sender.send(message).await.is_err() {
            // Subscriber went away; unbind the destination.
            self.destinations.remove(destination);
            tracing::trace!(destination, "subscriber gone, dropping message");
        }

        Ok(())
    }

    async fn subscribe(&self, destination: &str) -> Result<mpsc::Receiver<Vec<u8>>, BrokerError> {
        let (sender, receiver) = mpsc::channel(DEFAULT_CAPACITY);
        self.destinations.insert(destination.to_owned(), sender);
        Ok(receiver)
    }
}
