use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use vox_config::BrokerConfig;

use crate::{
    broker::Broker,
    envelope::{RequestEnvelope, SynthesisPayload},
    error::{MqError, Result},
    listener::run_reply_listener,
    registry::CorrelationRegistry,
    supervisor::run_timeout_supervisor,
};

/// Client facade for synchronous calls over the broker
///
/// Owns the correlation registry and the two background tasks (reply
/// listener, timeout supervisor). Constructed once at startup and
/// passed by reference wherever calls are made; there is no global
/// instance.
pub struct MqConnector {
    broker: Arc<dyn Broker>,
    registry: Arc<CorrelationRegistry>,
    config: BrokerConfig,
    shutdown: CancellationToken,
}

impl MqConnector {
    /// Subscribe to the reply destination and spawn the background tasks
    ///
    /// # Errors
    ///
    /// Returns `MqError::Transport` if the subscription cannot be
    /// established
    pub async fn start(broker: Arc<dyn Broker>, config: BrokerConfig) -> Result<Arc<Self>> {
        let registry = Arc::new(CorrelationRegistry::new());

        let replies = broker
            .subscribe(&config.reply_destination)
            .await
            .map_err(|e| MqError::Transport(e.to_string()))?;

        let shutdown = CancellationToken::new();
        tokio::spawn(run_reply_listener(Arc::clone(&registry), replies, shutdown.clone()));
        tokio::spawn(run_timeout_supervisor(
            Arc::clone(&registry),
            config.sweep_interval(),
            shutdown.clone(),
        ));

        tracing::info!(reply_destination = %config.reply_destination, "mq connector started");

        Ok(Arc::new(Self {
            broker,
            registry,
            config,
            shutdown,
        }))
    }

    /// Publish one job and await its reply within `timeout`
    ///
    /// Exactly one message is published per call; there is no implicit
    /// retry (retrying a non-idempotent synthesis job is caller
    /// policy). On success the reply payload is returned together with
    /// the correlation id, which callers use for tracing and for
    /// naming downstream artifacts.
    ///
    /// # Errors
    ///
    /// Returns exactly one of the closed [`MqError`] kinds. A publish
    /// failure resolves the pending entry immediately; it is never
    /// left behind. Calls issued after [`shutdown`](Self::shutdown)
    /// fail with `Cancelled` before anything is registered.
    pub async fn call<T>(&self, body: &T, routing_key: &str, timeout: Duration) -> Result<(SynthesisPayload, Uuid)>
    where
        T: Serialize + Sync + ?Sized,
    {
        // The listener and supervisor are gone once shutdown ran, so a
        // registered entry would never resolve.
        if self.shutdown.is_cancelled() {
            return Err(MqError::Cancelled);
        }

        let id = Uuid::new_v4();
        let receiver = self.registry.register(id, Instant::now() + timeout);

        let envelope = RequestEnvelope {
            correlation_id: id,
            reply_to: self.config.reply_destination.clone(),
            body,
        };

        match serde_json::to_vec(&envelope) {
            Ok(message) => {
                let destination = self.config.request_destination(routing_key);
                match self.broker.publish(&destination, message).await {
                    Ok(()) => {
                        tracing::debug!(correlation_id = %id, destination, "job published");
                    }
                    Err(e) => {
                        tracing::warn!(correlation_id = %id, error = %e, "publish failed");
                        self.registry.resolve(id, Err(MqError::Transport(e.to_string())));
                    }
                }
            }
            Err(e) => {
                self.registry.resolve(id, Err(MqError::Internal(format!("encode request: {e}"))));
            }
        }

        match receiver.await {
            Ok(Ok(payload)) => Ok((payload, id)),
            Ok(Err(error)) => Err(error),
            // The sender half was dropped without resolving, which the
            // registry never does on any path.
            Err(_) => Err(MqError::Internal("completion slot dropped".to_owned())),
        }
    }

    /// Cancel a pending call early, failing it with `Cancelled`
    ///
    /// Returns whether a pending entry was actually cancelled. Calls
    /// already resolved, or ids never registered, are a no-op.
    pub fn cancel(&self, id: Uuid) -> bool {
        self.registry.resolve(id, Err(MqError::Cancelled))
    }

    /// Per-call time budget to use when the caller does not supply one
    pub const fn default_timeout(&self) -> Duration {
        self.config.default_timeout()
    }

    /// Number of calls currently awaiting a reply
    pub fn pending(&self) -> usize {
        self.registry.len()
    }

    /// Stop the background tasks and fail every outstanding call
    ///
    /// Returns the number of calls that were drained. After shutdown
    /// no caller blocks forever.
    pub fn shutdown(&self) -> usize {
        self.shutdown.cancel();
        let drained = self.registry.drain();
        if !drained.is_empty() {
            tracing::info!(count = drained.len(), "drained outstanding calls at shutdown");
        }
        drained.len()
    }
}
