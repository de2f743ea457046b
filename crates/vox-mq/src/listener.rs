use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    envelope::{ReplyEnvelope, ReplyOutcome},
    error::MqError,
    registry::CorrelationRegistry,
};

/// Consume the reply stream for the lifetime of the process
///
/// Per message this only decodes, classifies, and hands the outcome to
/// the waiting completion slot; it never performs caller-side work, so
/// a slow caller cannot stall replies for unrelated calls.
pub(crate) async fn run_reply_listener(
    registry: Arc<CorrelationRegistry>,
    mut messages: mpsc::Receiver<Vec<u8>>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            message = messages.recv() => match message {
                Some(bytes) => handle_reply(&registry, &bytes),
                None => {
                    // Transport gap. Registry state stays intact; any
                    // orphaned calls are reclaimed by the supervisor.
                    tracing::warn!("reply stream closed, listener exiting");
                    break;
                }
            },
        }
    }
}

fn handle_reply(registry: &CorrelationRegistry, bytes: &[u8]) {
    let envelope: ReplyEnvelope = match serde_json::from_slice(bytes) {
        Ok(envelope) => envelope,
        Err(e) => {
            // Cannot be attributed to any pending call; drop it.
            tracing::warn!(error = %e, len = bytes.len(), "dropping undecodable reply");
            return;
        }
    };

    let id = envelope.correlation_id;
    let outcome = match envelope.outcome {
        ReplyOutcome::Success(payload) => Ok(payload),
        ReplyOutcome::Error { message } => Err(MqError::Worker(message)),
    };

    if registry.resolve(id, outcome) {
        tracing::debug!(correlation_id = %id, "reply resolved pending call");
    } else {
        // Already resolved (timeout, cancel) or never ours.
        tracing::info!(correlation_id = %id, "dropping late or unmatched reply");
    }
}
