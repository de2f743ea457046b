//! In-process synthesis worker doubles
//!
//! Each worker subscribes to a job destination on the channel broker
//! and answers with scripted replies, playing the role the external
//! TTS workers play in production.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use vox_mq::{Broker, ChannelBroker, ReplyEnvelope, ReplyOutcome, RequestEnvelope, SynthesisPayload};

/// Stand-in for synthesized WAV bytes
pub const WAV_BYTES: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

/// Success payload echoing the submitted text
pub fn success_payload(text: &str) -> SynthesisPayload {
    SynthesisPayload {
        audio: BASE64.encode(WAV_BYTES),
        text: text.to_owned(),
        duration_frames: Some(1_234),
        sampling_rate: Some(22_050),
        win_length: Some(1_024),
        hop_length: Some(256),
    }
}

/// Spawn a worker answering every job on `destination` with success
///
/// Each reply is delayed by a small amount derived from the
/// correlation id, so concurrent calls complete in scrambled order.
pub async fn spawn_echo_worker(broker: Arc<ChannelBroker>, destination: &str) {
    let mut jobs = broker.subscribe(destination).await.expect("subscribe job destination");

    tokio::spawn(async move {
        while let Some(bytes) = jobs.recv().await {
            let job: RequestEnvelope<serde_json::Value> =
                serde_json::from_slice(&bytes).expect("job must be a request envelope");

            let broker = Arc::clone(&broker);
            tokio::spawn(async move {
                let jitter = u64::try_from(job.correlation_id.as_u128() % 50).unwrap_or_default();
                tokio::time::sleep(Duration::from_millis(jitter)).await;

                let text = job.body["text"].as_str().unwrap_or_default();
                let reply = ReplyEnvelope {
                    correlation_id: job.correlation_id,
                    outcome: ReplyOutcome::Success(success_payload(text)),
                };
                broker
                    .publish(&job.reply_to, serde_json::to_vec(&reply).expect("encode reply"))
                    .await
                    .expect("publish reply");
            });
        }
    });
}

/// Spawn a worker that only replies after `delay` (for late replies)
pub async fn spawn_delayed_worker(broker: Arc<ChannelBroker>, destination: &str, delay: Duration) {
    let mut jobs = broker.subscribe(destination).await.expect("subscribe job destination");

    tokio::spawn(async move {
        while let Some(bytes) = jobs.recv().await {
            let job: RequestEnvelope<serde_json::Value> =
                serde_json::from_slice(&bytes).expect("job must be a request envelope");

            tokio::time::sleep(delay).await;

            let reply = ReplyEnvelope {
                correlation_id: job.correlation_id,
                outcome: ReplyOutcome::Success(success_payload("late")),
            };
            broker
                .publish(&job.reply_to, serde_json::to_vec(&reply).expect("encode reply"))
                .await
                .expect("publish reply");
        }
    });
}

/// Spawn a worker reporting a synthesis failure for every job
pub async fn spawn_failing_worker(broker: Arc<ChannelBroker>, destination: &str, message: &str) {
    let mut jobs = broker.subscribe(destination).await.expect("subscribe job destination");
    let message = message.to_owned();

    tokio::spawn(async move {
        while let Some(bytes) = jobs.recv().await {
            let job: RequestEnvelope<serde_json::Value> =
                serde_json::from_slice(&bytes).expect("job must be a request envelope");

            let reply = ReplyEnvelope {
                correlation_id: job.correlation_id,
                outcome: ReplyOutcome::Error {
                    message: message.clone(),
                },
            };
            broker
                .publish(&job.reply_to, serde_json::to_vec(&reply).expect("encode reply"))
                .await
                .expect("publish reply");
        }
    });
}
