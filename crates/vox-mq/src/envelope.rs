use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outbound job envelope published to a worker destination
///
/// The body stays opaque to the bridge; only the correlation id and
/// the reply destination matter for routing the answer back.
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestEnvelope<T> {
    pub correlation_id: Uuid,
    /// Destination the worker must publish its reply to
    pub reply_to: String,
    pub body: T,
}

/// Payload of a successful synthesis reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisPayload {
    /// Synthesized audio, base64-encoded WAV bytes
    pub audio: String,
    /// Normalized text the worker actually synthesized
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_frames: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hop_length: Option<u32>,
}

/// Inbound reply envelope consumed from the reply destination
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub correlation_id: Uuid,
    #[serde(flatten)]
    pub outcome: ReplyOutcome,
}

/// Worker-reported result carried in a reply
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReplyOutcome {
    Success(SynthesisPayload),
    Error { message: String },
}
