use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use vox_config::SpeakerConfig;
use vox_mq::MqError;

/// Slowest and fastest accepted speech speed multipliers
const SPEED_RANGE: (f64, f64) = (0.25, 4.0);

/// A text-to-speech request as submitted by the API consumer
///
/// Serialized as-is into the job envelope body; workers see the same
/// shape the client sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// Text to synthesize
    pub text: String,
    /// Speaker voice name, must exist in the catalog
    pub speaker: String,
    /// Speech speed multiplier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl SynthesisRequest {
    /// Validate against the speaker catalog before anything is published
    ///
    /// # Errors
    ///
    /// Returns `MqError::InvalidRequest` for empty text, an unknown
    /// speaker, or an out-of-range speed
    pub fn validate(&self, speakers: &IndexMap<String, SpeakerConfig>) -> Result<(), MqError> {
        if self.text.trim().is_empty() {
            return Err(MqError::InvalidRequest("text must not be empty".to_owned()));
        }

        if !speakers.contains_key(&self.speaker) {
            return Err(MqError::InvalidRequest(format!("unknown speaker: {}", self.speaker)));
        }

        if let Some(speed) = self.speed
            && !(SPEED_RANGE.0..=SPEED_RANGE.1).contains(&speed)
        {
            return Err(MqError::InvalidRequest(format!(
                "speed must be between {} and {}",
                SPEED_RANGE.0, SPEED_RANGE.1
            )));
        }

        Ok(())
    }
}

/// Speaker catalog entry returned by `GET /v2`
#[derive(Debug, Serialize)]
pub struct Speaker {
    pub name: String,
    pub languages: Vec<String>,
}

/// Response body for `GET /v2`
#[derive(Debug, Serialize)]
pub struct Catalog {
    pub speakers: Vec<Speaker>,
}
