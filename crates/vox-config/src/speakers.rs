use serde::Deserialize;

/// Configuration for a single speaker voice
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeakerConfig {
    /// Languages this speaker can synthesize
    pub languages: Vec<String>,
}
