use http::StatusCode;
use thiserror::Error;
use vox_core::HttpError;

pub type Result<T> = std::result::Result<T, MqError>;

/// Errors a bridged call can terminate with
///
/// This is a closed set: every failed call observes exactly one of
/// these kinds, and nothing else ever reaches the caller.
#[derive(Debug, Clone, Error)]
pub enum MqError {
    /// Caller input failed validation; the job was never published
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No reply arrived before the call's deadline
    #[error("no reply received within the time budget")]
    Timeout,

    /// A reply arrived but reports a synthesis failure
    #[error("synthesis failed: {0}")]
    Worker(String),

    /// Publish or subscribe failed at the broker boundary
    #[error("broker transport: {0}")]
    Transport(String),

    /// The call was cancelled, either explicitly or by shutdown drain
    #[error("call cancelled")]
    Cancelled,

    /// Unclassified failure; still resolves the pending call
    #[error("internal error: {0}")]
    Internal(String),
}

impl HttpError for MqError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Worker(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
            Self::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::Timeout => "request_timeout",
            Self::Worker(_) => "worker_error",
            Self::Transport(_) => "transport_error",
            Self::Cancelled => "cancelled",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}
