use http::StatusCode;

/// Trait for domain errors that can be rendered as HTTP responses
///
/// Implemented by the feature crates' error types. The server layer
/// turns these into actual HTTP responses, so domain errors stay
/// decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `request_timeout`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}
