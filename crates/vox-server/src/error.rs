use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use vox_core::HttpError;
use vox_mq::MqError;

/// Error body returned by the API (`{ "detail": ..., "type": ... }`)
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub detail: String,
    pub r#type: String,
}

/// Newtype adapting [`MqError`] to an HTTP response
///
/// Keeps `vox-mq` free of any axum dependency; the status and message
/// come from the `HttpError` impl on the error itself.
#[derive(Debug)]
pub struct ApiError(pub MqError);

impl From<MqError> for ApiError {
    fn from(error: MqError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let body = ErrorMessage {
            detail: self.0.client_message(),
            r#type: self.0.error_type().to_owned(),
        };

        (status, Json(body)).into_response()
    }
}
