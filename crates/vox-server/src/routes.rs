use std::sync::Arc;

use axum::{Json, extract::State, response::Response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use uuid::Uuid;
use vox_mq::{MqError, SynthesisPayload};

use crate::{
    AppState,
    error::ApiError,
    types::{Catalog, Speaker, SynthesisRequest},
};

/// `GET /v2` — the speaker catalog
pub(crate) async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    let speakers = state
        .speakers
        .iter()
        .map(|(name, speaker)| Speaker {
            name: name.clone(),
            languages: speaker.languages.clone(),
        })
        .collect();

    Json(Catalog { speakers })
}

/// `POST /v2` — synthesize and return the WAV bytes
///
/// The correlation id of the completed call names the attachment.
pub(crate) async fn synthesize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SynthesisRequest>,
) -> Result<Response, ApiError> {
    let (payload, correlation_id) = state.synthesize(&request).await?;
    let audio = decode_audio(&payload)?;

    wav_response(audio, correlation_id, Vec::new())
}

/// `POST /v2/verbose` — synthesize but return the reply metadata as JSON
///
/// The audio stays base64-encoded text, exactly as the worker sent it.
pub(crate) async fn synthesize_verbose(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SynthesisRequest>,
) -> Result<Json<SynthesisPayload>, ApiError> {
    let (payload, _correlation_id) = state.synthesize(&request).await?;
    Ok(Json(payload))
}

/// `POST /v2/stream_with_headers` — WAV bytes plus metadata headers
///
/// Text headers are base64-encoded so arbitrary input survives the
/// header value restrictions; numeric fields are sent verbatim, empty
/// when the worker omitted them.
pub(crate) async fn synthesize_with_headers(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SynthesisRequest>,
) -> Result<Response, ApiError> {
    let (payload, correlation_id) = state.synthesize(&request).await?;
    let audio = decode_audio(&payload)?;

    let headers = vec![
        ("original-text", BASE64.encode(&request.text)),
        ("normalized-text", BASE64.encode(&payload.text)),
        (
            "duration-frames",
            BASE64.encode(payload.duration_frames.map(|v| v.to_string()).unwrap_or_default()),
        ),
        ("sampling-rate", optional_number(payload.sampling_rate)),
        ("win-length", optional_number(payload.win_length)),
        ("hop-length", optional_number(payload.hop_length)),
    ];

    wav_response(audio, correlation_id, headers)
}

fn optional_number(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn decode_audio(payload: &SynthesisPayload) -> Result<Vec<u8>, ApiError> {
    BASE64
        .decode(&payload.audio)
        .map_err(|e| ApiError(MqError::Internal(format!("reply audio is not valid base64: {e}"))))
}

fn wav_response(audio: Vec<u8>, correlation_id: Uuid, headers: Vec<(&'static str, String)>) -> Result<Response, ApiError> {
    let mut builder = Response::builder()
        .header(http::header::CONTENT_TYPE, "audio/wav")
        .header(
            http::header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{correlation_id}.wav\""),
        );

    for (name, value) in headers {
        builder = builder.header(name, value);
    }

    builder
        .body(axum::body::Body::from(audio))
        .map_err(|e| ApiError(MqError::Internal(format!("build response: {e}"))))
}
