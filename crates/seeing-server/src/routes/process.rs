//! Image processing route — upload, describe, detect, speak, clean up.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use seeing_core::{Error, OutputFormat, ProcessResponse, UploadedImage};

use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";
const AUDIO_CONTENT_TYPE: &str = "audio/wav";
const AUDIO_DISPOSITION: &str = "attachment; filename=description.wav";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/process-image", post(process_image))
        .route("/see-image", post(process_image))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProcessQuery {
    pub format: Option<String>,
}

/// POST /process-image?format={json|audio} — multipart field `file`.
async fn process_image(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ProcessQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| Error::InvalidInput(e.body_text()))?;
    let format = OutputFormat::from_query(query.format.as_deref());
    let mut multipart = multipart.map_err(|e| Error::InvalidInput(e.body_text()))?;

    let image = read_image(&mut multipart).await?;
    let output = state.orchestrator.process(image).await?;

    Ok(match format {
        OutputFormat::Audio => {
            info!("Returning audio response");
            audio_response(output.audio)
        }
        OutputFormat::Json => {
            info!("Returning JSON response");
            Json(ProcessResponse::from(&output)).into_response()
        }
    })
}

/// Pull the `file` field out of the form and validate it.
async fn read_image(multipart: &mut Multipart) -> Result<UploadedImage, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidInput(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidInput(e.body_text()))?;

        return Ok(UploadedImage::try_new(filename, content_type, bytes)?);
    }

    Err(Error::InvalidInput("No file provided".into()).into())
}

fn audio_response(audio: Bytes) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(AUDIO_CONTENT_TYPE));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static(AUDIO_DISPOSITION),
    );
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(audio.len()));

    (StatusCode::OK, headers, Body::from(audio)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_audio_response_headers() {
        let response = audio_response(Bytes::from_static(b"RIFF0000WAVE"));
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "audio/wav");
        assert_eq!(headers[header::CONTENT_LENGTH], "12");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=description.wav"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"RIFF0000WAVE");
    }
}
