//! Image & Sound collaborator: captioning (`/image`) and text-to-speech (`/speak`).

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::debug;

use seeing_core::{Result, Service};

use crate::http::{endpoint, expect_status, request_error};
use crate::types::{DescribeRequest, DescribeResponse, SpeakRequest};

/// Trait for image captioning backends.
#[async_trait]
pub trait CaptionService: Send + Sync {
    /// Describe the image readable at `image_url` in natural language.
    async fn describe(&self, image_url: &str) -> Result<String>;
}

/// Trait for text-to-speech backends.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Render `text` as audio bytes.
    async fn synthesize(&self, text: &str) -> Result<Bytes>;
}

/// One HTTP service provides both captioning and speech.
pub struct HttpImageSoundService {
    client: Client,
    base_url: String,
}

impl HttpImageSoundService {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CaptionService for HttpImageSoundService {
    async fn describe(&self, image_url: &str) -> Result<String> {
        let response = self
            .client
            .post(endpoint(&self.base_url, "image"))
            .json(&DescribeRequest {
                image_link: image_url,
            })
            .send()
            .await
            .map_err(|e| request_error(Service::Captioning, e))?;

        let response = expect_status(Service::Captioning, response, StatusCode::OK).await?;
        let body: DescribeResponse = response
            .json()
            .await
            .map_err(|e| request_error(Service::Captioning, e))?;

        debug!("Got image description: {}", body.image_description);
        Ok(body.image_description)
    }
}

#[async_trait]
impl SpeechService for HttpImageSoundService {
    async fn synthesize(&self, text: &str) -> Result<Bytes> {
        let response = self
            .client
            .post(endpoint(&self.base_url, "speak"))
            .json(&SpeakRequest { text })
            .send()
            .await
            .map_err(|e| request_error(Service::Speech, e))?;

        let response = expect_status(Service::Speech, response, StatusCode::OK).await?;
        let audio = response
            .bytes()
            .await
            .map_err(|e| request_error(Service::Speech, e))?;

        debug!("Got audio data of length: {} bytes", audio.len());
        Ok(audio)
    }
}
