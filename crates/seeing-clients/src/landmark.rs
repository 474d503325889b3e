//! Landmark detection collaborator.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use seeing_core::{LandmarkInfo, Result, Service};

use crate::http::{endpoint, expect_status, request_error};

/// Trait for landmark detection backends.
#[async_trait]
pub trait LandmarkService: Send + Sync {
    /// Detect a landmark in the image at `image_url`.
    ///
    /// `Ok(None)` means the service looked and found nothing.
    async fn detect(&self, image_url: &str) -> Result<Option<LandmarkInfo>>;
}

/// Landmark detection reached over HTTP.
pub struct HttpLandmarkService {
    client: Client,
    base_url: String,
}

impl HttpLandmarkService {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl LandmarkService for HttpLandmarkService {
    async fn detect(&self, image_url: &str) -> Result<Option<LandmarkInfo>> {
        let response = self
            .client
            .get(endpoint(&self.base_url, "detect-landmark"))
            .query(&[("image_url", image_url)])
            .send()
            .await
            .map_err(|e| request_error(Service::Landmark, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No landmark detected");
            return Ok(None);
        }

        let response = expect_status(Service::Landmark, response, StatusCode::OK).await?;
        let info: LandmarkInfo = response
            .json()
            .await
            .map_err(|e| request_error(Service::Landmark, e))?;
        Ok(Some(info))
    }
}
