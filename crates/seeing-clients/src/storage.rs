//! Object storage collaborator: temporary upload and delete.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info};

use seeing_core::{Error, Result, Service, StorageReference, UploadedImage};

use crate::http::{endpoint, expect_success, request_error, status_detail};
use crate::types::UploadResponse;

/// Result of a delete call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The object was already gone (404).
    AlreadyGone,
}

/// Trait for the storage backend holding images while they are processed.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Store the image and return where downstream services can read it.
    async fn upload(&self, image: &UploadedImage) -> Result<StorageReference>;

    /// Remove a previously uploaded object.
    async fn delete(&self, key: &str) -> Result<DeleteOutcome>;
}

/// Storage service reached over HTTP.
pub struct HttpStorageService {
    client: Client,
    base_url: String,
}

impl HttpStorageService {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// `{base}/delete/{key}`, with the key encoded as one path segment.
    fn delete_url(&self, key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid storage URL {}: {}", self.base_url, e)))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::Config(format!("storage URL cannot be a base: {}", self.base_url))
            })?;
            segments.pop_if_empty().push("delete").push(key);
        }
        Ok(url)
    }
}

#[async_trait]
impl StorageService for HttpStorageService {
    async fn upload(&self, image: &UploadedImage) -> Result<StorageReference> {
        let part = Part::stream_with_length(image.bytes.clone(), image.bytes.len() as u64)
            .file_name(image.filename.clone())
            .mime_str(&image.content_type)
            .map_err(|_| Error::InvalidInput("File must be an image".into()))?;
        let form = Form::new().part("file", part);

        info!("Uploading file {} to storage service", image.filename);

        let response = self
            .client
            .post(endpoint(&self.base_url, "upload-image"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| request_error(Service::Storage, e))?;

        let response = expect_success(Service::Storage, response).await?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| request_error(Service::Storage, e))?;
        let reference = StorageReference::from(body);

        info!("Successfully uploaded file. URL: {}", reference.url);
        Ok(reference)
    }

    async fn delete(&self, key: &str) -> Result<DeleteOutcome> {
        let url = self.delete_url(key)?;
        debug!("Deleting {} from storage", key);

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| request_error(Service::Storage, e))?;

        let status = response.status();
        if status.is_success() {
            Ok(DeleteOutcome::Deleted)
        } else if status == StatusCode::NOT_FOUND {
            Ok(DeleteOutcome::AlreadyGone)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::upstream(Service::Storage, status_detail(status, &body)))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::build_http_client;
    use seeing_core::TimeoutConfig;

    fn service(uri: &str, total_ms: u64) -> HttpStorageService {
        let client = build_http_client(&TimeoutConfig {
            total: Duration::from_millis(total_ms),
            connect: Duration::from_millis(total_ms),
        })
        .unwrap();
        HttpStorageService::new(client, uri)
    }

    fn image() -> UploadedImage {
        UploadedImage::try_new(
            Some("tower.jpg".into()),
            Some("image/jpeg".into()),
            Bytes::from_static(b"\xff\xd8\xff\xe0fake-jpeg"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_upload_returns_reference() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload-image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": "https://bucket.example.com/abc.jpg?sig=1",
                "s3_key": "abc.jpg"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let reference = service(&mock_server.uri(), 2000)
            .upload(&image())
            .await
            .unwrap();
        assert_eq!(reference.key, "abc.jpg");
        assert_eq!(reference.url, "https://bucket.example.com/abc.jpg?sig=1");

        let requests = mock_server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("filename=\"tower.jpg\""));
        assert!(body.contains("image/jpeg"));
    }

    #[tokio::test]
    async fn test_upload_error_status_is_bad_gateway_with_text() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload-image"))
            .respond_with(ResponseTemplate::new(500).set_body_string("S3 Upload Failed: denied"))
            .mount(&mock_server)
            .await;

        let err = service(&mock_server.uri(), 2000)
            .upload(&image())
            .await
            .unwrap_err();
        match err {
            Error::Upstream { service, detail } => {
                assert_eq!(service, Service::Storage);
                assert!(detail.contains("500"));
                assert!(detail.contains("S3 Upload Failed: denied"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": "https://bucket.example.com/abc.jpg"
            })))
            .mount(&mock_server)
            .await;

        let err = service(&mock_server.uri(), 2000)
            .upload(&image())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream { service: Service::Storage, .. }));
    }

    #[tokio::test]
    async fn test_upload_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(800)))
            .mount(&mock_server)
            .await;

        let err = service(&mock_server.uri(), 150)
            .upload(&image())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamTimeout { service: Service::Storage }));
    }

    #[tokio::test]
    async fn test_delete_treats_404_as_gone() {
        let mock_server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/delete/abc.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = service(&mock_server.uri(), 2000).delete("abc.jpg").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::AlreadyGone);
    }

    #[tokio::test]
    async fn test_delete_success_and_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/delete/ok.png"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/delete/locked.png"))
            .respond_with(ResponseTemplate::new(403).set_body_string("AccessDenied"))
            .mount(&mock_server)
            .await;

        let storage = service(&mock_server.uri(), 2000);
        assert_eq!(storage.delete("ok.png").await.unwrap(), DeleteOutcome::Deleted);
        let err = storage.delete("locked.png").await.unwrap_err();
        assert!(err.to_string().contains("AccessDenied"));
    }

    #[test]
    fn test_delete_url_encodes_key() {
        let storage = HttpStorageService::new(Client::new(), "http://storage.local/api/");
        let url = storage.delete_url("dir/a b.png").unwrap();
        assert_eq!(url.as_str(), "http://storage.local/api/delete/dir%2Fa%20b.png");
    }
}
