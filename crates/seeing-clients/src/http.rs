//! Shared HTTP plumbing: the pooled client and error translation.

use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use seeing_core::{Error, Result, Service, TimeoutConfig};

/// Build the pooled client every collaborator call goes through.
pub fn build_http_client(timeouts: &TimeoutConfig) -> Result<Client> {
    Client::builder()
        .timeout(timeouts.total)
        .connect_timeout(timeouts.connect)
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Translate a transport, timeout, or body error for `service`.
pub(crate) fn request_error(service: Service, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        debug!(%service, "Timed out: {}", err);
        Error::UpstreamTimeout { service }
    } else if err.is_decode() {
        debug!(%service, "Malformed response: {}", err);
        Error::upstream(service, format!("malformed response: {}", err))
    } else {
        debug!(%service, "Request failed: {}", err);
        Error::upstream(service, err.to_string())
    }
}

/// Fail with the upstream status and body unless the response is `expected`.
pub(crate) async fn expect_status(
    service: Service,
    response: Response,
    expected: StatusCode,
) -> Result<Response> {
    if response.status() == expected {
        return Ok(response);
    }
    unexpected_status(service, response).await
}

/// Fail with the upstream status and body unless the response is 2xx.
pub(crate) async fn expect_success(service: Service, response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    unexpected_status(service, response).await
}

async fn unexpected_status(service: Service, response: Response) -> Result<Response> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    debug!(%service, %status, "Unexpected status: {}", body);
    Err(Error::upstream(service, status_detail(status, &body)))
}

pub(crate) fn status_detail(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("status {}", status)
    } else {
        format!("status {}: {}", status, body)
    }
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
