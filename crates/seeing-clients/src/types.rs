//! Wire shapes of the collaborator APIs.

use serde::{Deserialize, Serialize};

use seeing_core::StorageReference;

/// `POST /upload-image` response.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    #[serde(alias = "key")]
    pub s3_key: String,
}

impl From<UploadResponse> for StorageReference {
    fn from(body: UploadResponse) -> Self {
        Self {
            url: body.url,
            key: body.s3_key,
        }
    }
}

/// `POST /image` request.
#[derive(Debug, Clone, Serialize)]
pub struct DescribeRequest<'a> {
    #[serde(rename = "imageLink")]
    pub image_link: &'a str,
}

/// `POST /image` response.
#[derive(Debug, Clone, Deserialize)]
pub struct DescribeResponse {
    #[serde(rename = "imageDescription")]
    pub image_description: String,
}

/// `POST /speak` request.
#[derive(Debug, Clone, Serialize)]
pub struct SpeakRequest<'a> {
    pub text: &'a str,
}
