//! Data model shared by the clients, the pipeline, and the HTTP surface.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefix of every spoken description.
pub const DESCRIPTION_PREFIX: &str = "I See ";

/// An image received from the caller. Lives only as long as the request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedImage {
    /// Validate the declared metadata before anything is sent downstream.
    ///
    /// A missing or empty filename and a content type outside `image/*`
    /// are both client errors.
    pub fn try_new(
        filename: Option<String>,
        content_type: Option<String>,
        bytes: Bytes,
    ) -> Result<Self> {
        let filename = filename
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Error::InvalidInput("No file provided".into()))?;

        let content_type = content_type
            .filter(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
            .ok_or_else(|| Error::InvalidInput("File must be an image".into()))?;

        Ok(Self {
            filename,
            content_type,
            bytes,
        })
    }

}

/// Handle to an image held by the storage collaborator.
///
/// `url` is what the downstream collaborators read; `key` is the only
/// thing needed to delete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageReference {
    pub url: String,
    pub key: String,
}

/// Coordinates of a detected landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Positive landmark detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkInfo {
    pub landmark: String,
    pub city: String,
    pub location: GeoPoint,
    pub score: f64,
}

impl LandmarkInfo {
    /// Clause appended to the description when a landmark was found.
    pub fn clause(&self) -> String {
        format!(". This appears to be {} in {}", self.landmark, self.city)
    }
}

/// Build the text handed to text-to-speech.
pub fn compose_description(description: &str, landmark: Option<&LandmarkInfo>) -> String {
    let mut text = format!("{}{}", DESCRIPTION_PREFIX, description);
    if let Some(info) = landmark {
        text.push_str(&info.clause());
    }
    text
}

/// Everything a successful pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub text_description: String,
    pub landmark_info: Option<LandmarkInfo>,
    pub audio: Bytes,
}

/// JSON body of a successful `format=json` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub text_description: String,
    pub landmark_info: Option<LandmarkInfo>,
}

impl From<&PipelineOutput> for ProcessResponse {
    fn from(output: &PipelineOutput) -> Self {
        Self {
            text_description: output.text_description.clone(),
            landmark_info: output.landmark_info.clone(),
        }
    }
}

/// Response form selected by the `format` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Audio,
}

impl OutputFormat {
    /// `audio` (any case) selects audio; anything else, or nothing, is JSON.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("audio") => Self::Audio,
            _ => Self::Json,
        }
    }
}
