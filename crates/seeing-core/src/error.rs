//! Error types for the orchestrator.

use thiserror::Error;

/// Downstream collaborator named in errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Storage,
    Captioning,
    Landmark,
    Speech,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Storage => write!(f, "Storage service"),
            Service::Captioning => write!(f, "Image description service"),
            Service::Landmark => write!(f, "Landmark detection service"),
            Service::Speech => write!(f, "Text to speech service"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// Missing file, missing filename, or non-image content type.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{service} timed out")]
    UpstreamTimeout { service: Service },

    /// Non-2xx status, network failure, or malformed body from a collaborator.
    #[error("{service} error: {detail}")]
    Upstream { service: Service, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn upstream(service: Service, detail: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
