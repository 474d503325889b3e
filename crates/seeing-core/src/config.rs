//! Configuration read once at process start.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Base URLs of the downstream collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceUrls {
    /// Object storage (`/upload-image`, `/delete/{key}`).
    pub storage: String,
    /// Captioning and text-to-speech (`/image`, `/speak`).
    pub image_sound: String,
    /// Landmark detection (`/detect-landmark`).
    pub landmark: String,
}

/// Timeout pair applied to every outbound call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Whole request budget, connect included.
    pub total: Duration,
    pub connect: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            total: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// Top-level orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// HTTP server port.
    pub port: u16,
    pub services: ServiceUrls,
    pub timeouts: TimeoutConfig,
    /// Largest accepted multipart body.
    pub max_upload_bytes: usize,
}

impl OrchestratorConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let services = ServiceUrls {
            storage: base_url(&lookup, "STORAGE_SERVICE_URL", "http://localhost:8001")?,
            image_sound: base_url(&lookup, "IMAGE_SOUND_SERVICE_URL", "http://localhost:8002")?,
            landmark: base_url(&lookup, "LANDMARK_SERVICE_URL", "http://localhost:8003")?,
        };

        let total: u64 = parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let connect: u64 = parse_or(
            &lookup,
            "UPSTREAM_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?;
        if total == 0 || connect == 0 {
            return Err(Error::Config("timeouts must be greater than zero".into()));
        }
        if connect > total {
            return Err(Error::Config(format!(
                "connect timeout ({}s) exceeds total timeout ({}s)",
                connect, total
            )));
        }

        let max_upload_bytes = parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        Ok(Self {
            port,
            services,
            timeouts: TimeoutConfig {
                total: Duration::from_secs(total),
                connect: Duration::from_secs(connect),
            },
            max_upload_bytes,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} is not a valid value: {:?}", key, raw))),
        _ => Ok(default),
    }
}

fn base_url<F>(lookup: &F, key: &str, default: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string());
    let url = raw.trim().trim_end_matches('/').to_string();

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::Config(format!(
            "{} must be an http(s) URL, got {:?}",
            key, raw
        )));
    }
    Ok(url)
}
