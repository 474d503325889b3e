//! Collaborator clients — storage, captioning, landmark detection, speech.
//!
//! Each collaborator is a trait so the orchestrator can be driven by
//! in-memory fakes; the `Http*` types are the production implementations
//! sharing one pooled `reqwest::Client`.

pub mod http;
pub mod image_sound;
pub mod landmark;
pub mod storage;
pub mod types;

pub use http::build_http_client;
pub use image_sound::{CaptionService, HttpImageSoundService, SpeechService};
pub use landmark::{HttpLandmarkService, LandmarkService};
pub use storage::{DeleteOutcome, HttpStorageService, StorageService};
