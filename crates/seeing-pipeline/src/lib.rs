//! Pipeline orchestrator — sequences the collaborator calls for one image.
//!
//! Stages run strictly one after another. Upload, description, and speech
//! are mandatory; landmark detection is best-effort. Once an upload has
//! succeeded a `CleanupGuard` owns the storage key and deletes it on every
//! exit path, including cancellation.

pub mod cleanup;
pub mod orchestrator;
pub mod stages;
pub mod tracker;

pub use cleanup::CleanupGuard;
pub use orchestrator::{Collaborators, Orchestrator};
pub use tracker::PipelineRun;
