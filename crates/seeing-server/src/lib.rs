//! Seeing server — HTTP surface of the image-to-speech orchestrator.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
