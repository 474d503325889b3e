//! Guaranteed deletion of the uploaded image.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use seeing_clients::{DeleteOutcome, StorageService};

/// Owns the storage key of an uploaded image until it has been deleted.
///
/// `release` runs the delete on the normal and error paths. If the guard is
/// dropped without being released (the request future was cancelled, or a
/// stage panicked) the delete is spawned onto the current tokio runtime.
/// The key is taken before the delete starts, so at most one delete is ever
/// issued per guard.
pub struct CleanupGuard {
    storage: Arc<dyn StorageService>,
    key: Option<String>,
    budget: Duration,
}

impl CleanupGuard {
    pub fn new(storage: Arc<dyn StorageService>, key: impl Into<String>, budget: Duration) -> Self {
        Self {
            storage,
            key: Some(key.into()),
            budget,
        }
    }

    /// Delete the object now. Never fails; problems are logged.
    pub async fn release(mut self) {
        if let Some(key) = self.key.take() {
            delete_quietly(self.storage.as_ref(), &key, self.budget).await;
        }
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!("Request ended before cleanup; deleting {} in background", key);
                let storage = self.storage.clone();
                let budget = self.budget;
                handle.spawn(async move {
                    delete_quietly(storage.as_ref(), &key, budget).await;
                });
            }
            Err(_) => {
                error!("No runtime available to delete {}; object left in storage", key);
            }
        }
    }
}

/// Delete `key`, treating "already gone" as success and logging everything else.
async fn delete_quietly(storage: &dyn StorageService, key: &str, budget: Duration) {
    match tokio::time::timeout(budget, storage.delete(key)).await {
        Ok(Ok(DeleteOutcome::Deleted)) => {
            info!("Cleaned up temporary storage: {}", key);
        }
        Ok(Ok(DeleteOutcome::AlreadyGone)) => {
            info!("Temporary object {} was already deleted", key);
        }
        Ok(Err(e)) => {
            error!("Failed to delete image {} from storage: {}", key, e);
        }
        Err(_) => {
            error!("Timed out deleting image {} from storage after {:?}", key, budget);
        }
    }
}
