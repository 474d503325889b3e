//! Stage wrappers: the error policy applied around each collaborator call.

use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use seeing_core::{Error, Result, Service};

/// Run a mandatory stage. Failures propagate and abort the pipeline.
///
/// `budget` bounds the call even if the collaborator never answers.
pub async fn mandatory<T, F>(service: Service, budget: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let result = match tokio::time::timeout(budget, call).await {
        Ok(result) => result,
        Err(_) => Err(Error::UpstreamTimeout { service }),
    };
    if let Err(e) = &result {
        error!(%service, "Mandatory stage failed: {}", e);
    }
    result
}

/// Run a best-effort stage. Any failure becomes `None` and is only logged.
pub async fn best_effort<T, F>(service: Service, budget: Duration, call: F) -> Option<T>
where
    F: Future<Output = Result<Option<T>>>,
{
    match tokio::time::timeout(budget, call).await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            warn!(%service, "Best-effort stage failed (non-critical): {}", e);
            None
        }
        Err(_) => {
            warn!(%service, "Best-effort stage timed out after {:?} (non-critical)", budget);
            None
        }
    }
}
