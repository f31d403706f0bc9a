pub mod authorizations;
pub mod health;
pub mod patients;

use kyoka_core::KyokaError;
use std::sync::Arc;

use crate::AppState;
use crate::error::ApiError;

/// Run a store-bound service call on the blocking pool.
///
/// With `storage.timeout_ms` set, the caller gets a timeout error once the
/// limit passes; the blocking call itself is not cancelled.
pub async fn run_blocking<T, F>(state: &Arc<AppState>, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppState) -> kyoka_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let task_state = state.clone();
    let task = tokio::task::spawn_blocking(move || op(&task_state));

    let joined = match state.config.store_timeout() {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| ApiError::Timeout(limit))?,
        None => task.await,
    };

    joined
        .map_err(|e| ApiError::from(KyokaError::Storage(format!("Store task failed: {}", e))))?
        .map_err(ApiError::from)
}
