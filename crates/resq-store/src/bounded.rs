//! Time-bounded external calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use resq_core::error::AppError;
use resq_core::result::AppResult;

/// Run an external call, failing with an external-service error if it does
/// not finish within `limit`.
pub async fn bounded<T, F>(limit: Duration, operation: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                timeout_ms = limit.as_millis() as u64,
                "External call timed out"
            );
            Err(AppError::external(format!(
                "{operation} timed out after {}ms",
                limit.as_millis()
            )))
        }
    }
}
