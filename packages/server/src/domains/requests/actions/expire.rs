use chrono::{DateTime, Utc};
use tracing::info;

use crate::common::{LifecycleError, LifecycleResult};
use crate::kernel::{run_atomically, ServerDeps};

/// Mark every PENDING request whose `expires_at` has passed as EXPIRED.
///
/// Returns how many requests were expired. Run by the scheduler.
pub async fn expire_overdue_requests(deps: &ServerDeps, now: DateTime<Utc>) -> LifecycleResult<u64> {
    let expired = run_atomically(deps.store(), move |tx| {
        Box::pin(async move {
            tx.expire_pending_requests(now)
                .await
                .map_err(LifecycleError::from)
        })
    })
    .await?;

    if expired > 0 {
        info!(expired, "Overdue requests expired");
    }
    Ok(expired)
}
