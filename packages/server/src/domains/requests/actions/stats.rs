use serde::Serialize;
use tracing::debug;

use crate::common::{Actor, LifecycleError, LifecycleResult};
use crate::domains::requests::models::RequestStatus;
use crate::kernel::{read_only, ServerDeps, StatsScope};

/// Request counts by status, scoped to what the actor can see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequestStats {
    pub total: i64,
    pub pending: i64,
    pub accepted: i64,
    pub rejected: i64,
    pub cancelled: i64,
    pub expired: i64,
}

impl RequestStats {
    pub fn from_counts(counts: &[(RequestStatus, i64)]) -> Self {
        counts
            .iter()
            .fold(Self::default(), |mut stats, &(status, count)| {
                stats.total += count;
                match status {
                    RequestStatus::Pending => stats.pending += count,
                    RequestStatus::Accepted => stats.accepted += count,
                    RequestStatus::Rejected => stats.rejected += count,
                    RequestStatus::Cancelled => stats.cancelled += count,
                    RequestStatus::Expired => stats.expired += count,
                }
                stats
            })
    }
}

/// Owners see requests for rooms they own, seekers their own requests,
/// admins everything.
pub async fn request_stats(actor: &Actor, deps: &ServerDeps) -> LifecycleResult<RequestStats> {
    let scope = StatsScope::for_actor(actor);
    let counts = read_only(deps.store(), move |tx| {
        Box::pin(async move {
            tx.request_status_counts(scope)
                .await
                .map_err(LifecycleError::from)
        })
    })
    .await?;

    let stats = RequestStats::from_counts(&counts);
    debug!(?scope, total = stats.total, "Request stats computed");
    Ok(stats)
}
