use serde::Serialize;
use tracing::debug;

use crate::common::{Actor, LifecycleError, LifecycleResult};
use crate::domains::matches::models::MatchStatus;
use crate::kernel::{read_only, ServerDeps, StatsScope};

/// Every match lands in exactly one bucket; `cancelled` is whatever is left
/// after `active` and `completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    pub total: i64,
    pub active: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl MatchStats {
    pub fn from_counts(counts: &[(MatchStatus, i64)]) -> Self {
        let total: i64 = counts.iter().map(|(_, n)| n).sum();
        let active: i64 = counts
            .iter()
            .filter(|(status, _)| !status.is_terminal())
            .map(|(_, n)| n)
            .sum();
        let completed: i64 = counts
            .iter()
            .filter(|(status, _)| *status == MatchStatus::Completed)
            .map(|(_, n)| n)
            .sum();

        Self {
            total,
            active,
            completed,
            cancelled: total - active - completed,
        }
    }
}

pub async fn match_stats(actor: &Actor, deps: &ServerDeps) -> LifecycleResult<MatchStats> {
    let scope = StatsScope::for_actor(actor);
    let counts = read_only(deps.store(), move |tx| {
        Box::pin(async move {
            tx.match_status_counts(scope)
                .await
                .map_err(LifecycleError::from)
        })
    })
    .await?;

    let stats = MatchStats::from_counts(&counts);
    debug!(?scope, total = stats.total, "Match stats computed");
    Ok(stats)
}
