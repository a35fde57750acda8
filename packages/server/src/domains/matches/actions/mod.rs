//! Match domain actions - status transitions, ratings and reads.

mod queries;
mod rate;
mod stats;
mod update;

pub use queries::get_match;
pub use rate::rate_match;
pub use stats::{match_stats, MatchStats};
pub use update::update_match;

use crate::common::{LifecycleError, LifecycleResult, MatchId, Resource};
use crate::domains::matches::models::Match;
use crate::kernel::StoreTx;

/// Resolve the roomie and, through Room → Property, the owner of a match.
pub(crate) async fn match_resource(
    tx: &mut dyn StoreTx,
    record: &Match,
) -> LifecycleResult<Resource> {
    let owner_id = tx
        .room_owner(record.room_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("room {} not found", record.room_id)))?;

    Ok(Resource::Match {
        roomie_id: record.roomie_id,
        owner_id,
    })
}

pub(crate) fn match_not_found(id: MatchId) -> LifecycleError {
    LifecycleError::not_found(format!("match {} not found", id))
}
