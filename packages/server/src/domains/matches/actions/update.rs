//! Owner/admin updates to a match.
//!
//! Status side effects, all inside the same unit of work:
//!
//! | new status | room            | conversation |
//! |------------|-----------------|--------------|
//! | CONFIRMED  | occupy          |              |
//! | COMPLETED  | release         |              |
//! | CANCELLED  | release         | close        |

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{match_not_found, match_resource};
use crate::common::{Action, Actor, LifecycleError, LifecycleResult, MatchId};
use crate::domains::conversations::gateway;
use crate::domains::matches::models::{Match, MatchPatch, MatchStatus};
use crate::domains::matches::transitions::TransitionGuard;
use crate::domains::rooms::models::RoomStatus;
use crate::domains::rooms::tracker;
use crate::kernel::{run_atomically, ServerDeps, StoreTx};

/// Apply a patch to a match. Only the room's owner or an admin may update.
///
/// Free-form fields are applied whether or not the status changes. Which
/// status changes are legal depends on the configured [`TransitionGuard`].
pub async fn update_match(
    match_id: MatchId,
    actor: &Actor,
    patch: MatchPatch,
    deps: &ServerDeps,
) -> LifecycleResult<Match> {
    let actor = *actor;
    let guard = deps.transition_guard;
    let now = Utc::now();
    run_atomically(deps.store(), move |tx| {
        Box::pin(update_in_tx(tx, match_id, actor, patch, guard, now))
    })
    .await
}

async fn update_in_tx(
    tx: &mut dyn StoreTx,
    match_id: MatchId,
    actor: Actor,
    patch: MatchPatch,
    guard: TransitionGuard,
    now: DateTime<Utc>,
) -> LifecycleResult<Match> {
    let snapshot = tx
        .find_match(match_id)
        .await?
        .ok_or_else(|| match_not_found(match_id))?;

    let resource = match_resource(tx, &snapshot).await?;
    actor.can(Action::UpdateMatch).check(&resource)?;

    // Room before match, same order as the accept cascade.
    let room = tx
        .lock_room(snapshot.room_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("room {} not found", snapshot.room_id)))?;
    let mut record = tx
        .lock_match(match_id)
        .await?
        .ok_or_else(|| match_not_found(match_id))?;

    let from = record.status;
    let target = match patch.status {
        Some(to) => match guard.check(from, to) {
            Ok(true) => Some(to),
            Ok(false) => None,
            Err(e) => {
                warn!(%match_id, %from, %to, ?guard, "Match transition refused");
                return Err(e);
            }
        },
        None => None,
    };

    record.apply_fields(&patch);
    record.updated_at = now;

    if let Some(to) = target {
        record.status = to;
        match to {
            MatchStatus::Confirmed if room.status != RoomStatus::Occupied => {
                tracker::occupy(tx, record.room_id).await?;
            }
            MatchStatus::Completed => {
                tracker::release(tx, record.room_id).await?;
            }
            MatchStatus::Cancelled => {
                tracker::release(tx, record.room_id).await?;
                if let Some(conversation) = gateway::find_for_match(tx, match_id).await? {
                    gateway::close(tx, conversation.id).await?;
                }
            }
            _ => {}
        }
    }

    tx.update_match(&record).await?;

    match target {
        Some(to) => info!(%match_id, %from, %to, member_id = %actor.member_id, "Match status changed"),
        None => info!(%match_id, member_id = %actor.member_id, "Match updated"),
    }
    Ok(record)
}
