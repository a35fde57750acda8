//! One-shot rating exchange on a completed match.
//!
//! Slots are named after the party being rated: the seeker fills
//! `owner_rating`, the owner fills `roomie_rating`.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{match_not_found, match_resource};
use crate::common::{Action, Actor, LifecycleError, LifecycleResult, MatchId, Role};
use crate::domains::matches::models::{Match, MatchStatus, RatedParty, Rating};
use crate::kernel::{run_atomically, ServerDeps, StoreTx};

/// Rate the other party of a completed match.
///
/// A member who is not a participant on the side their role implies gets
/// `NotFound`, admins included.
pub async fn rate_match(
    match_id: MatchId,
    actor: &Actor,
    rating: Rating,
    review: Option<String>,
    deps: &ServerDeps,
) -> LifecycleResult<Match> {
    let actor = *actor;
    let now = Utc::now();
    run_atomically(deps.store(), move |tx| {
        Box::pin(rate_in_tx(tx, match_id, actor, rating, review, now))
    })
    .await
}

async fn rate_in_tx(
    tx: &mut dyn StoreTx,
    match_id: MatchId,
    actor: Actor,
    rating: Rating,
    review: Option<String>,
    now: DateTime<Utc>,
) -> LifecycleResult<Match> {
    let mut record = tx
        .lock_match(match_id)
        .await?
        .ok_or_else(|| match_not_found(match_id))?;

    let resource = match_resource(tx, &record).await?;
    if !actor.can(Action::RateMatch).on(&resource).is_allowed() {
        warn!(%match_id, member_id = %actor.member_id, role = %actor.role, "Rating by non-participant");
        return Err(match_not_found(match_id));
    }

    let party = match actor.role {
        Role::Seeker => RatedParty::Owner,
        Role::Owner => RatedParty::Roomie,
        Role::Admin => return Err(match_not_found(match_id)),
    };

    if record.status != MatchStatus::Completed {
        return Err(LifecycleError::invalid_state(format!(
            "match {} is {}, ratings open once it is completed",
            match_id, record.status
        )));
    }

    if record.rating_of(party).is_some() {
        return Err(LifecycleError::conflict("you have already rated this match"));
    }

    record.set_rating(party, rating, review);
    record.updated_at = now;
    tx.update_match(&record).await?;

    info!(%match_id, rated = ?party, rating = rating.value(), "Match rated");
    Ok(record)
}
