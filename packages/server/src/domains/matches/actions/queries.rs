use tracing::debug;

use super::{match_not_found, match_resource};
use crate::common::{Action, Actor, LifecycleResult, MatchId};
use crate::domains::matches::models::Match;
use crate::kernel::{read_only, ServerDeps, StoreTx};

/// Fetch a match visible to its roomie, the room owner or an admin.
pub async fn get_match(match_id: MatchId, actor: &Actor, deps: &ServerDeps) -> LifecycleResult<Match> {
    let actor = *actor;
    read_only(deps.store(), move |tx| Box::pin(get_in_tx(tx, match_id, actor))).await
}

async fn get_in_tx(tx: &mut dyn StoreTx, match_id: MatchId, actor: Actor) -> LifecycleResult<Match> {
    let record = tx
        .find_match(match_id)
        .await?
        .ok_or_else(|| match_not_found(match_id))?;

    let resource = match_resource(tx, &record).await?;
    actor.can(Action::ViewMatch).check(&resource)?;

    debug!(%match_id, member_id = %actor.member_id, "Match fetched");
    Ok(record)
}
