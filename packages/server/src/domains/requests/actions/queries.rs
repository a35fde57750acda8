use tracing::debug;

use super::{request_not_found, request_resource};
use crate::common::{Action, Actor, LifecycleResult, RoomRequestId};
use crate::domains::requests::models::RoomRequest;
use crate::kernel::{read_only, ServerDeps, StoreTx};

/// Fetch a request visible to the requester, the room owner or an admin.
pub async fn get_request(
    request_id: RoomRequestId,
    actor: &Actor,
    deps: &ServerDeps,
) -> LifecycleResult<RoomRequest> {
    let actor = *actor;
    read_only(deps.store(), move |tx| Box::pin(get_in_tx(tx, request_id, actor))).await
}

async fn get_in_tx(
    tx: &mut dyn StoreTx,
    request_id: RoomRequestId,
    actor: Actor,
) -> LifecycleResult<RoomRequest> {
    let request = tx
        .find_request(request_id)
        .await?
        .ok_or_else(|| request_not_found(request_id))?;

    let resource = request_resource(tx, &request).await?;
    actor.can(Action::ViewRequest).check(&resource)?;

    debug!(%request_id, member_id = %actor.member_id, "Request fetched");
    Ok(request)
}
