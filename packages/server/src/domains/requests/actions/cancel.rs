//! Seeker withdrawal of a pending request.

use chrono::{DateTime, Utc};
use tracing::info;

use super::{ensure_pending, request_not_found, request_resource};
use crate::common::{Action, Actor, LifecycleResult, RoomRequestId};
use crate::domains::requests::models::{RequestStatus, RoomRequest};
use crate::kernel::{run_atomically, ServerDeps, StoreTx};

/// Cancel a pending request. Only the original requester may cancel.
pub async fn cancel_request(
    request_id: RoomRequestId,
    actor: &Actor,
    deps: &ServerDeps,
) -> LifecycleResult<RoomRequest> {
    let actor = *actor;
    let now = Utc::now();
    run_atomically(deps.store(), move |tx| {
        Box::pin(cancel_in_tx(tx, request_id, actor, now))
    })
    .await
}

async fn cancel_in_tx(
    tx: &mut dyn StoreTx,
    request_id: RoomRequestId,
    actor: Actor,
    now: DateTime<Utc>,
) -> LifecycleResult<RoomRequest> {
    let mut request = tx
        .lock_request(request_id)
        .await?
        .ok_or_else(|| request_not_found(request_id))?;

    let resource = request_resource(tx, &request).await?;
    actor.can(Action::CancelRequest).check(&resource)?;
    ensure_pending(&request)?;

    request.resolve(RequestStatus::Cancelled, None, now);
    tx.update_request(&request).await?;

    info!(%request_id, "Room request cancelled");
    Ok(request)
}
