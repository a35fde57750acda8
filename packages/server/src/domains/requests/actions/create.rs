//! Create a room request on behalf of a seeker.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::common::{LifecycleError, LifecycleResult, MemberId, RoomId};
use crate::domains::requests::models::{RequestDetails, RoomRequest};
use crate::kernel::{run_atomically, ServerDeps, StoreTx};

/// Create a PENDING request that expires seven days from now.
///
/// Fails with `NotFound` when the room does not exist, `InvalidState` when it
/// is not available and `Conflict` when the requester already has a pending
/// request for it.
pub async fn create_request(
    requester_id: MemberId,
    room_id: RoomId,
    details: RequestDetails,
    deps: &ServerDeps,
) -> LifecycleResult<RoomRequest> {
    let now = Utc::now();
    run_atomically(deps.store(), move |tx| {
        Box::pin(create_in_tx(tx, requester_id, room_id, details, now))
    })
    .await
}

async fn create_in_tx(
    tx: &mut dyn StoreTx,
    requester_id: MemberId,
    room_id: RoomId,
    details: RequestDetails,
    now: DateTime<Utc>,
) -> LifecycleResult<RoomRequest> {
    let room = tx
        .lock_room(room_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("room {} not found", room_id)))?;

    if !room.is_available() {
        warn!(%room_id, status = %room.status, "Request for unavailable room");
        return Err(LifecycleError::invalid_state(format!(
            "room {} is {}",
            room_id, room.status
        )));
    }

    if tx.has_pending_request(room_id, requester_id).await? {
        warn!(%room_id, %requester_id, "Duplicate pending request");
        return Err(LifecycleError::conflict(
            "you already have a pending request for this room",
        ));
    }

    let request = RoomRequest::new(room_id, requester_id, details, now);
    tx.insert_request(&request).await?;

    info!(
        request_id = %request.id,
        %room_id,
        %requester_id,
        expires_at = %request.expires_at,
        "Room request created"
    );
    Ok(request)
}
