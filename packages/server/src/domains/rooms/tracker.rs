//! Room availability tracking.
//!
//! Every room status write goes through here as a guarded compare-and-set:
//!
//! ```text
//! AVAILABLE ──reserve──► RESERVED ──occupy──► OCCUPIED
//!     ▲                     │                    │
//!     └──────release────────┴────────────────────┘
//! ```
//!
//! An illegal transition means a caller broke the request/match state
//! machine, so it is logged as an error and surfaced as `InvalidState`.

use tracing::{error, info};

use crate::common::{LifecycleError, LifecycleResult, RoomId};
use crate::domains::rooms::models::RoomStatus;
use crate::kernel::StoreTx;

/// AVAILABLE → RESERVED, on acceptance of a request.
pub async fn reserve(tx: &mut dyn StoreTx, room_id: RoomId) -> LifecycleResult<()> {
    let open = tx.count_open_matches_for_room(room_id).await?;
    if open > 0 {
        error!(%room_id, open, "Reserve attempted on a room that already has an open match");
        return Err(LifecycleError::invalid_state(format!(
            "room {} already has an open match",
            room_id
        )));
    }

    transition(tx, room_id, &[RoomStatus::Available], RoomStatus::Reserved).await
}

/// RESERVED → OCCUPIED, on match confirmation.
pub async fn occupy(tx: &mut dyn StoreTx, room_id: RoomId) -> LifecycleResult<()> {
    transition(tx, room_id, &[RoomStatus::Reserved], RoomStatus::Occupied).await
}

/// RESERVED or OCCUPIED → AVAILABLE, when a match completes or is cancelled.
pub async fn release(tx: &mut dyn StoreTx, room_id: RoomId) -> LifecycleResult<()> {
    transition(
        tx,
        room_id,
        &[RoomStatus::Reserved, RoomStatus::Occupied],
        RoomStatus::Available,
    )
    .await
}

async fn transition(
    tx: &mut dyn StoreTx,
    room_id: RoomId,
    from: &[RoomStatus],
    to: RoomStatus,
) -> LifecycleResult<()> {
    for &status in from {
        if tx.set_room_status(room_id, status, to).await? {
            info!(%room_id, from = %status, to = %to, "Room status changed");
            return Ok(());
        }
    }

    let room = tx
        .find_room(room_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("room {} not found", room_id)))?;

    error!(%room_id, current = %room.status, target = %to, "Illegal room transition");
    Err(LifecycleError::invalid_state(format!(
        "room {} cannot move from {} to {}",
        room_id, room.status, to
    )))
}
