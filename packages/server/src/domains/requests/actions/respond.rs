//! Owner response to a pending request, including the accept cascade.
//!
//! Accepting runs five writes in one unit of work:
//!
//! ```text
//! lock room ─► lock request ─► request ACCEPTED
//!                           ─► room RESERVED
//!                           ─► match ACTIVE
//!                           ─► conversation opened
//!                           ─► rival PENDING requests REJECTED
//! ```
//!
//! The room row is locked before the request row. Two owners accepting
//! rival requests for the same room therefore queue on the room; the second
//! sees it RESERVED (or its own request already rejected) and fails.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{ensure_pending, request_not_found, request_resource};
use crate::common::{Action, Actor, LifecycleError, LifecycleResult, RoomId, RoomRequestId};
use crate::domains::conversations::gateway;
use crate::domains::matches::models::Match;
use crate::domains::requests::models::{
    RequestStatus, ResponseDecision, RoomRequest, ROOM_RESERVED_MESSAGE,
};
use crate::domains::rooms::tracker;
use crate::kernel::{run_atomically, ServerDeps, StoreTx};

/// Accept or reject a pending request. Only the room's owner may respond.
pub async fn respond_to_request(
    request_id: RoomRequestId,
    actor: &Actor,
    decision: ResponseDecision,
    response_message: Option<String>,
    deps: &ServerDeps,
) -> LifecycleResult<RoomRequest> {
    let actor = *actor;
    let now = Utc::now();
    run_atomically(deps.store(), move |tx| {
        Box::pin(respond_in_tx(
            tx,
            request_id,
            actor,
            decision,
            response_message,
            now,
        ))
    })
    .await
}

async fn respond_in_tx(
    tx: &mut dyn StoreTx,
    request_id: RoomRequestId,
    actor: Actor,
    decision: ResponseDecision,
    response_message: Option<String>,
    now: DateTime<Utc>,
) -> LifecycleResult<RoomRequest> {
    // Unlocked read for the policy check; the state checks below re-read
    // under lock.
    let request = tx
        .find_request(request_id)
        .await?
        .ok_or_else(|| request_not_found(request_id))?;

    let resource = request_resource(tx, &request).await?;
    actor.can(Action::RespondToRequest).check(&resource)?;

    match decision {
        ResponseDecision::Reject => reject(tx, request_id, response_message, now).await,
        ResponseDecision::Accept => {
            accept(tx, request_id, request.room_id, response_message, now).await
        }
    }
}

async fn reject(
    tx: &mut dyn StoreTx,
    request_id: RoomRequestId,
    response_message: Option<String>,
    now: DateTime<Utc>,
) -> LifecycleResult<RoomRequest> {
    let mut request = tx
        .lock_request(request_id)
        .await?
        .ok_or_else(|| request_not_found(request_id))?;
    ensure_pending(&request)?;

    request.resolve(RequestStatus::Rejected, response_message, now);
    tx.update_request(&request).await?;

    info!(%request_id, room_id = %request.room_id, "Room request rejected");
    Ok(request)
}

async fn accept(
    tx: &mut dyn StoreTx,
    request_id: RoomRequestId,
    room_id: RoomId,
    response_message: Option<String>,
    now: DateTime<Utc>,
) -> LifecycleResult<RoomRequest> {
    let room = tx
        .lock_room(room_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("room {} not found", room_id)))?;

    let mut request = tx
        .lock_request(request_id)
        .await?
        .ok_or_else(|| request_not_found(request_id))?;
    ensure_pending(&request)?;

    if !room.is_available() {
        warn!(%request_id, %room_id, status = %room.status, "Accept lost the room");
        return Err(LifecycleError::conflict("room is no longer available"));
    }

    if tx.find_match_for_request(request_id).await?.is_some() {
        warn!(%request_id, "Accept attempted on a request that already has a match");
        return Err(LifecycleError::conflict(format!(
            "request {} already has a match",
            request_id
        )));
    }

    request.resolve(RequestStatus::Accepted, response_message, now);
    tx.update_request(&request).await?;

    tracker::reserve(tx, room_id).await?;

    let tenancy = Match::from_accepted_request(&request, &room, now);
    tx.insert_match(&tenancy).await?;

    let conversation = gateway::open(tx, tenancy.id, now).await?;

    let rivals = tx.pending_requests_for_room(room_id).await?;
    let rejected = rivals.len();
    for mut rival in rivals {
        rival.resolve(
            RequestStatus::Rejected,
            Some(ROOM_RESERVED_MESSAGE.to_string()),
            now,
        );
        tx.update_request(&rival).await?;
        debug!(request_id = %rival.id, "Rival request rejected");
    }

    info!(
        %request_id,
        %room_id,
        match_id = %tenancy.id,
        conversation_id = %conversation.id,
        rivals_rejected = rejected,
        "Room request accepted"
    );
    Ok(request)
}
