//! Request domain actions - business logic functions
//!
//! Actions are async functions called directly from HTTP handlers and the
//! scheduler. Each one runs inside a single unit of work and returns the
//! affected entity or a typed [`LifecycleError`].

mod cancel;
mod create;
mod expire;
mod queries;
mod respond;
mod stats;

pub use cancel::cancel_request;
pub use create::create_request;
pub use expire::expire_overdue_requests;
pub use queries::get_request;
pub use respond::respond_to_request;
pub use stats::{request_stats, RequestStats};

use crate::common::{LifecycleError, LifecycleResult, Resource, RoomRequestId};
use crate::domains::requests::models::RoomRequest;
use crate::kernel::StoreTx;

/// Resolve the requester and the room owner for a policy check.
pub(crate) async fn request_resource(
    tx: &mut dyn StoreTx,
    request: &RoomRequest,
) -> LifecycleResult<Resource> {
    let owner_id = tx
        .room_owner(request.room_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("room {} not found", request.room_id)))?;

    Ok(Resource::Request {
        requester_id: request.requester_id,
        owner_id,
    })
}

pub(crate) fn request_not_found(id: RoomRequestId) -> LifecycleError {
    LifecycleError::not_found(format!("request {} not found", id))
}

pub(crate) fn ensure_pending(request: &RoomRequest) -> LifecycleResult<()> {
    if request.is_pending() {
        Ok(())
    } else {
        Err(LifecycleError::invalid_state(format!(
            "request {} is already {}",
            request.id, request.status
        )))
    }
}
