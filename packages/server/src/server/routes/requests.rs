use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::{LifecycleError, RoomId, RoomRequestId};
use crate::domains::requests::{
    self, RequestDetails, RequestStats, ResponseDecision, RoomRequest,
};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct RespondBody {
    pub decision: ResponseDecision,
    #[serde(default)]
    pub response_message: Option<String>,
}

/// POST /rooms/:room_id/requests
pub async fn create_request_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(room_id): Path<RoomId>,
    Json(details): Json<RequestDetails>,
) -> Result<(StatusCode, Json<RoomRequest>), LifecycleError> {
    let request = requests::create_request(user.member_id, room_id, details, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /requests/:id
pub async fn get_request_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(request_id): Path<RoomRequestId>,
) -> Result<Json<RoomRequest>, LifecycleError> {
    let request = requests::get_request(request_id, &user.actor(), &state.deps).await?;
    Ok(Json(request))
}

/// POST /requests/:id/respond
pub async fn respond_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(request_id): Path<RoomRequestId>,
    Json(body): Json<RespondBody>,
) -> Result<Json<RoomRequest>, LifecycleError> {
    let request = requests::respond_to_request(
        request_id,
        &user.actor(),
        body.decision,
        body.response_message,
        &state.deps,
    )
    .await?;
    Ok(Json(request))
}

/// POST /requests/:id/cancel
pub async fn cancel_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(request_id): Path<RoomRequestId>,
) -> Result<Json<RoomRequest>, LifecycleError> {
    let request = requests::cancel_request(request_id, &user.actor(), &state.deps).await?;
    Ok(Json(request))
}

/// GET /requests/stats
pub async fn request_stats_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> Result<Json<RequestStats>, LifecycleError> {
    Ok(Json(requests::request_stats(&user.actor(), &state.deps).await?))
}
