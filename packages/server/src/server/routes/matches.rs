use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;

use crate::common::{LifecycleError, MatchId};
use crate::domains::conversations::{self, Conversation};
use crate::domains::matches::{self, Match, MatchPatch, MatchStats, Rating};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct RateBody {
    /// Out-of-range values are rejected at deserialization.
    pub rating: Rating,
    #[serde(default)]
    pub review: Option<String>,
}

/// GET /matches/:id
pub async fn get_match_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(match_id): Path<MatchId>,
) -> Result<Json<Match>, LifecycleError> {
    Ok(Json(matches::get_match(match_id, &user.actor(), &state.deps).await?))
}

/// PATCH /matches/:id
pub async fn update_match_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(match_id): Path<MatchId>,
    Json(patch): Json<MatchPatch>,
) -> Result<Json<Match>, LifecycleError> {
    let record = matches::update_match(match_id, &user.actor(), patch, &state.deps).await?;
    Ok(Json(record))
}

/// POST /matches/:id/rate
pub async fn rate_match_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(match_id): Path<MatchId>,
    Json(body): Json<RateBody>,
) -> Result<Json<Match>, LifecycleError> {
    let record =
        matches::rate_match(match_id, &user.actor(), body.rating, body.review, &state.deps).await?;
    Ok(Json(record))
}

/// GET /matches/stats
pub async fn match_stats_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> Result<Json<MatchStats>, LifecycleError> {
    Ok(Json(matches::match_stats(&user.actor(), &state.deps).await?))
}

/// GET /matches/:id/conversation
pub async fn match_conversation_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(match_id): Path<MatchId>,
) -> Result<Json<Conversation>, LifecycleError> {
    let conversation =
        conversations::conversation_for_match(match_id, &user.actor(), &state.deps).await?;
    Ok(Json(conversation))
}
