use axum::{
    extract::{Extension, Path},
    Json,
};

use crate::common::{ConversationId, LifecycleError};
use crate::domains::conversations::{self, ConversationSummary};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// GET /conversations/:id
pub async fn conversation_summary_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(conversation_id): Path<ConversationId>,
) -> Result<Json<ConversationSummary>, LifecycleError> {
    let summary =
        conversations::conversation_summary(conversation_id, &user.actor(), &state.deps).await?;
    Ok(Json(summary))
}
