//! Conversation reads and bookkeeping for the messaging subsystem.

use chrono::Utc;
use tracing::debug;

use crate::common::{
    Action, Actor, ConversationId, LifecycleError, LifecycleResult, MatchId, Resource,
};
use crate::domains::conversations::gateway;
use crate::domains::conversations::models::{Conversation, ConversationSummary};
use crate::kernel::{read_only, run_atomically, ServerDeps, StoreTx};

/// Bump `last_message_at` after the messaging subsystem stores a message.
pub async fn touch_conversation(
    conversation_id: ConversationId,
    deps: &ServerDeps,
) -> LifecycleResult<Conversation> {
    let now = Utc::now();
    run_atomically(deps.store(), move |tx| {
        Box::pin(gateway::touch(tx, conversation_id, now))
    })
    .await
}

/// Conversation plus message counts, for either participant or an admin.
///
/// Unread counts messages sent by the other party that are not yet read.
pub async fn conversation_summary(
    conversation_id: ConversationId,
    actor: &Actor,
    deps: &ServerDeps,
) -> LifecycleResult<ConversationSummary> {
    let actor = *actor;
    read_only(deps.store(), move |tx| {
        Box::pin(summary_in_tx(tx, conversation_id, actor))
    })
    .await
}

/// The conversation attached to a match.
pub async fn conversation_for_match(
    match_id: MatchId,
    actor: &Actor,
    deps: &ServerDeps,
) -> LifecycleResult<Conversation> {
    let actor = *actor;
    read_only(deps.store(), move |tx| {
        Box::pin(for_match_in_tx(tx, match_id, actor))
    })
    .await
}

async fn summary_in_tx(
    tx: &mut dyn StoreTx,
    conversation_id: ConversationId,
    actor: Actor,
) -> LifecycleResult<ConversationSummary> {
    let conversation = tx
        .find_conversation(conversation_id)
        .await?
        .ok_or_else(|| {
            LifecycleError::not_found(format!("conversation {} not found", conversation_id))
        })?;

    authorize(tx, conversation.match_id, actor).await?;

    let counts = tx.message_counts(conversation_id, actor.member_id).await?;
    debug!(%conversation_id, total = counts.total, unread = counts.unread, "Conversation summary");

    Ok(ConversationSummary {
        conversation,
        message_count: counts.total,
        unread_count: counts.unread,
    })
}

async fn for_match_in_tx(
    tx: &mut dyn StoreTx,
    match_id: MatchId,
    actor: Actor,
) -> LifecycleResult<Conversation> {
    authorize(tx, match_id, actor).await?;
    gateway::find_for_match(tx, match_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("no conversation for match {}", match_id)))
}

/// Conversation → Match → Room → Property → owner.
async fn authorize(tx: &mut dyn StoreTx, match_id: MatchId, actor: Actor) -> LifecycleResult<()> {
    let record = tx
        .find_match(match_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("match {} not found", match_id)))?;
    let owner_id = tx
        .room_owner(record.room_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("room {} not found", record.room_id)))?;

    actor
        .can(Action::ViewConversation)
        .check(&Resource::Conversation {
            roomie_id: record.roomie_id,
            owner_id,
        })?;
    Ok(())
}
