//! Conversation gateway - the channel bound to a match.
//!
//! `open` runs inside the accept cascade and `close` inside a match
//! cancellation, so both take the caller's unit of work. The messaging
//! subsystem owns messages; it calls `touch` after storing one and must
//! consult [`ensure_accepting_messages`] before accepting a send.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::common::{ConversationId, LifecycleError, LifecycleResult, MatchId};
use crate::domains::conversations::models::Conversation;
use crate::kernel::StoreTx;

/// Create the conversation for a freshly created match.
///
/// Called exactly once per match; the store rejects a second conversation
/// for the same match.
pub async fn open(
    tx: &mut dyn StoreTx,
    match_id: MatchId,
    now: DateTime<Utc>,
) -> LifecycleResult<Conversation> {
    let conversation = Conversation::for_match(match_id, now);
    tx.insert_conversation(&conversation).await?;
    info!(conversation_id = %conversation.id, %match_id, "Conversation opened");
    Ok(conversation)
}

/// Record that a message was just stored.
pub async fn touch(
    tx: &mut dyn StoreTx,
    conversation_id: ConversationId,
    at: DateTime<Utc>,
) -> LifecycleResult<Conversation> {
    let mut conversation = find(tx, conversation_id).await?;
    conversation.last_message_at = Some(at);
    tx.update_conversation(&conversation).await?;
    Ok(conversation)
}

/// Stop the conversation from accepting new messages. Closing twice is a no-op.
pub async fn close(
    tx: &mut dyn StoreTx,
    conversation_id: ConversationId,
) -> LifecycleResult<Conversation> {
    let mut conversation = find(tx, conversation_id).await?;
    if conversation.is_active {
        conversation.is_active = false;
        tx.update_conversation(&conversation).await?;
        info!(%conversation_id, "Conversation closed");
    }
    Ok(conversation)
}

pub async fn find_for_match(
    tx: &mut dyn StoreTx,
    match_id: MatchId,
) -> LifecycleResult<Option<Conversation>> {
    Ok(tx.find_conversation_for_match(match_id).await?)
}

/// Gate for the messaging subsystem.
pub fn ensure_accepting_messages(conversation: &Conversation) -> LifecycleResult<()> {
    if conversation.is_active {
        Ok(())
    } else {
        Err(LifecycleError::invalid_state(format!(
            "conversation {} is closed",
            conversation.id
        )))
    }
}

async fn find(tx: &mut dyn StoreTx, id: ConversationId) -> LifecycleResult<Conversation> {
    tx.find_conversation(id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("conversation {} not found", id)))
}
