use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{ConversationId, MatchId, MemberId, MessageId};

/// Conversation - the messaging channel bound 1:1 to a match
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: ConversationId,
    pub match_id: MatchId,
    /// The messaging subsystem refuses sends when this is false.
    pub is_active: bool,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn for_match(match_id: MatchId, now: DateTime<Utc>) -> Self {
        Self {
            id: ConversationId::new(),
            match_id,
            is_active: true,
            last_message_at: None,
            created_at: now,
        }
    }
}

/// Message row as written by the messaging subsystem.
///
/// The core only counts these; content is never inspected here.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: MemberId,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(conversation_id: ConversationId, sender_id: MemberId, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            sender_id,
            content: content.into(),
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

/// Counts exposed to the messaging UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageCounts {
    pub total: i64,
    pub unread: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation: Conversation,
    pub message_count: i64,
    pub unread_count: i64,
}
