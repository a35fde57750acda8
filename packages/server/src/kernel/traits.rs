// Trait definitions for the persistence port
//
// These are INFRASTRUCTURE traits only - no business logic.
// Lifecycle rules live in the domain actions that drive a StoreTx.
//
// Naming convention: Base* for injected services (e.g., BaseStore)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::{
    Actor, ConversationId, MatchId, MemberId, Role, RoomId, RoomRequestId,
};
use crate::domains::conversations::models::{Conversation, Message, MessageCounts};
use crate::domains::matches::models::{Match, MatchStatus};
use crate::domains::requests::models::{RequestStatus, RoomRequest};
use crate::domains::rooms::models::{Property, Room, RoomStatus};

// =============================================================================
// Stats scope
// =============================================================================

/// Which rows an aggregate query counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsScope {
    /// Everything (admins).
    All,
    /// Rows attached to rooms whose property this member owns.
    Owner(MemberId),
    /// Requests this member made / matches where they are the roomie.
    Seeker(MemberId),
}

impl StatsScope {
    pub fn for_actor(actor: &Actor) -> Self {
        match actor.role {
            Role::Admin => StatsScope::All,
            Role::Owner => StatsScope::Owner(actor.member_id),
            Role::Seeker => StatsScope::Seeker(actor.member_id),
        }
    }
}

// =============================================================================
// Unit of work
// =============================================================================

/// One open unit of work against the store.
///
/// Dropping a `StoreTx` without calling [`StoreTx::commit`] discards every
/// write made through it. `lock_*` reads hold the row until the unit of work
/// ends; the accept cascade always locks the room before any request.
#[async_trait]
pub trait StoreTx: Send {
    // --- properties & rooms ------------------------------------------------

    async fn insert_property(&mut self, property: &Property) -> Result<()>;

    async fn insert_room(&mut self, room: &Room) -> Result<()>;

    async fn find_room(&mut self, id: RoomId) -> Result<Option<Room>>;

    async fn lock_room(&mut self, id: RoomId) -> Result<Option<Room>>;

    /// Compare-and-set on room status. Returns false when the room was not
    /// in `from` (or does not exist).
    async fn set_room_status(&mut self, id: RoomId, from: RoomStatus, to: RoomStatus)
        -> Result<bool>;

    /// Resolves Room → Property → owner.
    async fn room_owner(&mut self, id: RoomId) -> Result<Option<MemberId>>;

    // --- requests ------------------------------------------------------------

    async fn insert_request(&mut self, request: &RoomRequest) -> Result<()>;

    async fn find_request(&mut self, id: RoomRequestId) -> Result<Option<RoomRequest>>;

    async fn lock_request(&mut self, id: RoomRequestId) -> Result<Option<RoomRequest>>;

    async fn update_request(&mut self, request: &RoomRequest) -> Result<()>;

    async fn has_pending_request(&mut self, room_id: RoomId, requester_id: MemberId)
        -> Result<bool>;

    /// Pending requests for a room, locked.
    async fn pending_requests_for_room(&mut self, room_id: RoomId) -> Result<Vec<RoomRequest>>;

    /// Marks every pending request with `expires_at <= now` as expired.
    async fn expire_pending_requests(&mut self, now: DateTime<Utc>) -> Result<u64>;

    async fn request_status_counts(&mut self, scope: StatsScope)
        -> Result<Vec<(RequestStatus, i64)>>;

    // --- matches -------------------------------------------------------------

    async fn insert_match(&mut self, record: &Match) -> Result<()>;

    async fn find_match(&mut self, id: MatchId) -> Result<Option<Match>>;

    async fn lock_match(&mut self, id: MatchId) -> Result<Option<Match>>;

    async fn update_match(&mut self, record: &Match) -> Result<()>;

    async fn find_match_for_request(&mut self, request_id: RoomRequestId)
        -> Result<Option<Match>>;

    /// Matches on the room in ACTIVE, PENDING_PAYMENT or CONFIRMED.
    async fn count_open_matches_for_room(&mut self, room_id: RoomId) -> Result<i64>;

    async fn match_status_counts(&mut self, scope: StatsScope) -> Result<Vec<(MatchStatus, i64)>>;

    // --- conversations -------------------------------------------------------

    async fn insert_conversation(&mut self, conversation: &Conversation) -> Result<()>;

    async fn find_conversation(&mut self, id: ConversationId) -> Result<Option<Conversation>>;

    async fn find_conversation_for_match(&mut self, match_id: MatchId)
        -> Result<Option<Conversation>>;

    async fn update_conversation(&mut self, conversation: &Conversation) -> Result<()>;

    async fn insert_message(&mut self, message: &Message) -> Result<()>;

    /// Total messages, and messages not sent by `reader` that are unread.
    async fn message_counts(&mut self, id: ConversationId, reader: MemberId)
        -> Result<MessageCounts>;

    async fn commit(self: Box<Self>) -> Result<()>;
}

// =============================================================================
// Store (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseStore: Send + Sync {
    /// Open a unit of work.
    async fn begin(&self) -> Result<Box<dyn StoreTx>>;

    /// Cheap liveness check for the health endpoint.
    async fn ping(&self) -> Result<()>;
}
