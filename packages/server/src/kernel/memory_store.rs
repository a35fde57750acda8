//! In-memory implementation of the persistence port.
//!
//! Units of work are serialized: `begin` takes the store's async mutex and
//! holds it until the unit of work is committed or dropped. Writes go to a
//! private copy of the tables which replaces the shared copy on commit, so an
//! aborted unit of work leaves no trace.
//!
//! Used by the test harness, and fine for local runs without Postgres.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::traits::{BaseStore, StatsScope, StoreTx};
use crate::common::{
    ConversationId, MatchId, MemberId, MessageId, PropertyId, RoomId, RoomRequestId,
};
use crate::domains::conversations::models::{Conversation, Message, MessageCounts};
use crate::domains::matches::models::{Match, MatchStatus};
use crate::domains::requests::models::{RequestStatus, RoomRequest};
use crate::domains::rooms::models::{Property, Room, RoomStatus};

/// Every table the core reads or writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    pub properties: HashMap<PropertyId, Property>,
    pub rooms: HashMap<RoomId, Room>,
    pub requests: HashMap<RoomRequestId, RoomRequest>,
    pub matches: HashMap<MatchId, Match>,
    pub conversations: HashMap<ConversationId, Conversation>,
    pub messages: HashMap<MessageId, Message>,
}

impl MemoryTables {
    fn owner_of(&self, room_id: RoomId) -> Option<MemberId> {
        let room = self.rooms.get(&room_id)?;
        self.properties.get(&room.property_id).map(|p| p.owner_id)
    }

    fn owned_by(&self, room_id: RoomId, owner: MemberId) -> bool {
        self.owner_of(room_id) == Some(owner)
    }

    /// Matches on a room that still hold it.
    pub fn open_matches_for_room(&self, room_id: RoomId) -> Vec<&Match> {
        self.matches
            .values()
            .filter(|m| m.room_id == room_id && !m.status.is_terminal())
            .collect()
    }
}

/// Shared in-memory store. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<AsyncMutex<MemoryTables>>,
    failures: Arc<Mutex<HashSet<&'static str>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the named write operation (e.g. `"insert_conversation"`) fail in
    /// every later unit of work until [`MemoryStore::clear_failures`].
    pub fn fail_on(&self, operation: &'static str) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(operation);
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.clear();
        }
    }

    /// Copy of the committed tables, for assertions.
    pub async fn snapshot(&self) -> MemoryTables {
        self.tables.lock().await.clone()
    }
}

#[async_trait]
impl BaseStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>> {
        let committed = self.tables.clone().lock_owned().await;
        let working = committed.clone();
        Ok(Box::new(MemoryTx {
            committed,
            working,
            failures: self.failures.clone(),
        }))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

struct MemoryTx {
    committed: OwnedMutexGuard<MemoryTables>,
    working: MemoryTables,
    failures: Arc<Mutex<HashSet<&'static str>>>,
}

impl MemoryTx {
    fn check(&self, operation: &'static str) -> Result<()> {
        let failures = self
            .failures
            .lock()
            .map_err(|_| anyhow!("failure set poisoned"))?;
        if failures.contains(operation) {
            return Err(anyhow!("injected failure in {}", operation));
        }
        Ok(())
    }

    fn in_scope_request(&self, request: &RoomRequest, scope: StatsScope) -> bool {
        match scope {
            StatsScope::All => true,
            StatsScope::Owner(owner) => self.working.owned_by(request.room_id, owner),
            StatsScope::Seeker(seeker) => request.requester_id == seeker,
        }
    }

    fn in_scope_match(&self, record: &Match, scope: StatsScope) -> bool {
        match scope {
            StatsScope::All => true,
            StatsScope::Owner(owner) => self.working.owned_by(record.room_id, owner),
            StatsScope::Seeker(seeker) => record.roomie_id == seeker,
        }
    }
}

fn tally<S: Copy + Eq + std::hash::Hash>(statuses: impl Iterator<Item = S>) -> Vec<(S, i64)> {
    let mut counts: HashMap<S, i64> = HashMap::new();
    for status in statuses {
        *counts.entry(status).or_default() += 1;
    }
    counts.into_iter().collect()
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn insert_property(&mut self, property: &Property) -> Result<()> {
        self.check("insert_property")?;
        self.working.properties.insert(property.id, property.clone());
        Ok(())
    }

    async fn insert_room(&mut self, room: &Room) -> Result<()> {
        self.check("insert_room")?;
        if !self.working.properties.contains_key(&room.property_id) {
            return Err(anyhow!("property {} does not exist", room.property_id));
        }
        self.working.rooms.insert(room.id, room.clone());
        Ok(())
    }

    async fn find_room(&mut self, id: RoomId) -> Result<Option<Room>> {
        Ok(self.working.rooms.get(&id).cloned())
    }

    async fn lock_room(&mut self, id: RoomId) -> Result<Option<Room>> {
        // The whole store is already held by this unit of work.
        self.find_room(id).await
    }

    async fn set_room_status(
        &mut self,
        id: RoomId,
        from: RoomStatus,
        to: RoomStatus,
    ) -> Result<bool> {
        self.check("set_room_status")?;
        match self.working.rooms.get_mut(&id) {
            Some(room) if room.status == from => {
                room.status = to;
                room.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn room_owner(&mut self, id: RoomId) -> Result<Option<MemberId>> {
        Ok(self.working.owner_of(id))
    }

    async fn insert_request(&mut self, request: &RoomRequest) -> Result<()> {
        self.check("insert_request")?;
        self.working.requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn find_request(&mut self, id: RoomRequestId) -> Result<Option<RoomRequest>> {
        Ok(self.working.requests.get(&id).cloned())
    }

    async fn lock_request(&mut self, id: RoomRequestId) -> Result<Option<RoomRequest>> {
        self.find_request(id).await
    }

    async fn update_request(&mut self, request: &RoomRequest) -> Result<()> {
        self.check("update_request")?;
        match self.working.requests.get_mut(&request.id) {
            Some(existing) => {
                *existing = request.clone();
                Ok(())
            }
            None => Err(anyhow!("request {} does not exist", request.id)),
        }
    }

    async fn has_pending_request(&mut self, room_id: RoomId, requester_id: MemberId) -> Result<bool> {
        Ok(self.working.requests.values().any(|r| {
            r.room_id == room_id && r.requester_id == requester_id && r.is_pending()
        }))
    }

    async fn pending_requests_for_room(&mut self, room_id: RoomId) -> Result<Vec<RoomRequest>> {
        let mut pending: Vec<RoomRequest> = self
            .working
            .requests
            .values()
            .filter(|r| r.room_id == room_id && r.is_pending())
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.created_at);
        Ok(pending)
    }

    async fn expire_pending_requests(&mut self, now: DateTime<Utc>) -> Result<u64> {
        self.check("expire_pending_requests")?;
        let mut expired = 0;
        for request in self.working.requests.values_mut() {
            if request.is_overdue(now) {
                request.resolve(RequestStatus::Expired, None, now);
                expired += 1;
            }
        }
        Ok(expired)
    }

    async fn request_status_counts(&mut self, scope: StatsScope) -> Result<Vec<(RequestStatus, i64)>> {
        Ok(tally(
            self.working
                .requests
                .values()
                .filter(|r| self.in_scope_request(r, scope))
                .map(|r| r.status),
        ))
    }

    async fn insert_match(&mut self, record: &Match) -> Result<()> {
        self.check("insert_match")?;
        if self
            .working
            .matches
            .values()
            .any(|m| m.request_id == record.request_id)
        {
            return Err(anyhow!("match for request {} already exists", record.request_id));
        }
        self.working.matches.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_match(&mut self, id: MatchId) -> Result<Option<Match>> {
        Ok(self.working.matches.get(&id).cloned())
    }

    async fn lock_match(&mut self, id: MatchId) -> Result<Option<Match>> {
        self.find_match(id).await
    }

    async fn update_match(&mut self, record: &Match) -> Result<()> {
        self.check("update_match")?;
        match self.working.matches.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(anyhow!("match {} does not exist", record.id)),
        }
    }

    async fn find_match_for_request(&mut self, request_id: RoomRequestId) -> Result<Option<Match>> {
        Ok(self
            .working
            .matches
            .values()
            .find(|m| m.request_id == request_id)
            .cloned())
    }

    async fn count_open_matches_for_room(&mut self, room_id: RoomId) -> Result<i64> {
        Ok(self.working.open_matches_for_room(room_id).len() as i64)
    }

    async fn match_status_counts(&mut self, scope: StatsScope) -> Result<Vec<(MatchStatus, i64)>> {
        Ok(tally(
            self.working
                .matches
                .values()
                .filter(|m| self.in_scope_match(m, scope))
                .map(|m| m.status),
        ))
    }

    async fn insert_conversation(&mut self, conversation: &Conversation) -> Result<()> {
        self.check("insert_conversation")?;
        if self
            .working
            .conversations
            .values()
            .any(|c| c.match_id == conversation.match_id)
        {
            return Err(anyhow!(
                "conversation for match {} already exists",
                conversation.match_id
            ));
        }
        self.working
            .conversations
            .insert(conversation.id, conversation.clone());
        Ok(())
    }

    async fn find_conversation(&mut self, id: ConversationId) -> Result<Option<Conversation>> {
        Ok(self.working.conversations.get(&id).cloned())
    }

    async fn find_conversation_for_match(&mut self, match_id: MatchId) -> Result<Option<Conversation>> {
        Ok(self
            .working
            .conversations
            .values()
            .find(|c| c.match_id == match_id)
            .cloned())
    }

    async fn update_conversation(&mut self, conversation: &Conversation) -> Result<()> {
        self.check("update_conversation")?;
        match self.working.conversations.get_mut(&conversation.id) {
            Some(existing) => {
                *existing = conversation.clone();
                Ok(())
            }
            None => Err(anyhow!("conversation {} does not exist", conversation.id)),
        }
    }

    async fn insert_message(&mut self, message: &Message) -> Result<()> {
        self.check("insert_message")?;
        self.working.messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn message_counts(&mut self, id: ConversationId, reader: MemberId) -> Result<MessageCounts> {
        let mut counts = MessageCounts::default();
        for message in self.working.messages.values().filter(|m| m.conversation_id == id) {
            counts.total += 1;
            if message.sender_id != reader && !message.is_read {
                counts.unread += 1;
            }
        }
        Ok(counts)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTx {
            mut committed,
            working,
            ..
        } = *self;
        *committed = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    async fn seeded() -> (MemoryStore, Room) {
        let store = MemoryStore::new();
        let property = Property::new(MemberId::new(), "Birch Flats");
        let room = Room::new(property.id, "Attic", Decimal::new(500, 0));

        let mut tx = store.begin().await.unwrap();
        tx.insert_property(&property).await.unwrap();
        tx.insert_room(&room).await.unwrap();
        tx.commit().await.unwrap();

        (store, room)
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_leaves_no_writes() {
        let (store, room) = seeded().await;

        {
            let mut tx = store.begin().await.unwrap();
            let moved = tx
                .set_room_status(room.id, RoomStatus::Available, RoomStatus::Reserved)
                .await
                .unwrap();
            assert!(moved);
        }

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.rooms[&room.id].status, RoomStatus::Available);
    }

    #[tokio::test]
    async fn test_room_status_is_compare_and_set() {
        let (store, room) = seeded().await;
        let mut tx = store.begin().await.unwrap();

        let moved = tx
            .set_room_status(room.id, RoomStatus::Reserved, RoomStatus::Occupied)
            .await
            .unwrap();

        assert!(!moved);
    }

    #[tokio::test]
    async fn test_injected_failure_surfaces_as_error() {
        let (store, room) = seeded().await;
        store.fail_on("set_room_status");

        let mut tx = store.begin().await.unwrap();
        let result = tx
            .set_room_status(room.id, RoomStatus::Available, RoomStatus::Reserved)
            .await;
        assert!(result.is_err());

        drop(tx);
        store.clear_failures();
        let mut tx = store.begin().await.unwrap();
        assert!(tx
            .set_room_status(room.id, RoomStatus::Available, RoomStatus::Reserved)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_room_owner_resolves_through_property() {
        let store = MemoryStore::new();
        let owner = MemberId::new();
        let property = Property::new(owner, "Cedar Court");
        let room = Room::new(property.id, "Garden room", Decimal::new(720, 0));

        let mut tx = store.begin().await.unwrap();
        tx.insert_property(&property).await.unwrap();
        tx.insert_room(&room).await.unwrap();

        assert_eq!(tx.room_owner(room.id).await.unwrap(), Some(owner));
        assert_eq!(tx.room_owner(RoomId::new()).await.unwrap(), None);
    }
}
