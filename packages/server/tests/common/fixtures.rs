//! Test fixtures for creating test data.
//!
//! Fixtures write through the persistence port, so they work for both the
//! in-memory store and Postgres.

use roomie_core::common::{Actor, ConversationId, MatchId, MemberId, Role, RoomId, RoomRequestId};
use roomie_core::domains::conversations::Message;
use roomie_core::domains::requests::{self, RequestDetails, ResponseDecision};
use roomie_core::domains::rooms::{Property, Room};
use roomie_core::kernel::{BaseStore, ServerDeps};
use rust_decimal::Decimal;

pub fn owner() -> Actor {
    Actor::new(MemberId::new(), Role::Owner)
}

pub fn seeker() -> Actor {
    Actor::new(MemberId::new(), Role::Seeker)
}

pub fn admin() -> Actor {
    Actor::new(MemberId::new(), Role::Admin)
}

/// An AVAILABLE room at 650.00/month owned by `owner`.
pub async fn seed_room(store: &dyn BaseStore, owner: &Actor) -> RoomId {
    let property = Property::new(owner.member_id, "Maple Street House");
    let room = Room::new(property.id, "Sunny front room", Decimal::new(65000, 2));

    let mut tx = store.begin().await.expect("begin");
    tx.insert_property(&property).await.expect("insert property");
    tx.insert_room(&room).await.expect("insert room");
    tx.commit().await.expect("commit");

    room.id
}

/// A pending request from `seeker` for `room_id`.
pub async fn seed_request(deps: &ServerDeps, seeker: &Actor, room_id: RoomId) -> RoomRequestId {
    requests::create_request(seeker.member_id, room_id, RequestDetails::default(), deps)
        .await
        .expect("create request")
        .id
}

pub async fn seed_message(
    store: &dyn BaseStore,
    conversation_id: ConversationId,
    sender: &Actor,
    content: &str,
) {
    let mut tx = store.begin().await.expect("begin");
    tx.insert_message(&Message::new(conversation_id, sender.member_id, content))
        .await
        .expect("insert message");
    tx.commit().await.expect("commit");
}

/// Room owned by `landlord` with an accepted request from `roomie`, which
/// leaves an ACTIVE match.
pub async fn seed_match(deps: &ServerDeps, landlord: &Actor, roomie: &Actor) -> (RoomId, MatchId) {
    let room_id = seed_room(deps.store(), landlord).await;
    let request_id = seed_request(deps, roomie, room_id).await;
    requests::respond_to_request(request_id, landlord, ResponseDecision::Accept, None, deps)
        .await
        .expect("accept request");

    let mut tx = deps.store().begin().await.expect("begin");
    let record = tx
        .find_match_for_request(request_id)
        .await
        .expect("find match")
        .expect("match exists");

    (room_id, record.id)
}
