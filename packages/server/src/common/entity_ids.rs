//! Typed ID definitions for every entity the occupancy core touches.

pub use super::id::Id;

/// Marker type for members (owners, seekers and admins share one table).
pub struct Member;

/// Marker type for properties (the owning side of a room).
pub struct Property;

/// Marker type for rentable rooms.
pub struct Room;

/// Marker type for a seeker's application to a room.
pub struct RoomRequest;

/// Marker type for a confirmed tenancy arrangement.
pub struct Match;

/// Marker type for the conversation bound to a match.
pub struct Conversation;

/// Marker type for messages (owned by the messaging subsystem).
pub struct Message;

pub type MemberId = Id<Member>;
pub type PropertyId = Id<Property>;
pub type RoomId = Id<Room>;
pub type RoomRequestId = Id<RoomRequest>;
pub type MatchId = Id<Match>;
pub type ConversationId = Id<Conversation>;
pub type MessageId = Id<Message>;
