pub mod room;

pub use room::{Property, Room, RoomStatus};
