pub mod conversations;
pub mod matches;
pub mod requests;
pub mod rooms;
