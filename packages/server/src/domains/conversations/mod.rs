pub mod actions;
pub mod gateway;
pub mod models;

pub use actions::{conversation_for_match, conversation_summary, touch_conversation};
pub use models::*;
