pub mod conversation;

pub use conversation::{Conversation, ConversationSummary, Message, MessageCounts};
