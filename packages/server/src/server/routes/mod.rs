// HTTP routes
pub mod conversations;
pub mod error;
pub mod health;
pub mod matches;
pub mod requests;

pub use conversations::*;
pub use health::*;
pub use matches::*;
pub use requests::*;
