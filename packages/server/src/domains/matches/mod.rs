pub mod actions;
pub mod models;
pub mod transitions;

pub use actions::*;
pub use models::*;
pub use transitions::TransitionGuard;
