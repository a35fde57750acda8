pub mod actions;
pub mod models;

pub use actions::*;
pub use models::*;
