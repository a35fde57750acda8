pub mod models;
pub mod tracker;

pub use models::*;
