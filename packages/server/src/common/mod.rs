// Common types and utilities shared across the occupancy core

pub mod auth;
pub mod entity_ids;
pub mod error;
pub mod id;

pub use auth::{Action, Actor, AuthError, Decision, Resource, Role};
pub use entity_ids::*;
pub use error::{ErrorKind, LifecycleError, LifecycleResult};
pub use id::Id;
