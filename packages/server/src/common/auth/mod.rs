/// Authorization for the occupancy core
///
/// A fluent API over a stateless policy:
///
/// ```ignore
/// use crate::common::auth::{Action, Actor, Resource};
///
/// actor
///     .can(Action::CancelRequest)
///     .check(&Resource::Request { requester_id, owner_id })?;
/// ```
///
/// Actions resolve the resource (and its owner) before calling in, so a
/// missing id surfaces as `NotFound` before the policy ever runs.

mod builder;
mod capability;
mod errors;
mod policy;

pub use builder::{Actor, CapabilityBuilder};
pub use capability::{Action, Role};
pub use errors::AuthError;
pub use policy::{can_act, Decision, Resource};
