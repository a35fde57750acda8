use super::policy::{can_act, Decision, Resource};
use super::{Action, AuthError, Role};
use crate::common::entity_ids::MemberId;

/// Entry point for authorization checks
///
/// Usage:
/// ```ignore
/// actor
///     .can(Action::RespondToRequest)
///     .on(&resource)
///     .check()?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub member_id: MemberId,
    pub role: Role,
}

impl Actor {
    /// The role was resolved by the identity context; it is trusted here.
    pub fn new(member_id: MemberId, role: Role) -> Self {
        Self { member_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Specify what the actor wants to do
    pub fn can(&self, action: Action) -> CapabilityBuilder {
        CapabilityBuilder {
            actor: *self,
            action,
        }
    }
}

/// Builder after specifying the action
pub struct CapabilityBuilder {
    actor: Actor,
    action: Action,
}

impl CapabilityBuilder {
    /// Evaluate the policy against a resolved resource
    pub fn on(self, resource: &Resource) -> Decision {
        can_act(self.actor.member_id, self.actor.role, self.action, resource)
    }

    /// Shorthand for `.on(resource).check()`
    pub fn check(self, resource: &Resource) -> Result<(), AuthError> {
        self.on(resource).check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_check_passes() {
        let owner = MemberId::new();
        let resource = Resource::Match {
            roomie_id: MemberId::new(),
            owner_id: owner,
        };

        let result = Actor::new(owner, Role::Owner)
            .can(Action::UpdateMatch)
            .check(&resource);

        assert!(result.is_ok());
    }

    #[test]
    fn test_stranger_rejected() {
        let resource = Resource::Request {
            requester_id: MemberId::new(),
            owner_id: MemberId::new(),
        };

        let result = Actor::new(MemberId::new(), Role::Seeker)
            .can(Action::ViewRequest)
            .check(&resource);

        assert!(matches!(result, Err(AuthError::PermissionDenied(_))));
    }
}
