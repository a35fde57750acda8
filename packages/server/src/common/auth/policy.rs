//! The access policy: a pure decision over (actor, action, resource).
//!
//! Relationships are passed in already resolved. The room owner is looked up
//! once through Room→Property→owner by the caller and carried on the
//! [`Resource`], so nothing in here touches storage.

use super::{Action, AuthError, Role};
use crate::common::MemberId;

/// The relationship facts a decision needs about the target entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Request {
        requester_id: MemberId,
        owner_id: MemberId,
    },
    Match {
        roomie_id: MemberId,
        owner_id: MemberId,
    },
    Conversation {
        roomie_id: MemberId,
        owner_id: MemberId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn check(self) -> Result<(), AuthError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(AuthError::PermissionDenied(reason)),
        }
    }

    fn allow_if(condition: bool, reason: &str) -> Self {
        if condition {
            Decision::Allow
        } else {
            Decision::Deny(reason.to_string())
        }
    }
}

pub fn can_act(actor_id: MemberId, role: Role, action: Action, resource: &Resource) -> Decision {
    if role == Role::Admin && action.admin_bypass() {
        return Decision::Allow;
    }

    match (action, *resource) {
        (Action::ViewRequest, Resource::Request { requester_id, owner_id }) => Decision::allow_if(
            actor_id == requester_id || actor_id == owner_id,
            "not a party to this request",
        ),
        (Action::RespondToRequest, Resource::Request { owner_id, .. }) => Decision::allow_if(
            actor_id == owner_id,
            "only the room owner may respond to this request",
        ),
        (Action::CancelRequest, Resource::Request { requester_id, .. }) => Decision::allow_if(
            actor_id == requester_id,
            "only the requester may cancel this request",
        ),
        (Action::ViewMatch, Resource::Match { roomie_id, owner_id }) => Decision::allow_if(
            actor_id == roomie_id || actor_id == owner_id,
            "not a party to this match",
        ),
        (Action::UpdateMatch, Resource::Match { owner_id, .. }) => Decision::allow_if(
            actor_id == owner_id,
            "only the room owner or an admin may update this match",
        ),
        (Action::RateMatch, Resource::Match { roomie_id, owner_id }) => match role {
            Role::Owner => Decision::allow_if(actor_id == owner_id, "not the owner of this match"),
            Role::Seeker => {
                Decision::allow_if(actor_id == roomie_id, "not the roomie of this match")
            }
            Role::Admin => Decision::Deny("ratings are restricted to match participants".into()),
        },
        (Action::ViewConversation, Resource::Conversation { roomie_id, owner_id }) => {
            Decision::allow_if(
                actor_id == roomie_id || actor_id == owner_id,
                "not a participant in this conversation",
            )
        }
        (action, _) => Decision::Deny(format!("{:?} does not apply to this resource", action)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(requester_id: MemberId, owner_id: MemberId) -> Resource {
        Resource::Request { requester_id, owner_id }
    }

    fn matched(roomie_id: MemberId, owner_id: MemberId) -> Resource {
        Resource::Match { roomie_id, owner_id }
    }

    #[test]
    fn test_only_owner_may_respond() {
        let (seeker, owner) = (MemberId::new(), MemberId::new());
        let res = request(seeker, owner);

        assert!(can_act(owner, Role::Owner, Action::RespondToRequest, &res).is_allowed());
        assert!(!can_act(seeker, Role::Seeker, Action::RespondToRequest, &res).is_allowed());
    }

    #[test]
    fn test_admin_cannot_respond_without_ownership() {
        let res = request(MemberId::new(), MemberId::new());
        let decision = can_act(MemberId::new(), Role::Admin, Action::RespondToRequest, &res);
        assert!(!decision.is_allowed());
    }

    #[test]
    fn test_only_requester_may_cancel() {
        let (seeker, owner) = (MemberId::new(), MemberId::new());
        let res = request(seeker, owner);

        assert!(can_act(seeker, Role::Seeker, Action::CancelRequest, &res).is_allowed());
        assert!(!can_act(owner, Role::Owner, Action::CancelRequest, &res).is_allowed());
    }

    #[test]
    fn test_admin_may_update_and_view_any_match() {
        let res = matched(MemberId::new(), MemberId::new());
        let admin = MemberId::new();

        assert!(can_act(admin, Role::Admin, Action::UpdateMatch, &res).is_allowed());
        assert!(can_act(admin, Role::Admin, Action::ViewMatch, &res).is_allowed());
    }

    #[test]
    fn test_roomie_cannot_update_match() {
        let (roomie, owner) = (MemberId::new(), MemberId::new());
        let decision = can_act(roomie, Role::Seeker, Action::UpdateMatch, &matched(roomie, owner));
        assert!(matches!(decision, Decision::Deny(_)));
    }

    #[test]
    fn test_rating_follows_role_side() {
        let (roomie, owner) = (MemberId::new(), MemberId::new());
        let res = matched(roomie, owner);

        assert!(can_act(owner, Role::Owner, Action::RateMatch, &res).is_allowed());
        assert!(can_act(roomie, Role::Seeker, Action::RateMatch, &res).is_allowed());
        // Right person, wrong side.
        assert!(!can_act(roomie, Role::Owner, Action::RateMatch, &res).is_allowed());
    }

    #[test]
    fn test_admin_never_rates() {
        let res = matched(MemberId::new(), MemberId::new());
        let decision = can_act(MemberId::new(), Role::Admin, Action::RateMatch, &res);
        assert!(!decision.is_allowed());
    }

    #[test]
    fn test_mismatched_resource_is_denied() {
        let (roomie, owner) = (MemberId::new(), MemberId::new());
        let decision = can_act(owner, Role::Owner, Action::RespondToRequest, &matched(roomie, owner));
        assert!(!decision.is_allowed());
    }

    #[test]
    fn test_deny_converts_to_permission_denied() {
        let err = Decision::Deny("nope".into()).check().unwrap_err();
        assert!(matches!(err, AuthError::PermissionDenied(reason) if reason == "nope"));
    }
}
