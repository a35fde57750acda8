use serde::{Deserialize, Serialize};

/// Role of the acting principal, resolved by the identity context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Lists rooms through the properties they own.
    Owner,
    /// Requests rooms; becomes the roomie of a match.
    Seeker,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Seeker => write!(f, "seeker"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "owner" => Ok(Role::Owner),
            "seeker" => Ok(Role::Seeker),
            "admin" => Ok(Role::Admin),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}

/// Things an actor may attempt against a request, match or conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewRequest,
    RespondToRequest,
    CancelRequest,
    ViewMatch,
    UpdateMatch,
    RateMatch,
    ViewConversation,
}

impl Action {
    /// Whether an admin may perform this action without a relationship.
    pub fn admin_bypass(&self) -> bool {
        matches!(
            self,
            Action::ViewRequest | Action::ViewMatch | Action::UpdateMatch | Action::ViewConversation
        )
    }
}
