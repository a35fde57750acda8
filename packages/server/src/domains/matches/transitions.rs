//! Match status transition guard.
//!
//! Two modes, selected at startup:
//!
//! - `Permissive` keeps the historical behaviour: an owner or admin may move a
//!   non-terminal match to any status, including straight to `completed`.
//! - `Strict` only allows the forward path
//!   `active → pending_payment → confirmed → completed`, with `active →
//!   confirmed` as a shortcut and `cancelled` reachable from any non-terminal
//!   status.
//!
//! In both modes a terminal match stays terminal. Re-opening one would let a
//! room hold two open matches.

use serde::{Deserialize, Serialize};

use crate::common::{LifecycleError, LifecycleResult};
use crate::domains::matches::models::MatchStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionGuard {
    #[default]
    Permissive,
    Strict,
}

impl std::str::FromStr for TransitionGuard {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(TransitionGuard::Permissive),
            "strict" => Ok(TransitionGuard::Strict),
            other => Err(anyhow::anyhow!("Invalid match transition mode: {}", other)),
        }
    }
}

impl TransitionGuard {
    /// Returns `true` when the status actually changes, `false` for a
    /// same-status write.
    pub fn check(&self, from: MatchStatus, to: MatchStatus) -> LifecycleResult<bool> {
        if from == to {
            return Ok(false);
        }
        if from.is_terminal() {
            return Err(LifecycleError::invalid_state(format!(
                "match is already {} and cannot move to {}",
                from, to
            )));
        }

        let allowed = match self {
            TransitionGuard::Permissive => true,
            TransitionGuard::Strict => matches!(
                (from, to),
                (MatchStatus::Active, MatchStatus::PendingPayment)
                    | (MatchStatus::Active, MatchStatus::Confirmed)
                    | (MatchStatus::PendingPayment, MatchStatus::Confirmed)
                    | (MatchStatus::Confirmed, MatchStatus::Completed)
                    | (_, MatchStatus::Cancelled)
            ),
        };

        if allowed {
            Ok(true)
        } else {
            Err(LifecycleError::invalid_state(format!(
                "match cannot move from {} to {}",
                from, to
            )))
        }
    }
}
