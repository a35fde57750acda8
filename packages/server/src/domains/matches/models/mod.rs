pub mod tenancy;

pub use tenancy::{Match, MatchPatch, MatchStatus, RatedParty, Rating};
