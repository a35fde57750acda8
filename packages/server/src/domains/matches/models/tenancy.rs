use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::common::{MatchId, MemberId, RoomId, RoomRequestId};
use crate::domains::requests::models::RoomRequest;
use crate::domains::rooms::models::Room;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Active,
    PendingPayment,
    Confirmed,
    Completed,
    Cancelled,
}

impl MatchStatus {
    /// Statuses that hold a room. At most one match per room may be in one.
    pub const NON_TERMINAL: [MatchStatus; 3] = [
        MatchStatus::Active,
        MatchStatus::PendingPayment,
        MatchStatus::Confirmed,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Cancelled)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Active => write!(f, "active"),
            MatchStatus::PendingPayment => write!(f, "pending_payment"),
            MatchStatus::Confirmed => write!(f, "confirmed"),
            MatchStatus::Completed => write!(f, "completed"),
            MatchStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A star rating, 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Rating(i16);

impl Rating {
    pub const MIN: i16 = 1;
    pub const MAX: i16 = 5;

    pub fn value(&self) -> i16 {
        self.0
    }
}

impl TryFrom<i16> for Rating {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "rating must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            ))
        }
    }
}

impl From<Rating> for i16 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Which party a rating is about.
///
/// Slots are named after the party being rated: the seeker fills the owner
/// slot, the owner fills the roomie slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatedParty {
    Owner,
    Roomie,
}

/// Match - the tenancy created when a request is accepted
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: MatchId,
    pub room_id: RoomId,
    pub roomie_id: MemberId,
    pub request_id: RoomRequestId,
    pub status: MatchStatus,
    /// Copied from the room at acceptance; later rent changes do not follow.
    pub monthly_rent: Decimal,
    pub move_in_date: Option<NaiveDate>,
    pub move_out_date: Option<NaiveDate>,
    pub deposit_paid: bool,
    pub contract_signed: bool,
    pub contract_url: Option<String>,
    pub owner_rating: Option<i16>,
    pub owner_review: Option<String>,
    pub roomie_rating: Option<i16>,
    pub roomie_review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn from_accepted_request(request: &RoomRequest, room: &Room, now: DateTime<Utc>) -> Self {
        Self {
            id: MatchId::new(),
            room_id: room.id,
            roomie_id: request.requester_id,
            request_id: request.id,
            status: MatchStatus::Active,
            monthly_rent: room.monthly_rent,
            move_in_date: request.move_in_date,
            move_out_date: None,
            deposit_paid: false,
            contract_signed: false,
            contract_url: None,
            owner_rating: None,
            owner_review: None,
            roomie_rating: None,
            roomie_review: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rating_of(&self, party: RatedParty) -> Option<i16> {
        match party {
            RatedParty::Owner => self.owner_rating,
            RatedParty::Roomie => self.roomie_rating,
        }
    }

    /// Fill one rating slot. The caller has already checked it is empty.
    pub fn set_rating(&mut self, party: RatedParty, rating: Rating, review: Option<String>) {
        match party {
            RatedParty::Owner => {
                self.owner_rating = Some(rating.value());
                self.owner_review = review;
            }
            RatedParty::Roomie => {
                self.roomie_rating = Some(rating.value());
                self.roomie_review = review;
            }
        }
    }

    /// Apply the free-form fields of a patch. Status is handled separately.
    pub fn apply_fields(&mut self, patch: &MatchPatch) {
        if let Some(date) = patch.move_in_date {
            self.move_in_date = Some(date);
        }
        if let Some(date) = patch.move_out_date {
            self.move_out_date = Some(date);
        }
        if let Some(paid) = patch.deposit_paid {
            self.deposit_paid = paid;
        }
        if let Some(signed) = patch.contract_signed {
            self.contract_signed = signed;
        }
        if let Some(url) = &patch.contract_url {
            self.contract_url = Some(url.clone());
        }
    }
}

/// Partial update of a match, as sent by the owner or an admin.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TypedBuilder)]
#[serde(default)]
pub struct MatchPatch {
    #[builder(default, setter(strip_option))]
    pub status: Option<MatchStatus>,
    #[builder(default, setter(strip_option))]
    pub move_in_date: Option<NaiveDate>,
    #[builder(default, setter(strip_option))]
    pub move_out_date: Option<NaiveDate>,
    #[builder(default, setter(strip_option))]
    pub deposit_paid: Option<bool>,
    #[builder(default, setter(strip_option))]
    pub contract_signed: Option<bool>,
    #[builder(default, setter(strip_option))]
    pub contract_url: Option<String>,
}
