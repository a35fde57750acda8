use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::common::{MemberId, RoomId, RoomRequestId};

/// How long a request stays answerable.
pub const REQUEST_TTL_DAYS: i64 = 7;

/// Response recorded on rival requests when another one is accepted.
pub const ROOM_RESERVED_MESSAGE: &str = "Room already reserved for another request";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Expired,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Accepted => write!(f, "accepted"),
            RequestStatus::Rejected => write!(f, "rejected"),
            RequestStatus::Cancelled => write!(f, "cancelled"),
            RequestStatus::Expired => write!(f, "expired"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "request_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[default]
    Rental,
    Visit,
}

/// Owner's answer to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseDecision {
    Accept,
    Reject,
}

/// What a seeker proposes when requesting a room.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TypedBuilder)]
#[serde(default)]
pub struct RequestDetails {
    #[builder(default)]
    pub request_type: RequestType,
    #[builder(default, setter(strip_option))]
    pub move_in_date: Option<NaiveDate>,
    #[builder(default, setter(strip_option))]
    pub stay_months: Option<i32>,
    #[builder(default, setter(strip_option))]
    pub message: Option<String>,
}

/// RoomRequest - a seeker's application to occupy a room
///
/// Born pending; once it leaves pending only audit fields change.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoomRequest {
    pub id: RoomRequestId,
    pub room_id: RoomId,
    pub requester_id: MemberId,
    pub request_type: RequestType,
    pub status: RequestStatus,
    pub move_in_date: Option<NaiveDate>,
    pub stay_months: Option<i32>,
    pub message: Option<String>,
    pub response_message: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoomRequest {
    pub fn new(
        room_id: RoomId,
        requester_id: MemberId,
        details: RequestDetails,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RoomRequestId::new(),
            room_id,
            requester_id,
            request_type: details.request_type,
            status: RequestStatus::Pending,
            move_in_date: details.move_in_date,
            stay_months: details.stay_months,
            message: details.message,
            response_message: None,
            responded_at: None,
            expires_at: now + Duration::days(REQUEST_TTL_DAYS),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_pending() && self.expires_at <= now
    }

    /// Move a pending request into a terminal status.
    ///
    /// Callers check `is_pending` first; this only records the outcome.
    pub fn resolve(&mut self, status: RequestStatus, response: Option<String>, now: DateTime<Utc>) {
        debug_assert!(self.is_pending());
        self.status = status;
        if response.is_some() {
            self.response_message = response;
        }
        if matches!(status, RequestStatus::Accepted | RequestStatus::Rejected) {
            self.responded_at = Some(now);
        }
        self.updated_at = now;
    }
}
