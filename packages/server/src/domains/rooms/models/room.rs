use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{MemberId, PropertyId, RoomId};

/// Occupancy status of a room.
///
/// Only the availability tracker writes this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "room_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Reserved,
    Occupied,
    Unavailable,
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomStatus::Available => write!(f, "available"),
            RoomStatus::Reserved => write!(f, "reserved"),
            RoomStatus::Occupied => write!(f, "occupied"),
            RoomStatus::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Property - the owning side of one or more rooms
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    pub id: PropertyId,
    pub owner_id: MemberId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Property {
    pub fn new(owner_id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id: PropertyId::new(),
            owner_id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Room - the unit of occupancy
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Room {
    pub id: RoomId,
    pub property_id: PropertyId,
    pub title: String,
    pub status: RoomStatus,
    pub monthly_rent: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// A freshly listed room is available.
    pub fn new(property_id: PropertyId, title: impl Into<String>, monthly_rent: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: RoomId::new(),
            property_id,
            title: title.into(),
            status: RoomStatus::Available,
            monthly_rent,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == RoomStatus::Available
    }
}
