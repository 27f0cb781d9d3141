use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::sport::Sport;

/// Session record in the database. `price` is read back as `float8`.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub sport: String,
    pub date_time: OffsetDateTime,
    pub location: String,
    pub game_size: String,
    pub price: f64,
    pub total_slots: i32,
    pub booked_slots: i32,
    pub created_at: OffsetDateTime,
}

impl Session {
    pub fn slots_remaining(&self) -> i32 {
        (self.total_slots - self.booked_slots).max(0)
    }

    pub fn has_capacity(&self) -> bool {
        self.booked_slots < self.total_slots
    }
}

/// Column values for a session write; `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct SessionChanges {
    pub sport: Option<Sport>,
    pub date_time: Option<OffsetDateTime>,
    pub location: Option<String>,
    pub game_size: Option<String>,
    pub price: Option<f64>,
    pub total_slots: Option<i32>,
    pub booked_slots: Option<i32>,
}

/// Filters for the session listing.
#[derive(Debug, Default, Clone)]
pub struct SessionFilter {
    pub location: Option<String>,
    pub sports: Option<Vec<String>>,
    pub only_available: bool,
}
