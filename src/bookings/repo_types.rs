use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::sessions::repo_types::Session;

#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub created_at: OffsetDateTime,
}

/// A booking joined with the session it holds a slot in.
#[derive(Debug, Clone, FromRow)]
pub struct BookingWithSession {
    pub booking_id: Uuid,
    pub booked_at: OffsetDateTime,
    #[sqlx(flatten)]
    pub session: Session,
}

#[derive(Debug)]
pub enum BookOutcome {
    Booked(Booking, Session),
    SessionNotFound,
    SessionFull,
    AlreadyBooked,
}

impl BookOutcome {
    /// Why no slot could be claimed. A repeat booking is reported as such even
    /// when the session has since filled up.
    pub fn refused(session_exists: bool, already_booked: bool) -> Self {
        if already_booked {
            BookOutcome::AlreadyBooked
        } else if session_exists {
            BookOutcome::SessionFull
        } else {
            BookOutcome::SessionNotFound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebooking_a_full_session_reports_the_existing_booking() {
        assert!(matches!(BookOutcome::refused(true, true), BookOutcome::AlreadyBooked));
        assert!(matches!(BookOutcome::refused(true, false), BookOutcome::SessionFull));
        assert!(matches!(BookOutcome::refused(false, false), BookOutcome::SessionNotFound));
    }
}
