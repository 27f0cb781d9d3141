use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Booking, BookingWithSession};
use crate::sessions::{dto::SessionResponse, repo_types::Session};

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(alias = "session")]
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub session: SessionResponse,
}

impl From<BookingWithSession> for BookingResponse {
    fn from(row: BookingWithSession) -> Self {
        Self {
            id: row.booking_id,
            created_at: row.booked_at,
            session: row.session.into(),
        }
    }
}

impl From<(Booking, Session)> for BookingResponse {
    fn from((booking, session): (Booking, Session)) -> Self {
        Self {
            id: booking.id,
            created_at: booking.created_at,
            session: session.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accepts_session_alias() {
        let id = Uuid::new_v4();
        let req: CreateBookingRequest =
            serde_json::from_value(serde_json::json!({ "session": id })).unwrap();
        assert_eq!(req.session_id, id);
    }

    #[test]
    fn response_nests_session_with_remaining_slots() {
        let session_id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            session_id,
            created_at: now,
        };
        let session = Session {
            id: session_id,
            sport: "CRICKET".into(),
            date_time: now,
            location: "East London".into(),
            game_size: "11-a-side".into(),
            price: 5.0,
            total_slots: 22,
            booked_slots: 21,
            created_at: now,
        };
        let json = serde_json::to_value(BookingResponse::from((booking, session))).unwrap();
        assert_eq!(json["session"]["id"], session_id.to_string());
        assert_eq!(json["session"]["slots_remaining"], 1);
    }
}
