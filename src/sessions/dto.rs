use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    repo_types::{Session, SessionChanges, SessionFilter},
    sport::Sport,
};
use crate::error::ApiError;

const MAX_LOCATION_LEN: usize = 100;
const MAX_GAME_SIZE_LEN: usize = 20;
const MAX_PRICE: f64 = 999_999.99;

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub sport: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    pub location: String,
    pub game_size: String,
    pub price: f64,
    pub total_slots: i32,
    pub booked_slots: i32,
    pub slots_remaining: i32,
}

impl From<Session> for SessionResponse {
    fn from(s: Session) -> Self {
        let slots_remaining = s.slots_remaining();
        Self {
            id: s.id,
            sport: s.sport,
            date_time: s.date_time,
            location: s.location,
            game_size: s.game_size,
            price: s.price,
            total_slots: s.total_slots,
            booked_slots: s.booked_slots,
            slots_remaining,
        }
    }
}

/// Body of `POST /sessions/` and `PUT /sessions/:id/`.
#[derive(Debug, Deserialize)]
pub struct SessionPayload {
    pub sport: Sport,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    pub location: String,
    pub game_size: String,
    pub price: f64,
    pub total_slots: i32,
    pub booked_slots: Option<i32>,
}

/// Body of `PATCH /sessions/:id/`.
#[derive(Debug, Default, Deserialize)]
pub struct SessionPatch {
    pub sport: Option<Sport>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date_time: Option<OffsetDateTime>,
    pub location: Option<String>,
    pub game_size: Option<String>,
    pub price: Option<f64>,
    pub total_slots: Option<i32>,
    pub booked_slots: Option<i32>,
}

impl From<SessionPayload> for SessionChanges {
    fn from(p: SessionPayload) -> Self {
        Self {
            sport: Some(p.sport),
            date_time: Some(p.date_time),
            location: Some(p.location),
            game_size: Some(p.game_size),
            price: Some(p.price),
            total_slots: Some(p.total_slots),
            booked_slots: p.booked_slots,
        }
    }
}

impl From<SessionPatch> for SessionChanges {
    fn from(p: SessionPatch) -> Self {
        Self {
            sport: p.sport,
            date_time: p.date_time,
            location: p.location,
            game_size: p.game_size,
            price: p.price,
            total_slots: p.total_slots,
            booked_slots: p.booked_slots,
        }
    }
}

impl SessionChanges {
    /// Trims text fields and checks every supplied value.
    pub fn validated(mut self) -> Result<Self, ApiError> {
        self.location = self.location.map(|s| s.trim().to_string());
        self.game_size = self.game_size.map(|s| s.trim().to_string());

        check_text("location", self.location.as_deref(), MAX_LOCATION_LEN)?;
        check_text("game_size", self.game_size.as_deref(), MAX_GAME_SIZE_LEN)?;

        if let Some(price) = self.price {
            if !price.is_finite() || !(0.0..=MAX_PRICE).contains(&price) {
                return Err(ApiError::bad_request("price must be between 0 and 999999.99"));
            }
        }
        if matches!(self.total_slots, Some(n) if n <= 0) {
            return Err(ApiError::bad_request("total_slots must be positive"));
        }
        if matches!(self.booked_slots, Some(n) if n < 0) {
            return Err(ApiError::bad_request("booked_slots cannot be negative"));
        }
        if let (Some(total), Some(booked)) = (self.total_slots, self.booked_slots) {
            if booked > total {
                return Err(ApiError::bad_request(
                    "booked_slots cannot exceed total_slots",
                ));
            }
        }
        Ok(self)
    }
}

fn check_text(field: &str, value: Option<&str>, max: usize) -> Result<(), ApiError> {
    match value {
        Some("") => Err(ApiError::bad_request(format!("{field} may not be blank"))),
        Some(v) if v.chars().count() > max => Err(ApiError::bad_request(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

/// Query string of `GET /sessions/`.
#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    pub location: Option<String>,
    /// Comma-separated sport names.
    pub sports: Option<String>,
    #[serde(default)]
    pub available: bool,
}

impl SessionQuery {
    pub fn into_filter(self) -> Result<SessionFilter, ApiError> {
        let location = self
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        let sports = match self.sports.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(list) => Some(parse_sport_list(list)?),
        };

        Ok(SessionFilter {
            location,
            sports,
            only_available: self.available,
        })
    }
}

/// Parses a comma-separated sport list into canonical names, skipping empty
/// entries. An unknown sport is a 400.
pub fn parse_sport_list(list: &str) -> Result<Vec<String>, ApiError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Sport>()
                .map(|sport| sport.as_str().to_string())
                .map_err(|e| ApiError::bad_request(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn session(total: i32, booked: i32) -> Session {
        Session {
            id: Uuid::new_v4(),
            sport: "FOOTBALL".into(),
            date_time: datetime!(2025-06-01 18:30 UTC),
            location: "North London".into(),
            game_size: "5-a-side".into(),
            price: 7.5,
            total_slots: total,
            booked_slots: booked,
            created_at: datetime!(2025-05-01 09:00 UTC),
        }
    }

    #[test]
    fn response_derives_slots_remaining() {
        let json = serde_json::to_value(SessionResponse::from(session(10, 4))).unwrap();
        assert_eq!(json["slots_remaining"], 6);
        assert_eq!(json["date_time"], "2025-06-01T18:30:00Z");
        assert_eq!(json["sport"], "FOOTBALL");
    }

    #[test]
    fn slots_remaining_never_negative() {
        assert_eq!(session(5, 7).slots_remaining(), 0);
        assert!(!session(5, 5).has_capacity());
    }

    #[test]
    fn payload_parses_and_validates() {
        let payload: SessionPayload = serde_json::from_value(serde_json::json!({
            "sport": "tennis",
            "date_time": "2025-07-01T10:00:00+01:00",
            "location": " West London ",
            "game_size": "Doubles",
            "price": 12.0,
            "total_slots": 4
        }))
        .unwrap();
        let changes = SessionChanges::from(payload).validated().unwrap();
        assert_eq!(changes.sport, Some(Sport::Tennis));
        assert_eq!(changes.location.as_deref(), Some("West London"));
        assert_eq!(changes.booked_slots, None);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let over = SessionChanges {
            total_slots: Some(4),
            booked_slots: Some(5),
            ..Default::default()
        };
        assert!(over.validated().is_err());

        let negative_price = SessionChanges {
            price: Some(-1.0),
            ..Default::default()
        };
        assert!(negative_price.validated().is_err());

        let blank = SessionChanges {
            location: Some("   ".into()),
            ..Default::default()
        };
        assert!(blank.validated().unwrap_err().to_string().contains("blank"));

        let zero = SessionChanges {
            total_slots: Some(0),
            ..Default::default()
        };
        assert!(zero.validated().is_err());
    }

    #[test]
    fn query_normalizes_sports() {
        let q = SessionQuery {
            location: Some("  ".into()),
            sports: Some("football, Rugby,,".into()),
            available: true,
        };
        let f = q.into_filter().unwrap();
        assert_eq!(f.location, None);
        assert_eq!(f.sports, Some(vec!["FOOTBALL".to_string(), "RUGBY".to_string()]));
        assert!(f.only_available);
    }

    #[test]
    fn query_rejects_unknown_sport() {
        let q = SessionQuery {
            sports: Some("Quidditch".into()),
            ..Default::default()
        };
        assert!(q.into_filter().is_err());
    }
}
