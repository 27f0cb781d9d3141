use serde::{Deserialize, Deserializer, Serialize};
use time::Date;
use uuid::Uuid;

use super::{
    favourite_sports::{self, FavouriteSports},
    repo_types::{ProfileChanges, User},
};
use crate::error::ApiError;

pub const MAX_PHONE_LEN: usize = 15;
pub const MAX_LOCATION_LEN: usize = 50;
pub const MAX_NAME_LEN: usize = 150;

/// Public profile returned to the client.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub date_of_birth: Option<Date>,
    pub location: String,
    pub favourite_sports: Vec<String>,
    pub is_staff: bool,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            phone_number: u.phone_number,
            date_of_birth: u.date_of_birth,
            location: u.location,
            favourite_sports: u.favourite_sports.0,
            is_staff: u.is_staff,
        }
    }
}

/// PATCH body for `/auth/user/`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    /// `null` clears the stored date; leaving the field out keeps it.
    #[serde(default, deserialize_with = "nullable")]
    pub date_of_birth: Option<Option<Date>>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "favourite_sports::present")]
    pub favourite_sports: Option<FavouriteSports>,
}

impl UpdateProfileRequest {
    pub fn into_changes(self) -> Result<ProfileChanges, ApiError> {
        let changes = ProfileChanges {
            first_name: self.first_name.map(|s| s.trim().to_string()),
            last_name: self.last_name.map(|s| s.trim().to_string()),
            phone_number: self.phone_number.map(|s| s.trim().to_string()),
            date_of_birth: self.date_of_birth,
            location: self.location.map(|s| s.trim().to_string()),
            favourite_sports: self.favourite_sports.map(FavouriteSports::into_inner),
        };
        validate_changes(&changes)?;
        Ok(changes)
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn validate_changes(changes: &ProfileChanges) -> Result<(), ApiError> {
    check_len("first_name", changes.first_name.as_deref(), MAX_NAME_LEN)?;
    check_len("last_name", changes.last_name.as_deref(), MAX_NAME_LEN)?;
    check_len("phone_number", changes.phone_number.as_deref(), MAX_PHONE_LEN)?;
    check_len("location", changes.location.as_deref(), MAX_LOCATION_LEN)?;
    Ok(())
}

pub(crate) fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), ApiError> {
    match value {
        Some(v) if v.chars().count() > max => Err(ApiError::bad_request(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "sam".into(),
            email: "sam@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            first_name: "Sam".into(),
            last_name: "Jones".into(),
            phone_number: "07700900000".into(),
            date_of_birth: Some(time::macros::date!(1994 - 03 - 12)),
            location: "North London".into(),
            favourite_sports: sqlx::types::Json(vec!["Football".into()]),
            is_staff: false,
            is_superuser: false,
            is_active: true,
            created_at: time::OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_value(UserProfile::from(user)).unwrap();
        assert_eq!(json["email"], "sam@example.com");
        assert_eq!(json["date_of_birth"], "1994-03-12");
        assert_eq!(json["favourite_sports"][0], "Football");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn update_request_coerces_and_trims() {
        let req: UpdateProfileRequest = serde_json::from_str(
            r#"{"location": " South London ", "favourite_sports": "[\"Tennis\"]"}"#,
        )
        .unwrap();
        let changes = req.into_changes().unwrap();
        assert_eq!(changes.location.as_deref(), Some("South London"));
        assert_eq!(changes.favourite_sports, Some(vec!["Tennis".to_string()]));
        assert!(changes.phone_number.is_none());
    }

    #[test]
    fn update_request_rejects_long_phone_number() {
        let req = UpdateProfileRequest {
            phone_number: Some("+44 7700 900 000 123".into()),
            ..Default::default()
        };
        let err = req.into_changes().unwrap_err();
        assert!(err.to_string().contains("phone_number"));
    }

    #[test]
    fn date_of_birth_parses_iso_dates() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"date_of_birth": "2001-09-30"}"#).unwrap();
        assert_eq!(req.date_of_birth, Some(Some(time::macros::date!(2001 - 09 - 30))));
    }

    #[test]
    fn null_date_of_birth_clears_and_absent_keeps() {
        let cleared: UpdateProfileRequest =
            serde_json::from_str(r#"{"date_of_birth": null}"#).unwrap();
        let changes = cleared.into_changes().unwrap();
        assert_eq!(changes.date_of_birth, Some(None));
        assert!(!changes.is_empty());

        let untouched: UpdateProfileRequest =
            serde_json::from_str(r#"{"location": "Leeds"}"#).unwrap();
        assert_eq!(untouched.into_changes().unwrap().date_of_birth, None);
    }
}
