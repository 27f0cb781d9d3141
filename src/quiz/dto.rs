use serde::{Deserialize, Deserializer, Serialize};
use time::{macros::format_description, Date};

use super::services::Preferences;
use crate::{
    error::ApiError,
    sessions::dto::{parse_sport_list, SessionResponse},
    users::{
        dto::validate_changes,
        favourite_sports::{self, FavouriteSports},
        repo_types::ProfileChanges,
    },
};

/// Quiz answers as posted by the web client. Blank answers count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    #[serde(alias = "full_name")]
    pub full_name: Option<String>,
    #[serde(alias = "phone_number")]
    pub phone_number: Option<String>,
    #[serde(alias = "date_of_birth", default, deserialize_with = "optional_date")]
    pub date_of_birth: Option<Date>,
    pub location: Option<String>,
    #[serde(
        alias = "favourite_sports",
        default,
        deserialize_with = "favourite_sports::present"
    )]
    pub favourite_sports: Option<FavouriteSports>,
    #[serde(alias = "include_other_sports", default)]
    pub include_other_sports: bool,
}

/// Query string of `GET /quiz-responses/`.
#[derive(Debug, Default, Deserialize)]
pub struct QuizQuery {
    pub location: Option<String>,
    /// Comma-separated sport names.
    pub sports: Option<String>,
    #[serde(default)]
    pub include_other_sports: bool,
}

#[derive(Debug, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub match_score: f64,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub recommendations: Vec<Recommendation>,
}

impl QuizRequest {
    /// Profile fields this submission should overwrite.
    pub fn profile_changes(&self) -> Result<ProfileChanges, ApiError> {
        let (first_name, last_name) = match non_blank(self.full_name.as_deref()) {
            Some(full) => {
                let (first, last) = full.split_once(char::is_whitespace).unwrap_or((full, ""));
                (Some(first.to_string()), Some(last.trim().to_string()))
            }
            None => (None, None),
        };

        let changes = ProfileChanges {
            first_name,
            last_name,
            phone_number: non_blank(self.phone_number.as_deref()).map(str::to_string),
            date_of_birth: self.date_of_birth.map(Some),
            location: self.location(),
            favourite_sports: self
                .favourite_sports
                .as_ref()
                .filter(|f| !f.is_empty())
                .map(|f| f.as_slice().to_vec()),
        };
        validate_changes(&changes)?;
        Ok(changes)
    }

    pub fn location(&self) -> Option<String> {
        non_blank(self.location.as_deref()).map(str::to_string)
    }
}

impl QuizQuery {
    /// Unknown sports are rejected the same way `GET /sessions/` rejects them.
    pub fn preferences(self) -> Result<Preferences, ApiError> {
        let sports = parse_sport_list(self.sports.as_deref().unwrap_or_default())?;
        let location = non_blank(self.location.as_deref()).map(str::to_string);
        Ok(Preferences::resolve(
            Some(&FavouriteSports::from(sports)),
            location,
            &[],
            "",
            self.include_other_sports,
        ))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn optional_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    match non_blank(raw.as_deref()) {
        None => Ok(None),
        Some(s) => Date::parse(s, format_description!("[year]-[month]-[day]"))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::Uri};
    use serde_json::json;

    #[test]
    fn accepts_the_web_client_shape() {
        let req: QuizRequest = serde_json::from_value(json!({
            "fullName": "Alex Morgan Smith",
            "phoneNumber": "07700 900123",
            "gender": "prefer-not-to-say",
            "dateOfBirth": "1998-11-02",
            "location": "Central London",
            "favouriteSports": ["Football", "Tennis"],
            "customSport": ""
        }))
        .unwrap();

        let changes = req.profile_changes().unwrap();
        assert_eq!(changes.first_name.as_deref(), Some("Alex"));
        assert_eq!(changes.last_name.as_deref(), Some("Morgan Smith"));
        assert_eq!(changes.location.as_deref(), Some("Central London"));
        assert_eq!(changes.date_of_birth, Some(Some(time::macros::date!(1998 - 11 - 02))));
        assert_eq!(
            changes.favourite_sports,
            Some(vec!["Football".to_string(), "Tennis".to_string()])
        );
    }

    #[test]
    fn blank_answers_change_nothing() {
        let req: QuizRequest = serde_json::from_value(json!({
            "fullName": "",
            "phoneNumber": "  ",
            "dateOfBirth": "",
            "location": "",
            "favouriteSports": []
        }))
        .unwrap();
        assert!(req.profile_changes().unwrap().is_empty());
        assert_eq!(req.location(), None);
    }

    #[test]
    fn snake_case_and_string_sports_are_accepted() {
        let req: QuizRequest = serde_json::from_value(json!({
            "favourite_sports": "Rugby",
            "include_other_sports": true
        }))
        .unwrap();
        assert!(req.include_other_sports);
        assert_eq!(req.favourite_sports.unwrap().as_slice(), ["Rugby"]);
    }

    #[test]
    fn bad_date_is_rejected() {
        let res = serde_json::from_value::<QuizRequest>(json!({ "dateOfBirth": "02/11/1998" }));
        assert!(res.is_err());
    }

    #[test]
    fn preview_query_skips_empty_sports_and_blank_location() {
        let uri: Uri = "http://localhost/api/quiz-responses/?sports=football,,tennis&location=+"
            .parse()
            .unwrap();
        let Query(query) = Query::<QuizQuery>::try_from_uri(&uri).unwrap();
        let prefs = query.preferences().unwrap();
        assert_eq!(prefs.sports.iter().collect::<Vec<_>>(), ["FOOTBALL", "TENNIS"]);
        assert_eq!(prefs.location, None);
        assert!(!prefs.include_other_sports);
    }

    #[test]
    fn preview_query_rejects_unknown_sport() {
        let query = QuizQuery {
            sports: Some("tennis,quidditch".into()),
            ..Default::default()
        };
        let err = query.preferences().unwrap_err();
        assert_eq!(err.to_string(), "unknown sport: quidditch");
    }

    #[test]
    fn single_word_name_leaves_last_name_empty() {
        let req = QuizRequest {
            full_name: Some("Pelé".into()),
            ..Default::default()
        };
        let changes = req.profile_changes().unwrap();
        assert_eq!(changes.first_name.as_deref(), Some("Pelé"));
        assert_eq!(changes.last_name.as_deref(), Some(""));
    }
}
