use lazy_static::lazy_static;
use regex::Regex;

use super::{dto::RegisterRequest, password};
use crate::{
    error::ApiError,
    users::dto::{check_len, MAX_LOCATION_LEN, MAX_NAME_LEN, MAX_PHONE_LEN},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trims and checks a registration payload in place.
pub(crate) fn validate_registration(req: &mut RegisterRequest) -> Result<(), ApiError> {
    req.username = req.username.trim().to_string();
    req.email = normalize_email(&req.email);
    req.first_name = req.first_name.trim().to_string();
    req.last_name = req.last_name.trim().to_string();
    req.phone_number = req.phone_number.trim().to_string();
    req.location = req.location.trim().to_string();

    if req.username.is_empty() {
        return Err(ApiError::bad_request("Username is required"));
    }
    check_len("username", Some(&req.username), MAX_NAME_LEN)?;
    if !is_valid_email(&req.email) {
        return Err(ApiError::bad_request("Invalid email"));
    }
    if !password::is_strong_enough(&req.password) {
        return Err(ApiError::bad_request("Password too short"));
    }
    check_len("first_name", Some(&req.first_name), MAX_NAME_LEN)?;
    check_len("last_name", Some(&req.last_name), MAX_NAME_LEN)?;
    check_len("phone_number", Some(&req.phone_number), MAX_PHONE_LEN)?;
    check_len("location", Some(&req.location), MAX_LOCATION_LEN)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: serde_json::Value) -> RegisterRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("player@arena.co.uk"));
        assert!(!is_valid_email("player@arena"));
        assert!(!is_valid_email("pla yer@arena.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn registration_is_normalized() {
        let mut req = request(serde_json::json!({
            "username": "  kim ",
            "email": " Kim@Example.COM ",
            "password": "longenough",
            "favourite_sports": "[\"Cricket\"]"
        }));
        validate_registration(&mut req).unwrap();
        assert_eq!(req.username, "kim");
        assert_eq!(req.email, "kim@example.com");
        assert_eq!(req.favourite_sports.as_slice(), ["Cricket"]);
    }

    #[test]
    fn registration_rejects_bad_input() {
        let cases = [
            (serde_json::json!({"username": "", "email": "a@b.cd", "password": "longenough"}), "Username"),
            (serde_json::json!({"username": "a", "email": "nope", "password": "longenough"}), "Invalid email"),
            (serde_json::json!({"username": "a", "email": "a@b.cd", "password": "short"}), "Password"),
            (
                serde_json::json!({"username": "a", "email": "a@b.cd", "password": "longenough",
                                   "location": "x".repeat(51)}),
                "location",
            ),
        ];
        for (body, needle) in cases {
            let mut req = request(body);
            let err = validate_registration(&mut req).unwrap_err();
            assert!(err.to_string().contains(needle), "{err} should mention {needle}");
        }
    }
}
