use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Favourite sports as stored on a profile.
///
/// Clients send this field in several shapes: a JSON list, a JSON-encoded
/// list inside a string, or a bare sport name. Deserialization accepts any
/// JSON value and coerces it to a list; shapes that make no sense become an
/// empty list instead of an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FavouriteSports(Vec<String>);

impl FavouriteSports {
    pub fn from_value(value: &Value) -> Self {
        let sports = match value {
            Value::Array(items) => from_items(items),
            Value::String(raw) => from_str(raw),
            _ => Vec::new(),
        };
        Self(sports)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Uppercased set used for matching against session sports.
    pub fn match_keys(&self) -> BTreeSet<String> {
        self.0.iter().map(|s| s.to_uppercase()).collect()
    }
}

impl From<Vec<String>> for FavouriteSports {
    fn from(sports: Vec<String>) -> Self {
        Self(sports.iter().filter_map(|s| clean(s)).collect())
    }
}

impl<'de> Deserialize<'de> for FavouriteSports {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// For `Option<FavouriteSports>` fields where an explicit `null` means "clear"
/// rather than "leave unchanged". Use together with `#[serde(default)]`.
pub fn present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<FavouriteSports>, D::Error> {
    FavouriteSports::deserialize(deserializer).map(Some)
}

fn from_str(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => from_items(&items),
        Ok(Value::String(single)) => clean(&single).into_iter().collect(),
        Ok(_) => Vec::new(),
        Err(_) => clean(raw).into_iter().collect(),
    }
}

fn from_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .filter_map(clean)
        .collect()
}

fn clean(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coerce(v: Value) -> Vec<String> {
        FavouriteSports::from_value(&v).into_inner()
    }

    #[test]
    fn list_is_kept() {
        assert_eq!(coerce(json!(["Football", "Tennis"])), vec!["Football", "Tennis"]);
    }

    #[test]
    fn json_encoded_list_is_parsed() {
        assert_eq!(
            coerce(json!(r#"["Rugby", "Cricket"]"#)),
            vec!["Rugby", "Cricket"]
        );
    }

    #[test]
    fn bare_name_becomes_single_entry() {
        assert_eq!(coerce(json!("Basketball")), vec!["Basketball"]);
        assert_eq!(coerce(json!(r#""Tennis""#)), vec!["Tennis"]);
    }

    #[test]
    fn malformed_input_becomes_empty() {
        assert!(coerce(json!(null)).is_empty());
        assert!(coerce(json!(42)).is_empty());
        assert!(coerce(json!({"sport": "Football"})).is_empty());
        assert!(coerce(json!("   ")).is_empty());
        assert!(coerce(json!("{\"a\": 1}")).is_empty());
    }

    #[test]
    fn non_string_and_blank_items_are_dropped() {
        assert_eq!(coerce(json!(["Football", 3, null, "  ", " Tennis "])), vec!["Football", "Tennis"]);
    }

    #[test]
    fn match_keys_are_uppercase() {
        let fav = FavouriteSports::from(vec!["football".to_string(), "Football".to_string()]);
        let keys: Vec<_> = fav.match_keys().into_iter().collect();
        assert_eq!(keys, vec!["FOOTBALL"]);
    }

    #[test]
    fn deserializes_from_any_shape() {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default, deserialize_with = "present")]
            favourite_sports: Option<FavouriteSports>,
        }

        let body: Body = serde_json::from_str(r#"{"favourite_sports": "Rugby"}"#).unwrap();
        assert_eq!(body.favourite_sports.unwrap().as_slice(), ["Rugby"]);

        let body: Body = serde_json::from_str(r#"{"favourite_sports": null}"#).unwrap();
        assert_eq!(body.favourite_sports, Some(FavouriteSports::default()));

        let body: Body = serde_json::from_str("{}").unwrap();
        assert!(body.favourite_sports.is_none());
    }
}
