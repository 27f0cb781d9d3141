use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Sports a session can be listed under. Stored and serialized uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Sport {
    Football,
    Basketball,
    Tennis,
    Cricket,
    Rugby,
    Other,
}

impl Sport {
    pub const ALL: [Sport; 6] = [
        Sport::Football,
        Sport::Basketball,
        Sport::Tennis,
        Sport::Cricket,
        Sport::Rugby,
        Sport::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Football => "FOOTBALL",
            Sport::Basketball => "BASKETBALL",
            Sport::Tennis => "TENNIS",
            Sport::Cricket => "CRICKET",
            Sport::Rugby => "RUGBY",
            Sport::Other => "OTHER",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown sport: {0}")]
pub struct UnknownSport(String);

impl FromStr for Sport {
    type Err = UnknownSport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Sport::ALL
            .into_iter()
            .find(|sport| sport.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownSport(wanted.to_string()))
    }
}

impl TryFrom<String> for Sport {
    type Error = UnknownSport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("football".parse::<Sport>().unwrap(), Sport::Football);
        assert_eq!(" Rugby ".parse::<Sport>().unwrap(), Sport::Rugby);
        assert!("curling".parse::<Sport>().is_err());
    }

    #[test]
    fn serde_uses_uppercase_names() {
        assert_eq!(serde_json::to_string(&Sport::Basketball).unwrap(), "\"BASKETBALL\"");
        let s: Sport = serde_json::from_str("\"tennis\"").unwrap();
        assert_eq!(s, Sport::Tennis);
        assert!(serde_json::from_str::<Sport>("\"polo\"").is_err());
    }
}
