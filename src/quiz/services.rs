use std::collections::BTreeSet;

use super::dto::Recommendation;
use crate::{sessions::repo_types::Session, users::favourite_sports::FavouriteSports};

pub const MATCH: f64 = 1.0;
pub const NO_MATCH: f64 = 0.0;

/// What a recommendation run matches against.
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    /// Uppercased sport names.
    pub sports: BTreeSet<String>,
    pub location: Option<String>,
    /// Keep sessions outside the favourite set (scored 0.0) instead of dropping them.
    pub include_other_sports: bool,
}

impl Preferences {
    /// Submitted answers win; the stored profile fills whatever was left blank.
    pub fn resolve(
        submitted_sports: Option<&FavouriteSports>,
        submitted_location: Option<String>,
        profile_sports: &[String],
        profile_location: &str,
        include_other_sports: bool,
    ) -> Self {
        let sports = match submitted_sports.filter(|s| !s.is_empty()) {
            Some(s) => s.match_keys(),
            None => FavouriteSports::from(profile_sports.to_vec()).match_keys(),
        };
        let location = submitted_location.or_else(|| {
            let stored = profile_location.trim();
            (!stored.is_empty()).then(|| stored.to_string())
        });
        Self {
            sports,
            location,
            include_other_sports,
        }
    }

    pub fn score(&self, session: &Session) -> f64 {
        if self.sports.contains(&session.sport.to_uppercase()) {
            MATCH
        } else {
            NO_MATCH
        }
    }

    fn admits(&self, session: &Session) -> bool {
        if !session.has_capacity() {
            return false;
        }
        if let Some(loc) = &self.location {
            if session.location.to_lowercase() != loc.to_lowercase() {
                return false;
            }
        }
        self.include_other_sports || self.sports.is_empty() || self.score(session) == MATCH
    }
}

/// Filters `candidates` by capacity, location and sport, then orders them by
/// match score (descending) and start time (ascending).
pub fn rank(candidates: Vec<Session>, prefs: &Preferences) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = candidates
        .into_iter()
        .filter(|s| prefs.admits(s))
        .map(|s| Recommendation {
            match_score: prefs.score(&s),
            session: s.into(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.match_score
            .total_cmp(&a.match_score)
            .then_with(|| a.session.date_time.cmp(&b.session.date_time))
    });
    ranked
}
