//! Profile model.

use crate::core::store::Entity;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A viewing profile belonging to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Server-assigned identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Image URL, if one was uploaded.
    #[serde(default)]
    pub image: Option<String>,
    /// Server-owned summary counts.
    #[serde(default)]
    pub counts: ProfileCounts,
}

/// Denormalized counts maintained by the server.
///
/// The client never recomputes these; the derived views in
/// [`crate::core::views`] fold over cached content instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCounts {
    #[serde(default)]
    pub shows_to_watch: u32,
    #[serde(default)]
    pub shows_watching: u32,
    #[serde(default)]
    pub shows_watched: u32,
    #[serde(default)]
    pub movies_to_watch: u32,
    #[serde(default)]
    pub movies_watched: u32,
}

impl Entity for Profile {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }

    /// Case-insensitive name order, ties broken by id.
    fn compare(a: &Self, b: &Self) -> Ordering {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_default_when_missing() {
        let profile: Profile = serde_json::from_str(r#"{"id":"7","name":"Kids"}"#).unwrap();
        assert_eq!(profile.counts, ProfileCounts::default());
        assert!(profile.image.is_none());
    }

    #[test]
    fn test_counts_use_camel_case() {
        let json = r#"{"id":"1","name":"Me","counts":{"showsWatching":3,"moviesWatched":2}}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.counts.shows_watching, 3);
        assert_eq!(profile.counts.movies_watched, 2);
    }

    #[test]
    fn test_compare_ignores_case() {
        let a = Profile { id: "2".into(), name: "alice".into(), image: None, counts: Default::default() };
        let b = Profile { id: "1".into(), name: "Bob".into(), image: None, counts: Default::default() };
        assert_eq!(Profile::compare(&a, &b), Ordering::Less);
    }
}
