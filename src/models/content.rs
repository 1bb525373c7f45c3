//! Show, movie and episode models.

use crate::core::store::Entity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Watch status of a show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShowWatchStatus {
    NotWatched,
    Watching,
    Watched,
}

impl std::fmt::Display for ShowWatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShowWatchStatus::NotWatched => write!(f, "Not Watched"),
            ShowWatchStatus::Watching => write!(f, "Watching"),
            ShowWatchStatus::Watched => write!(f, "Watched"),
        }
    }
}

impl FromStr for ShowWatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_status(s).as_str() {
            "not_watched" => Ok(ShowWatchStatus::NotWatched),
            "watching" => Ok(ShowWatchStatus::Watching),
            "watched" => Ok(ShowWatchStatus::Watched),
            _ => Err(format!(
                "unknown show status '{}' (expected not-watched, watching or watched)",
                s
            )),
        }
    }
}

/// Watch status of a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovieWatchStatus {
    NotWatched,
    Watched,
}

impl std::fmt::Display for MovieWatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieWatchStatus::NotWatched => write!(f, "Not Watched"),
            MovieWatchStatus::Watched => write!(f, "Watched"),
        }
    }
}

impl FromStr for MovieWatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_status(s).as_str() {
            "not_watched" => Ok(MovieWatchStatus::NotWatched),
            "watched" => Ok(MovieWatchStatus::Watched),
            _ => Err(format!(
                "unknown movie status '{}' (expected not-watched or watched)",
                s
            )),
        }
    }
}

/// Accepts `NOT_WATCHED`, `not-watched` and `Not Watched` alike.
fn normalize_status(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', ' '], "_")
}

/// A show favorited by the active profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    /// Stable content id.
    pub show_id: u64,
    /// TMDB ID.
    pub tmdb_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// First air date.
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub streaming_service: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub user_rating: Option<f32>,
    #[serde(default)]
    pub tv_parental_guidelines: Option<String>,
    #[serde(default)]
    pub season_count: Option<u32>,
    #[serde(default)]
    pub episode_count: Option<u32>,
    pub watch_status: ShowWatchStatus,
    /// Profile this favorite belongs to.
    pub profile_id: String,
}

/// A movie favorited by the active profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Stable content id.
    pub movie_id: u64,
    /// TMDB ID.
    pub tmdb_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub user_rating: Option<f32>,
    #[serde(default)]
    pub mpa_rating: Option<String>,
    #[serde(default)]
    pub streaming_service: String,
    pub watch_status: MovieWatchStatus,
    /// Profile this favorite belongs to.
    pub profile_id: String,
}

/// An episode of a cached show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub episode_id: u64,
    /// Owning show.
    pub show_id: u64,
    #[serde(default)]
    pub show_title: String,
    pub season_number: u32,
    pub episode_number: u32,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub air_date: Option<NaiveDate>,
    #[serde(default)]
    pub watched: bool,
}

impl Episode {
    /// Short `S01E02` style label.
    pub fn code(&self) -> String {
        format!("S{:02}E{:02}", self.season_number, self.episode_number)
    }
}

impl Entity for Show {
    type Id = u64;

    fn id(&self) -> u64 {
        self.show_id
    }
}

impl Entity for Movie {
    type Id = u64;

    fn id(&self) -> u64 {
        self.movie_id
    }
}

impl Entity for Episode {
    type Id = u64;

    fn id(&self) -> u64 {
        self.episode_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ShowWatchStatus::NotWatched).unwrap();
        assert_eq!(json, "\"NOT_WATCHED\"");
        let status: MovieWatchStatus = serde_json::from_str("\"WATCHED\"").unwrap();
        assert_eq!(status, MovieWatchStatus::Watched);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("watching".parse::<ShowWatchStatus>().unwrap(), ShowWatchStatus::Watching);
        assert_eq!("Not Watched".parse::<ShowWatchStatus>().unwrap(), ShowWatchStatus::NotWatched);
        assert_eq!("NOT_WATCHED".parse::<MovieWatchStatus>().unwrap(), MovieWatchStatus::NotWatched);
        assert!("watching".parse::<MovieWatchStatus>().is_err());
    }

    #[test]
    fn test_episode_code() {
        let episode = Episode {
            episode_id: 1,
            show_id: 2,
            show_title: "Severance".to_string(),
            season_number: 2,
            episode_number: 5,
            title: "Trojan's Horse".to_string(),
            overview: String::new(),
            air_date: None,
            watched: false,
        };
        assert_eq!(episode.code(), "S02E05");
    }

    #[test]
    fn test_release_date_parses_iso() {
        let json = r#"{"movie_id":1,"tmdb_id":2,"title":"Dune","release_date":"2024-03-01","watch_status":"NOT_WATCHED","profile_id":"9"}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.release_date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }
}
