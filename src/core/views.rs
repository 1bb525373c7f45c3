//! Derived views over the entity store.
//!
//! Everything here is a pure function of the current store and a reference
//! date. Nothing is cached, so a view can never disagree with the records it
//! was computed from.

use super::store::EntityStore;
use crate::models::{Episode, Movie, MovieWatchStatus, Show, ShowWatchStatus};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// `date` lies in `[today - days, today]`. A window reaching past the
/// calendar range covers every earlier date.
pub fn is_recent(date: NaiveDate, today: NaiveDate, days: u32) -> bool {
    let start = today
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    date <= today && date >= start
}

/// `date` lies in `[today, today + days]`. A window reaching past the
/// calendar range covers every later date.
pub fn is_upcoming(date: NaiveDate, today: NaiveDate, days: u32) -> bool {
    let end = today
        .checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MAX);
    date >= today && date <= end
}

/// Release or air date still in the future. Unknown dates count as aired.
pub fn is_unaired(date: Option<NaiveDate>, today: NaiveDate) -> bool {
    matches!(date, Some(d) if d > today)
}

/// Episodes aired within the trailing window, newest first.
pub fn recent_episodes(store: &EntityStore, today: NaiveDate, days: u32) -> Vec<&Episode> {
    let mut episodes: Vec<&Episode> = store
        .episodes
        .all()
        .into_iter()
        .filter(|e| e.air_date.is_some_and(|d| is_recent(d, today, days)))
        .collect();
    episodes.sort_by(|a, b| b.air_date.cmp(&a.air_date).then_with(|| episode_order(a, b)));
    episodes
}

/// Episodes airing within the forward window, soonest first.
pub fn upcoming_episodes(store: &EntityStore, today: NaiveDate, days: u32) -> Vec<&Episode> {
    let mut episodes: Vec<&Episode> = store
        .episodes
        .all()
        .into_iter()
        .filter(|e| e.air_date.is_some_and(|d| is_upcoming(d, today, days)))
        .collect();
    episodes.sort_by(|a, b| a.air_date.cmp(&b.air_date).then_with(|| episode_order(a, b)));
    episodes
}

fn episode_order(a: &Episode, b: &Episode) -> std::cmp::Ordering {
    a.show_title
        .cmp(&b.show_title)
        .then(a.season_number.cmp(&b.season_number))
        .then(a.episode_number.cmp(&b.episode_number))
}

/// Movies released within the trailing window, newest first.
pub fn recent_movies(store: &EntityStore, today: NaiveDate, days: u32) -> Vec<&Movie> {
    let mut movies: Vec<&Movie> = store
        .movies
        .table
        .all()
        .into_iter()
        .filter(|m| m.release_date.is_some_and(|d| is_recent(d, today, days)))
        .collect();
    movies.sort_by(|a, b| b.release_date.cmp(&a.release_date));
    movies
}

/// Movies releasing within the forward window, soonest first.
pub fn upcoming_movies(store: &EntityStore, today: NaiveDate, days: u32) -> Vec<&Movie> {
    let mut movies: Vec<&Movie> = store
        .movies
        .table
        .all()
        .into_iter()
        .filter(|m| m.release_date.is_some_and(|d| is_upcoming(d, today, days)))
        .collect();
    movies.sort_by(|a, b| a.release_date.cmp(&b.release_date));
    movies
}

/// Show counts per watch-status bucket.
///
/// `unaired` is a separate axis: an unaired show is also counted under its
/// stored status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShowCounts {
    pub total: usize,
    pub watched: usize,
    pub watching: usize,
    pub not_watched: usize,
    pub unaired: usize,
}

/// Movie counts per watch-status bucket, plus the orthogonal `unaired` count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MovieCounts {
    pub total: usize,
    pub watched: usize,
    pub not_watched: usize,
    pub unaired: usize,
}

pub fn show_counts<'a>(shows: impl IntoIterator<Item = &'a Show>, today: NaiveDate) -> ShowCounts {
    shows.into_iter().fold(ShowCounts::default(), |mut counts, show| {
        counts.total += 1;
        match show.watch_status {
            ShowWatchStatus::Watched => counts.watched += 1,
            ShowWatchStatus::Watching => counts.watching += 1,
            ShowWatchStatus::NotWatched => counts.not_watched += 1,
        }
        if is_unaired(show.release_date, today) {
            counts.unaired += 1;
        }
        counts
    })
}

pub fn movie_counts<'a>(movies: impl IntoIterator<Item = &'a Movie>, today: NaiveDate) -> MovieCounts {
    movies.into_iter().fold(MovieCounts::default(), |mut counts, movie| {
        counts.total += 1;
        match movie.watch_status {
            MovieWatchStatus::Watched => counts.watched += 1,
            MovieWatchStatus::NotWatched => counts.not_watched += 1,
        }
        if is_unaired(movie.release_date, today) {
            counts.unaired += 1;
        }
        counts
    })
}

/// Statistics for the active profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileStatistics {
    pub shows: ShowCounts,
    pub movies: MovieCounts,
    /// Favorites per genre, shows and movies combined.
    pub genres: BTreeMap<String, usize>,
    /// Favorites per streaming service, shows and movies combined.
    pub streaming_services: BTreeMap<String, usize>,
    /// Share of favorites marked watched, 0-100.
    pub watched_percentage: f64,
}

pub fn profile_statistics(store: &EntityStore, today: NaiveDate) -> ProfileStatistics {
    let shows = store.shows.table.all();
    let movies = store.movies.table.all();

    let mut genres = BTreeMap::new();
    let mut streaming_services = BTreeMap::new();

    let show_tags = shows.iter().map(|s| (&s.genres, &s.streaming_service));
    let movie_tags = movies.iter().map(|m| (&m.genres, &m.streaming_service));
    for (item_genres, service) in show_tags.chain(movie_tags) {
        for genre in item_genres {
            *genres.entry(genre.clone()).or_insert(0) += 1;
        }
        for service in split_services(service) {
            *streaming_services.entry(service.to_string()).or_insert(0) += 1;
        }
    }

    let show_counts = show_counts(shows.iter().copied(), today);
    let movie_counts = movie_counts(movies.iter().copied(), today);
    let total = show_counts.total + movie_counts.total;
    let watched = show_counts.watched + movie_counts.watched;
    let watched_percentage = if total == 0 {
        0.0
    } else {
        watched as f64 * 100.0 / total as f64
    };

    ProfileStatistics {
        shows: show_counts,
        movies: movie_counts,
        genres,
        streaming_services,
        watched_percentage,
    }
}

/// Services are stored as a comma-separated label, e.g. `"Netflix, Hulu"`.
fn split_services(label: &str) -> impl Iterator<Item = &str> {
    label.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// List ordering applied at read time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Order the server returned them in.
    #[default]
    Insertion,
    Title,
    /// Oldest first; undated last.
    ReleaseDate,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "insertion" | "default" => Ok(SortKey::Insertion),
            "title" => Ok(SortKey::Title),
            "release" | "release-date" | "date" => Ok(SortKey::ReleaseDate),
            _ => Err(format!("unknown sort '{}' (expected insertion, title or release-date)", s)),
        }
    }
}

/// Filter for list views. `None` fields match everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFilter<S> {
    pub watch_status: Option<S>,
    pub genre: Option<String>,
    pub streaming_service: Option<String>,
}

impl<S> Default for ContentFilter<S> {
    fn default() -> Self {
        Self {
            watch_status: None,
            genre: None,
            streaming_service: None,
        }
    }
}

impl<S: PartialEq> ContentFilter<S> {
    fn matches(&self, status: &S, genres: &[String], service: &str) -> bool {
        if let Some(ref wanted) = self.watch_status {
            if wanted != status {
                return false;
            }
        }
        if let Some(ref genre) = self.genre {
            if !genres.iter().any(|g| g.eq_ignore_ascii_case(genre)) {
                return false;
            }
        }
        if let Some(ref wanted) = self.streaming_service {
            if !split_services(service).any(|s| s.eq_ignore_ascii_case(wanted)) {
                return false;
            }
        }
        true
    }
}

fn apply_sort<T>(items: &mut [&T], sort: SortKey, title: fn(&T) -> &str, date: fn(&T) -> Option<NaiveDate>) {
    match sort {
        SortKey::Insertion => {}
        SortKey::Title => items.sort_by_key(|item| title(item).to_lowercase()),
        SortKey::ReleaseDate => items.sort_by_key(|item| (date(item).is_none(), date(item))),
    }
}

pub fn filter_shows<'a>(
    store: &'a EntityStore,
    filter: &ContentFilter<ShowWatchStatus>,
    sort: SortKey,
) -> Vec<&'a Show> {
    let mut shows: Vec<&Show> = store
        .shows
        .table
        .all()
        .into_iter()
        .filter(|s| filter.matches(&s.watch_status, &s.genres, &s.streaming_service))
        .collect();
    apply_sort(&mut shows, sort, |s| s.title.as_str(), |s| s.release_date);
    shows
}

pub fn filter_movies<'a>(
    store: &'a EntityStore,
    filter: &ContentFilter<MovieWatchStatus>,
    sort: SortKey,
) -> Vec<&'a Movie> {
    let mut movies: Vec<&Movie> = store
        .movies
        .table
        .all()
        .into_iter()
        .filter(|m| filter.matches(&m.watch_status, &m.genres, &m.streaming_service))
        .collect();
    apply_sort(&mut movies, sort, |m| m.title.as_str(), |m| m.release_date);
    movies
}

/// Shows whose stored status claims progress on something not yet aired.
///
/// These are allowed to exist; the view only makes them visible.
pub fn inconsistent_shows(store: &EntityStore, today: NaiveDate) -> Vec<&Show> {
    store
        .shows
        .table
        .all()
        .into_iter()
        .filter(|s| s.watch_status != ShowWatchStatus::NotWatched && is_unaired(s.release_date, today))
        .collect()
}

/// Movies marked watched before their release date.
pub fn inconsistent_movies(store: &EntityStore, today: NaiveDate) -> Vec<&Movie> {
    store
        .movies
        .table
        .all()
        .into_iter()
        .filter(|m| m.watch_status == MovieWatchStatus::Watched && is_unaired(m.release_date, today))
        .collect()
}
