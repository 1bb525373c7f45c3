//! Shared fixtures for integration tests: a scripted remote, storages and
//! record builders.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use keepwatching::core::notification::RecordingNotifier;
use keepwatching::core::persistence::{MemoryStorage, Storage};
use keepwatching::core::sync::SyncEngine;
use keepwatching::models::{
    AccountNotification, Episode, Movie, MovieWatchStatus, Profile, ProfileCounts, Show,
    ShowWatchStatus,
};
use keepwatching::services::api::{FavoritedShow, ImageUpload, ShowsPayload};
use keepwatching::services::{RemoteError, RemoteResult, RemoteSource};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ACCOUNT: &str = "acct-1";

// ========== BUILDERS ==========

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn profile(id: &str, name: &str) -> Profile {
    Profile {
        id: id.to_string(),
        name: name.to_string(),
        image: None,
        counts: ProfileCounts::default(),
    }
}

pub fn show(show_id: u64, title: &str, status: ShowWatchStatus, profile_id: &str) -> Show {
    Show {
        show_id,
        tmdb_id: 1000 + show_id,
        title: title.to_string(),
        description: String::new(),
        release_date: Some(date(2020, 1, 1)),
        genres: vec!["Drama".to_string()],
        streaming_service: "Netflix".to_string(),
        image: None,
        user_rating: None,
        tv_parental_guidelines: None,
        season_count: Some(1),
        episode_count: Some(10),
        watch_status: status,
        profile_id: profile_id.to_string(),
    }
}

pub fn movie(movie_id: u64, title: &str, status: MovieWatchStatus, profile_id: &str) -> Movie {
    Movie {
        movie_id,
        tmdb_id: 5000 + movie_id,
        title: title.to_string(),
        description: String::new(),
        release_date: Some(date(2020, 1, 1)),
        genres: vec!["Comedy".to_string()],
        runtime: Some(100),
        image: None,
        user_rating: None,
        mpa_rating: None,
        streaming_service: "Hulu".to_string(),
        watch_status: status,
        profile_id: profile_id.to_string(),
    }
}

pub fn episode(episode_id: u64, show_id: u64, number: u32, air_date: Option<NaiveDate>) -> Episode {
    Episode {
        episode_id,
        show_id,
        show_title: format!("Show {}", show_id),
        season_number: 1,
        episode_number: number,
        title: format!("Episode {}", number),
        overview: String::new(),
        air_date,
        watched: false,
    }
}

pub fn announcement(notification_id: u64, message: &str) -> AccountNotification {
    AccountNotification {
        notification_id,
        message: message.to_string(),
        start_date: None,
        end_date: None,
        dismissed: false,
    }
}

// ========== SCRIPTED REMOTE ==========

#[derive(Default)]
struct Server {
    profiles: Vec<Profile>,
    shows: Vec<Show>,
    episodes: Vec<Episode>,
    movies: Vec<Movie>,
    announcements: Vec<AccountNotification>,
    /// Shows returned by add_show_favorite, keyed by TMDB id.
    show_catalog: HashMap<u64, FavoritedShow>,
    /// Movies returned by add_movie_favorite, keyed by TMDB id.
    movie_catalog: HashMap<u64, Movie>,
    next_profile_id: u64,
}

/// In-process [`RemoteSource`] with per-call delays, failures and call counters.
///
/// Call names match the trait methods, e.g. `"fetch_profiles"`.
#[derive(Default)]
pub struct MockRemote {
    server: Mutex<Server>,
    calls: Mutex<HashMap<&'static str, usize>>,
    delays: Mutex<HashMap<&'static str, VecDeque<Duration>>>,
    failures: Mutex<HashMap<&'static str, VecDeque<RemoteError>>>,
    /// Status the server answers with instead of the requested one.
    status_override: Mutex<Option<ShowWatchStatus>>,
}

impl MockRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_profiles(profiles: Vec<Profile>) -> Arc<Self> {
        let remote = Self::default();
        remote.server.lock().unwrap().profiles = profiles;
        Arc::new(remote)
    }

    pub fn set_profiles(&self, profiles: Vec<Profile>) {
        self.server.lock().unwrap().profiles = profiles;
    }

    pub fn set_shows(&self, shows: Vec<Show>, episodes: Vec<Episode>) {
        let mut server = self.server.lock().unwrap();
        server.shows = shows;
        server.episodes = episodes;
    }

    pub fn set_movies(&self, movies: Vec<Movie>) {
        self.server.lock().unwrap().movies = movies;
    }

    pub fn set_announcements(&self, announcements: Vec<AccountNotification>) {
        self.server.lock().unwrap().announcements = announcements;
    }

    pub fn catalog_show(&self, show: Show, episodes: Vec<Episode>) {
        self.server
            .lock()
            .unwrap()
            .show_catalog
            .insert(show.tmdb_id, FavoritedShow { show, episodes });
    }

    pub fn catalog_movie(&self, movie: Movie) {
        self.server.lock().unwrap().movie_catalog.insert(movie.tmdb_id, movie);
    }

    /// Delay the next call of `name` by `delay`. Queued per call.
    pub fn delay(&self, name: &'static str, delay: Duration) {
        self.delays.lock().unwrap().entry(name).or_default().push_back(delay);
    }

    /// Fail the next call of `name` with `error`. Queued per call.
    pub fn fail(&self, name: &'static str, error: RemoteError) {
        self.failures.lock().unwrap().entry(name).or_default().push_back(error);
    }

    pub fn override_show_status(&self, status: ShowWatchStatus) {
        *self.status_override.lock().unwrap() = Some(status);
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Count the call, wait out its delay, then pop its scripted failure.
    async fn enter(&self, name: &'static str) -> RemoteResult<()> {
        *self.calls.lock().unwrap().entry(name).or_insert(0) += 1;
        let delay = self
            .delays
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(|q| q.pop_front());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self
            .failures
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(|q| q.pop_front());
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn not_found(what: &str, id: impl std::fmt::Display) -> RemoteError {
        RemoteError::api(404, format!("{} {} not found", what, id))
    }
}

#[async_trait]
impl RemoteSource for MockRemote {
    async fn fetch_profiles(&self, _account_id: &str) -> RemoteResult<Vec<Profile>> {
        self.enter("fetch_profiles").await?;
        Ok(self.server.lock().unwrap().profiles.clone())
    }

    async fn add_profile(&self, _account_id: &str, name: &str) -> RemoteResult<Profile> {
        self.enter("add_profile").await?;
        let mut server = self.server.lock().unwrap();
        server.next_profile_id += 1;
        let created = profile(&format!("new-{}", server.next_profile_id), name);
        server.profiles.push(created.clone());
        Ok(created)
    }

    async fn edit_profile(&self, _account_id: &str, profile_id: &str, name: &str) -> RemoteResult<Profile> {
        self.enter("edit_profile").await?;
        let mut server = self.server.lock().unwrap();
        match server.profiles.iter_mut().find(|p| p.id == profile_id) {
            Some(p) => {
                p.name = name.to_string();
                Ok(p.clone())
            }
            None => Ok(profile(profile_id, name)),
        }
    }

    async fn update_profile_image(
        &self,
        _account_id: &str,
        profile_id: &str,
        upload: ImageUpload,
    ) -> RemoteResult<Profile> {
        self.enter("update_profile_image").await?;
        let mut server = self.server.lock().unwrap();
        let p = server
            .profiles
            .iter_mut()
            .find(|p| p.id == profile_id)
            .ok_or_else(|| Self::not_found("Profile", profile_id))?;
        p.image = Some(format!("https://img.example/{}", upload.file_name));
        Ok(p.clone())
    }

    async fn delete_profile(&self, _account_id: &str, profile_id: &str) -> RemoteResult<()> {
        self.enter("delete_profile").await?;
        self.server.lock().unwrap().profiles.retain(|p| p.id != profile_id);
        Ok(())
    }

    async fn fetch_shows(&self, _account_id: &str, profile_id: &str) -> RemoteResult<ShowsPayload> {
        self.enter("fetch_shows").await?;
        let server = self.server.lock().unwrap();
        let shows: Vec<Show> = server
            .shows
            .iter()
            .filter(|s| s.profile_id == profile_id)
            .cloned()
            .collect();
        let episodes = server
            .episodes
            .iter()
            .filter(|e| shows.iter().any(|s| s.show_id == e.show_id))
            .cloned()
            .collect();
        Ok(ShowsPayload { shows, episodes })
    }

    async fn add_show_favorite(&self, _account_id: &str, profile_id: &str, tmdb_id: u64) -> RemoteResult<FavoritedShow> {
        self.enter("add_show_favorite").await?;
        let mut server = self.server.lock().unwrap();
        let mut favorited = server
            .show_catalog
            .get(&tmdb_id)
            .cloned()
            .ok_or_else(|| Self::not_found("Show", tmdb_id))?;
        favorited.show.profile_id = profile_id.to_string();
        server.shows.push(favorited.show.clone());
        server.episodes.extend(favorited.episodes.iter().cloned());
        Ok(favorited)
    }

    async fn remove_show_favorite(&self, _account_id: &str, _profile_id: &str, show_id: u64) -> RemoteResult<()> {
        self.enter("remove_show_favorite").await?;
        self.server.lock().unwrap().shows.retain(|s| s.show_id != show_id);
        Ok(())
    }

    async fn update_show_status(
        &self,
        _account_id: &str,
        profile_id: &str,
        show_id: u64,
        status: ShowWatchStatus,
    ) -> RemoteResult<Show> {
        self.enter("update_show_status").await?;
        let answered = self.status_override.lock().unwrap().unwrap_or(status);
        let server = self.server.lock().unwrap();
        let mut updated = server
            .shows
            .iter()
            .find(|s| s.show_id == show_id)
            .cloned()
            .unwrap_or_else(|| show(show_id, &format!("Show {}", show_id), answered, profile_id));
        updated.watch_status = answered;
        Ok(updated)
    }

    async fn fetch_movies(&self, _account_id: &str, profile_id: &str) -> RemoteResult<Vec<Movie>> {
        self.enter("fetch_movies").await?;
        Ok(self
            .server
            .lock()
            .unwrap()
            .movies
            .iter()
            .filter(|m| m.profile_id == profile_id)
            .cloned()
            .collect())
    }

    async fn add_movie_favorite(&self, _account_id: &str, profile_id: &str, tmdb_id: u64) -> RemoteResult<Movie> {
        self.enter("add_movie_favorite").await?;
        let mut server = self.server.lock().unwrap();
        let mut added = server
            .movie_catalog
            .get(&tmdb_id)
            .cloned()
            .ok_or_else(|| Self::not_found("Movie", tmdb_id))?;
        added.profile_id = profile_id.to_string();
        server.movies.push(added.clone());
        Ok(added)
    }

    async fn remove_movie_favorite(&self, _account_id: &str, _profile_id: &str, movie_id: u64) -> RemoteResult<()> {
        self.enter("remove_movie_favorite").await?;
        self.server.lock().unwrap().movies.retain(|m| m.movie_id != movie_id);
        Ok(())
    }

    async fn update_movie_status(
        &self,
        _account_id: &str,
        profile_id: &str,
        movie_id: u64,
        status: MovieWatchStatus,
    ) -> RemoteResult<Movie> {
        self.enter("update_movie_status").await?;
        let server = self.server.lock().unwrap();
        let mut updated = server
            .movies
            .iter()
            .find(|m| m.movie_id == movie_id)
            .cloned()
            .unwrap_or_else(|| movie(movie_id, &format!("Movie {}", movie_id), status, profile_id));
        updated.watch_status = status;
        Ok(updated)
    }

    async fn fetch_system_notifications(&self, _account_id: &str) -> RemoteResult<Vec<AccountNotification>> {
        self.enter("fetch_system_notifications").await?;
        Ok(self.server.lock().unwrap().announcements.clone())
    }

    async fn dismiss_system_notification(
        &self,
        _account_id: &str,
        notification_id: u64,
    ) -> RemoteResult<Vec<AccountNotification>> {
        self.enter("dismiss_system_notification").await?;
        let mut server = self.server.lock().unwrap();
        server.announcements.retain(|n| n.notification_id != notification_id);
        Ok(server.announcements.clone())
    }
}

// ========== STORAGES ==========

/// Shares a [`MemoryStorage`] with the test so snapshots can be inspected.
#[derive(Clone)]
pub struct SharedStorage(pub Arc<MemoryStorage>);

impl SharedStorage {
    pub fn new() -> Self {
        Self(Arc::new(MemoryStorage::new()))
    }

    pub fn raw(&self, namespace: &str) -> Option<String> {
        self.0.load(namespace).unwrap()
    }
}

impl Storage for SharedStorage {
    fn save(&self, namespace: &str, data: &str) -> keepwatching::Result<()> {
        self.0.save(namespace, data)
    }

    fn load(&self, namespace: &str) -> keepwatching::Result<Option<String>> {
        self.0.load(namespace)
    }

    fn clear(&self, namespace: &str) -> keepwatching::Result<()> {
        self.0.clear(namespace)
    }
}

/// Storage that rejects every write.
#[derive(Default)]
pub struct FailingStorage;

impl Storage for FailingStorage {
    fn save(&self, _namespace: &str, _data: &str) -> keepwatching::Result<()> {
        Err(keepwatching::Error::Storage("disk full".to_string()))
    }

    fn load(&self, _namespace: &str) -> keepwatching::Result<Option<String>> {
        Ok(None)
    }

    fn clear(&self, _namespace: &str) -> keepwatching::Result<()> {
        Ok(())
    }
}

// ========== ENGINE ==========

pub struct Harness {
    pub engine: Arc<SyncEngine>,
    pub remote: Arc<MockRemote>,
    pub notifier: Arc<RecordingNotifier>,
    pub storage: SharedStorage,
}

impl Harness {
    pub fn new(remote: Arc<MockRemote>) -> Self {
        Self::with_storage(remote, SharedStorage::new())
    }

    pub fn with_storage(remote: Arc<MockRemote>, storage: SharedStorage) -> Self {
        let notifier = Arc::new(RecordingNotifier::new());
        let engine = SyncEngine::new(remote.clone(), Box::new(storage.clone()), notifier.clone());
        engine.init();
        Self {
            engine: Arc::new(engine),
            remote,
            notifier,
            storage,
        }
    }

    /// Profiles `p1` ("Alice") and `p2` ("Bob"), with `p1` active and loaded.
    pub async fn with_active_profile(remote: Arc<MockRemote>) -> Self {
        remote.set_profiles(vec![profile("p1", "Alice"), profile("p2", "Bob")]);
        let harness = Self::new(remote);
        harness.engine.fetch_profiles(ACCOUNT).await.unwrap();
        harness.engine.set_active_profile("p1").unwrap();
        harness
    }
}
