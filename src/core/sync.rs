//! Synchronization engine.
//!
//! Every remote operation goes through the same lifecycle: the target
//! collection is marked pending, the remote call runs, and on settlement the
//! store is either updated with the server's canonical answer or left as it
//! was. Exactly one notification is emitted per settled operation.
//!
//! Store mutation and snapshot persistence happen together under the store
//! lock and never span an `.await`, so a settlement is applied atomically.

use super::latch::{FetchLatch, LatchGuard};
use super::notification::{Notification, Notifier, Severity};
use super::persistence::{Persistence, Storage, ACTIVE_PROFILE_NAMESPACE, PROFILES_NAMESPACE};
use super::store::{CollectionKind, EntityStore, SyncStatus};
use crate::models::{
    AccountNotification, Episode, Movie, MovieWatchStatus, Profile, Show, ShowWatchStatus,
};
use crate::services::api::{
    FavoritedShow, ImageUpload, RemoteError, RemoteResult, RemoteSource, ShowsPayload,
};
use crate::{Error, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A remote operation family member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchProfiles,
    AddProfile,
    EditProfile,
    UpdateProfileImage,
    DeleteProfile,
    FetchShows,
    AddShowFavorite,
    RemoveShowFavorite,
    UpdateShowStatus,
    FetchMovies,
    AddMovieFavorite,
    RemoveMovieFavorite,
    UpdateMovieStatus,
    FetchSystemNotifications,
    DismissSystemNotification,
}

impl Operation {
    /// Collection whose envelope tracks this operation.
    pub fn collection(self) -> CollectionKind {
        match self {
            Operation::FetchProfiles
            | Operation::AddProfile
            | Operation::EditProfile
            | Operation::UpdateProfileImage
            | Operation::DeleteProfile => CollectionKind::Profiles,
            Operation::FetchShows
            | Operation::AddShowFavorite
            | Operation::RemoveShowFavorite
            | Operation::UpdateShowStatus => CollectionKind::Shows,
            Operation::FetchMovies
            | Operation::AddMovieFavorite
            | Operation::RemoveMovieFavorite
            | Operation::UpdateMovieStatus => CollectionKind::Movies,
            Operation::FetchSystemNotifications | Operation::DismissSystemNotification => {
                CollectionKind::SystemNotifications
            }
        }
    }

    /// Namespaces rewritten when this operation commits.
    pub fn namespaces(self) -> &'static [&'static str] {
        match self {
            // Deleting the active profile also drops its content.
            Operation::DeleteProfile => &[PROFILES_NAMESPACE, ACTIVE_PROFILE_NAMESPACE],
            // Announcements are reloaded every session.
            op if op.collection() == CollectionKind::SystemNotifications => &[],
            op if op.collection() == CollectionKind::Profiles => &[PROFILES_NAMESPACE],
            _ => &[ACTIVE_PROFILE_NAMESPACE],
        }
    }

    /// Message shown when no structured error is available.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::FetchProfiles => "Get Profiles Failed",
            Operation::AddProfile => "Add Profile Failed",
            Operation::EditProfile => "Edit Profile Failed",
            Operation::UpdateProfileImage => "Profile Image Update Failed",
            Operation::DeleteProfile => "Delete Profile Failed",
            Operation::FetchShows => "Get Shows Failed",
            Operation::AddShowFavorite => "Add Show Favorite Failed",
            Operation::RemoveShowFavorite => "Remove Show Favorite Failed",
            Operation::UpdateShowStatus => "Update Show Watch Status Failed",
            Operation::FetchMovies => "Get Movies Failed",
            Operation::AddMovieFavorite => "Add Movie Favorite Failed",
            Operation::RemoveMovieFavorite => "Remove Movie Favorite Failed",
            Operation::UpdateMovieStatus => "Update Movie Watch Status Failed",
            Operation::FetchSystemNotifications => "Failed to fetch system notifications",
            Operation::DismissSystemNotification => "Failed to dismiss a system notification",
        }
    }

    /// Server messages pass through verbatim; everything else gets the fallback.
    pub fn failure_message(self, error: &RemoteError) -> String {
        match error {
            RemoteError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => self.fallback_message().to_string(),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::FetchProfiles => "profiles/fetch",
            Operation::AddProfile => "profiles/add",
            Operation::EditProfile => "profiles/edit",
            Operation::UpdateProfileImage => "profiles/updateImage",
            Operation::DeleteProfile => "profiles/delete",
            Operation::FetchShows => "shows/fetch",
            Operation::AddShowFavorite => "shows/addFavorite",
            Operation::RemoveShowFavorite => "shows/removeFavorite",
            Operation::UpdateShowStatus => "shows/updateStatus",
            Operation::FetchMovies => "movies/fetch",
            Operation::AddMovieFavorite => "movies/addFavorite",
            Operation::RemoveMovieFavorite => "movies/removeFavorite",
            Operation::UpdateMovieStatus => "movies/updateStatus",
            Operation::FetchSystemNotifications => "systemNotifications/fetch",
            Operation::DismissSystemNotification => "systemNotifications/dismiss",
        };
        write!(f, "{}", name)
    }
}

/// Result of a fetch-collection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Guarded out: already populated or already in flight. No remote call.
    Skipped,
    /// Collection replaced with this many records.
    Loaded(usize),
}

/// What a settlement is allowed to touch.
#[derive(Debug, Clone)]
struct Ticket {
    op: Operation,
    epoch: u64,
    /// Content operations only apply while this profile is still active.
    profile_id: Option<String>,
}

/// Orchestrates remote operations against the entity store.
pub struct SyncEngine {
    remote: Arc<dyn RemoteSource>,
    notifier: Arc<dyn Notifier>,
    persistence: Persistence,
    store: Mutex<EntityStore>,
    latch: FetchLatch,
    epoch: AtomicU64,
    initialized: AtomicBool,
}

impl SyncEngine {
    /// Create an engine with an empty store. Call [`SyncEngine::init`] to recover snapshots.
    pub fn new(
        remote: Arc<dyn RemoteSource>,
        storage: Box<dyn Storage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            remote,
            notifier,
            persistence: Persistence::new(storage),
            store: Mutex::new(EntityStore::new()),
            latch: FetchLatch::new(),
            epoch: AtomicU64::new(0),
            initialized: AtomicBool::new(false),
        }
    }

    /// Seed the store from persisted snapshots. Only the first call reads storage.
    pub fn init(&self) -> bool {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return false;
        }
        let restored = self.persistence.restore();
        tracing::debug!(
            "Store initialized: {} profiles ({}), {} shows, {} movies",
            restored.profiles.table.len(),
            restored.profiles.status,
            restored.shows.table.len(),
            restored.movies.table.len()
        );
        *self.lock() = restored;
        true
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EntityStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run a read-only projection over the current store.
    pub fn read<T>(&self, f: impl FnOnce(&EntityStore) -> T) -> T {
        f(&self.lock())
    }

    /// Owned copy of the current store.
    pub fn snapshot(&self) -> EntityStore {
        self.lock().clone()
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.read(|s| s.profiles.table.to_vec())
    }

    pub fn profile(&self, profile_id: &str) -> Option<Profile> {
        self.read(|s| s.profiles.table.get(&profile_id.to_string()).cloned())
    }

    pub fn shows(&self) -> Vec<Show> {
        self.read(|s| s.shows.table.to_vec())
    }

    pub fn movies(&self) -> Vec<Movie> {
        self.read(|s| s.movies.table.to_vec())
    }

    pub fn episodes(&self) -> Vec<Episode> {
        self.read(|s| s.episodes.to_vec())
    }

    pub fn system_notifications(&self) -> Vec<AccountNotification> {
        self.read(|s| s.system_notifications.table.to_vec())
    }

    pub fn active_profile_id(&self) -> Option<String> {
        self.read(|s| s.active_profile_id.clone())
    }

    pub fn status(&self, kind: CollectionKind) -> SyncStatus {
        self.read(|s| s.envelope(kind).0)
    }

    pub fn last_error(&self, kind: CollectionKind) -> Option<String> {
        self.read(|s| s.envelope(kind).1)
    }

    /// True once a snapshot write has failed this session.
    pub fn is_degraded(&self) -> bool {
        self.persistence.is_degraded()
    }

    fn ticket(&self, op: Operation, profile_id: Option<&str>) -> Ticket {
        Ticket {
            op,
            epoch: self.epoch.load(Ordering::SeqCst),
            profile_id: profile_id.map(str::to_string),
        }
    }

    /// Whether a settlement still belongs to the current session and profile.
    fn is_current(&self, ticket: &Ticket, store: &EntityStore) -> bool {
        if ticket.epoch != self.epoch.load(Ordering::SeqCst) {
            return false;
        }
        match ticket.profile_id {
            Some(ref id) => store.active_profile_id.as_deref() == Some(id.as_str()),
            None => true,
        }
    }

    fn persist(&self, store: &EntityStore, namespaces: &[&str]) {
        for namespace in namespaces {
            match *namespace {
                PROFILES_NAMESPACE => self.persistence.save_profiles(&store.profiles.table),
                _ => self.persistence.save_active_profile(store),
            }
        }
    }

    /// Drive one operation through pending → settled.
    async fn run<T, Fut>(
        &self,
        ticket: Ticket,
        call: Fut,
        apply: impl FnOnce(&mut EntityStore, &T),
        success: impl FnOnce(&T) -> Notification,
    ) -> Result<T>
    where
        Fut: Future<Output = RemoteResult<T>>,
    {
        let op = ticket.op;
        let kind = op.collection();
        tracing::debug!("{} issued", op);
        self.lock().mark_pending(kind);

        match call.await {
            Ok(value) => {
                {
                    let mut store = self.lock();
                    if self.is_current(&ticket, &store) {
                        apply(&mut store, &value);
                        store.mark_succeeded(kind);
                        self.persist(&store, op.namespaces());
                        tracing::info!("{} committed", op);
                    } else {
                        tracing::debug!("{} settled after reset, store untouched", op);
                    }
                }
                self.notifier.emit(success(&value));
                Ok(value)
            }
            Err(error) => {
                let message = op.failure_message(&error);
                tracing::error!("{} failed: {}", op, error);
                {
                    let mut store = self.lock();
                    if self.is_current(&ticket, &store) {
                        store.mark_failed(kind, &message);
                    }
                }
                self.notifier.emit(Notification::error(message.clone()));
                Err(Error::Sync {
                    operation: op,
                    message,
                })
            }
        }
    }

    /// Guard for fetch-collection: skip when populated (unless forced) or already in flight.
    fn begin_fetch(&self, kind: CollectionKind, force: bool) -> Option<LatchGuard<'_>> {
        if !force && self.read(|s| s.is_populated(kind)) {
            tracing::debug!("{} already loaded, fetch skipped", kind);
            return None;
        }
        let guard = self.latch.try_acquire(kind);
        if guard.is_none() {
            tracing::debug!("{} fetch already in flight, request dropped", kind);
        }
        guard
    }

    fn require_active_profile(&self) -> Result<String> {
        self.active_profile_id().ok_or(Error::NoActiveProfile)
    }

    // ========== PROFILES ==========

    /// Load the account's profiles unless they are already cached.
    pub async fn fetch_profiles(&self, account_id: &str) -> Result<FetchOutcome> {
        self.fetch_profiles_with(account_id, false).await
    }

    /// Reload profiles even when cached; still one fetch at a time.
    pub async fn refresh_profiles(&self, account_id: &str) -> Result<FetchOutcome> {
        self.fetch_profiles_with(account_id, true).await
    }

    async fn fetch_profiles_with(&self, account_id: &str, force: bool) -> Result<FetchOutcome> {
        let Some(_guard) = self.begin_fetch(CollectionKind::Profiles, force) else {
            return Ok(FetchOutcome::Skipped);
        };
        let profiles = self
            .run(
                self.ticket(Operation::FetchProfiles, None),
                self.remote.fetch_profiles(account_id),
                |store, profiles: &Vec<Profile>| store.profiles.table.set_all(profiles.clone()),
                |profiles: &Vec<Profile>| Notification::new(format!("Loaded {} profiles", profiles.len()), Severity::Info),
            )
            .await?;
        Ok(FetchOutcome::Loaded(profiles.len()))
    }

    pub async fn add_profile(&self, account_id: &str, name: &str) -> Result<Profile> {
        self.run(
            self.ticket(Operation::AddProfile, None),
            self.remote.add_profile(account_id, name),
            |store, profile: &Profile| store.profiles.table.upsert(profile.clone()),
            |profile: &Profile| Notification::success(format!("Added profile: {}", profile.name)),
        )
        .await
    }

    pub async fn edit_profile(&self, account_id: &str, profile_id: &str, name: &str) -> Result<Profile> {
        self.run(
            self.ticket(Operation::EditProfile, None),
            self.remote.edit_profile(account_id, profile_id, name),
            |store, profile: &Profile| replace_profile(store, profile),
            |_| Notification::success("Profile edited successfully"),
        )
        .await
    }

    pub async fn update_profile_image(
        &self,
        account_id: &str,
        profile_id: &str,
        upload: ImageUpload,
    ) -> Result<Profile> {
        self.run(
            self.ticket(Operation::UpdateProfileImage, None),
            self.remote.update_profile_image(account_id, profile_id, upload),
            |store, profile: &Profile| replace_profile(store, profile),
            |_| Notification::success("Profile image updated successfully"),
        )
        .await
    }

    pub async fn delete_profile(&self, account_id: &str, profile_id: &str) -> Result<()> {
        let target = profile_id.to_string();
        self.run(
            self.ticket(Operation::DeleteProfile, None),
            self.remote.delete_profile(account_id, profile_id),
            |store, _: &()| {
                store.profiles.table.remove(&target);
                if store.active_profile_id.as_deref() == Some(target.as_str()) {
                    store.active_profile_id = None;
                    store.clear_active_content();
                }
            },
            |_| Notification::success("Profile deleted successfully"),
        )
        .await
    }

    // ========== ACTIVE PROFILE ==========

    /// Make `profile_id` the profile whose favorites are cached.
    ///
    /// Switching profiles drops the previous profile's content; fetches still
    /// in flight for it settle without touching the store.
    pub fn set_active_profile(&self, profile_id: &str) -> Result<()> {
        let mut store = self.lock();
        if store.active_profile_id.as_deref() == Some(profile_id) {
            return Ok(());
        }
        if !store.profiles.table.is_empty()
            && !store.profiles.table.contains(&profile_id.to_string())
        {
            return Err(Error::other(format!("Unknown profile: {}", profile_id)));
        }

        store.active_profile_id = Some(profile_id.to_string());
        store.clear_active_content();
        self.latch.release(CollectionKind::Shows);
        self.latch.release(CollectionKind::Movies);
        self.persistence.save_active_profile(&store);
        tracing::info!("Active profile set to {}", profile_id);
        Ok(())
    }

    /// Fetch shows and movies of the active profile concurrently.
    pub async fn load_active_profile(&self, account_id: &str) -> Result<(FetchOutcome, FetchOutcome)> {
        let (shows, movies) = futures::join!(self.fetch_shows(account_id), self.fetch_movies(account_id));
        Ok((shows?, movies?))
    }

    // ========== SHOWS ==========

    pub async fn fetch_shows(&self, account_id: &str) -> Result<FetchOutcome> {
        self.fetch_shows_with(account_id, false).await
    }

    pub async fn refresh_shows(&self, account_id: &str) -> Result<FetchOutcome> {
        self.fetch_shows_with(account_id, true).await
    }

    async fn fetch_shows_with(&self, account_id: &str, force: bool) -> Result<FetchOutcome> {
        let profile_id = self.require_active_profile()?;
        let Some(_guard) = self.begin_fetch(CollectionKind::Shows, force) else {
            return Ok(FetchOutcome::Skipped);
        };
        let payload = self
            .run(
                self.ticket(Operation::FetchShows, Some(profile_id.as_str())),
                self.remote.fetch_shows(account_id, &profile_id),
                |store, payload: &ShowsPayload| store.set_shows(payload.shows.clone(), payload.episodes.clone()),
                |payload: &ShowsPayload| Notification::new(format!("Loaded {} shows", payload.shows.len()), Severity::Info),
            )
            .await?;
        Ok(FetchOutcome::Loaded(payload.shows.len()))
    }

    /// Favorite a show by TMDB id. Already-favorited shows are returned without a remote call.
    pub async fn add_show_favorite(&self, account_id: &str, tmdb_id: u64) -> Result<Show> {
        let profile_id = self.require_active_profile()?;
        if let Some(existing) = self.read(|s| s.show_by_tmdb_id(tmdb_id).cloned()) {
            tracing::debug!("Show {} already a favorite", tmdb_id);
            return Ok(existing);
        }
        let favorited = self
            .run(
                self.ticket(Operation::AddShowFavorite, Some(profile_id.as_str())),
                self.remote.add_show_favorite(account_id, &profile_id, tmdb_id),
                |store, favorited: &FavoritedShow| {
                    store.shows.table.upsert(favorited.show.clone());
                    store.episodes.upsert_many(favorited.episodes.clone());
                },
                |favorited: &FavoritedShow| Notification::success(format!("Added show favorite: {}", favorited.show.title)),
            )
            .await?;
        Ok(favorited.show)
    }

    pub async fn remove_show_favorite(&self, account_id: &str, show_id: u64) -> Result<()> {
        let profile_id = self.require_active_profile()?;
        let title = self.read(|s| s.shows.table.get(&show_id).map(|show| show.title.clone()));
        self.run(
            self.ticket(Operation::RemoveShowFavorite, Some(profile_id.as_str())),
            self.remote.remove_show_favorite(account_id, &profile_id, show_id),
            |store, _: &()| {
                store.remove_show(show_id);
            },
            |_| Notification::success(format!("Removed show favorite: {}", display_title(title, show_id))),
        )
        .await
    }

    /// Change a show's watch status. The stored value is whatever the server returns.
    pub async fn update_show_status(
        &self,
        account_id: &str,
        show_id: u64,
        status: ShowWatchStatus,
    ) -> Result<Show> {
        let profile_id = self.require_active_profile()?;
        self.run(
            self.ticket(Operation::UpdateShowStatus, Some(profile_id.as_str())),
            self.remote.update_show_status(account_id, &profile_id, show_id, status),
            |store, show: &Show| {
                if show.watch_status != status {
                    tracing::debug!(
                        "Server kept show {} at {} (requested {})",
                        show.show_id,
                        show.watch_status,
                        status
                    );
                }
                if store.shows.table.contains(&show.show_id) {
                    store.shows.table.upsert(show.clone());
                }
            },
            |show: &Show| Notification::success(format!("Marked {} as {}", show.title, show.watch_status)),
        )
        .await
    }

    // ========== MOVIES ==========

    pub async fn fetch_movies(&self, account_id: &str) -> Result<FetchOutcome> {
        self.fetch_movies_with(account_id, false).await
    }

    pub async fn refresh_movies(&self, account_id: &str) -> Result<FetchOutcome> {
        self.fetch_movies_with(account_id, true).await
    }

    async fn fetch_movies_with(&self, account_id: &str, force: bool) -> Result<FetchOutcome> {
        let profile_id = self.require_active_profile()?;
        let Some(_guard) = self.begin_fetch(CollectionKind::Movies, force) else {
            return Ok(FetchOutcome::Skipped);
        };
        let movies = self
            .run(
                self.ticket(Operation::FetchMovies, Some(profile_id.as_str())),
                self.remote.fetch_movies(account_id, &profile_id),
                |store, movies: &Vec<Movie>| store.movies.table.set_all(movies.clone()),
                |movies: &Vec<Movie>| Notification::new(format!("Loaded {} movies", movies.len()), Severity::Info),
            )
            .await?;
        Ok(FetchOutcome::Loaded(movies.len()))
    }

    /// Favorite a movie by TMDB id. Already-favorited movies are returned without a remote call.
    pub async fn add_movie_favorite(&self, account_id: &str, tmdb_id: u64) -> Result<Movie> {
        let profile_id = self.require_active_profile()?;
        if let Some(existing) = self.read(|s| s.movie_by_tmdb_id(tmdb_id).cloned()) {
            tracing::debug!("Movie {} already a favorite", tmdb_id);
            return Ok(existing);
        }
        self.run(
            self.ticket(Operation::AddMovieFavorite, Some(profile_id.as_str())),
            self.remote.add_movie_favorite(account_id, &profile_id, tmdb_id),
            |store, movie: &Movie| store.movies.table.upsert(movie.clone()),
            |movie: &Movie| Notification::success(format!("Added movie favorite: {}", movie.title)),
        )
        .await
    }

    pub async fn remove_movie_favorite(&self, account_id: &str, movie_id: u64) -> Result<()> {
        let profile_id = self.require_active_profile()?;
        let title = self.read(|s| s.movies.table.get(&movie_id).map(|movie| movie.title.clone()));
        self.run(
            self.ticket(Operation::RemoveMovieFavorite, Some(profile_id.as_str())),
            self.remote.remove_movie_favorite(account_id, &profile_id, movie_id),
            |store, _: &()| {
                store.movies.table.remove(&movie_id);
            },
            |_| Notification::success(format!("Removed movie favorite: {}", display_title(title, movie_id))),
        )
        .await
    }

    /// Change a movie's watch status. The stored value is whatever the server returns.
    pub async fn update_movie_status(
        &self,
        account_id: &str,
        movie_id: u64,
        status: MovieWatchStatus,
    ) -> Result<Movie> {
        let profile_id = self.require_active_profile()?;
        self.run(
            self.ticket(Operation::UpdateMovieStatus, Some(profile_id.as_str())),
            self.remote.update_movie_status(account_id, &profile_id, movie_id, status),
            |store, movie: &Movie| {
                if store.movies.table.contains(&movie.movie_id) {
                    store.movies.table.upsert(movie.clone());
                }
            },
            |movie: &Movie| Notification::success(format!("Marked {} as {}", movie.title, movie.watch_status)),
        )
        .await
    }

    // ========== SYSTEM NOTIFICATIONS ==========

    /// Reload the account's announcements. Always asks the server, one request at a time.
    pub async fn fetch_system_notifications(&self, account_id: &str) -> Result<FetchOutcome> {
        let Some(_guard) = self.begin_fetch(CollectionKind::SystemNotifications, true) else {
            return Ok(FetchOutcome::Skipped);
        };
        let notifications = self
            .run(
                self.ticket(Operation::FetchSystemNotifications, None),
                self.remote.fetch_system_notifications(account_id),
                |store, notifications: &Vec<AccountNotification>| {
                    store.system_notifications.table.set_all(notifications.clone())
                },
                |notifications: &Vec<AccountNotification>| {
                    Notification::new(
                        format!("Loaded {} system notifications", notifications.len()),
                        Severity::Info,
                    )
                },
            )
            .await?;
        Ok(FetchOutcome::Loaded(notifications.len()))
    }

    /// Dismiss one announcement. The server answers with the remaining list.
    pub async fn dismiss_system_notification(
        &self,
        account_id: &str,
        notification_id: u64,
    ) -> Result<Vec<AccountNotification>> {
        self.run(
            self.ticket(Operation::DismissSystemNotification, None),
            self.remote.dismiss_system_notification(account_id, notification_id),
            |store, notifications: &Vec<AccountNotification>| {
                store.system_notifications.table.set_all(notifications.clone())
            },
            |_| Notification::success("System notification dismissed"),
        )
        .await
    }

    // ========== SESSION ==========

    /// Reset every collection to its initial state and clear all snapshots.
    ///
    /// Operations still in flight settle without touching the store.
    pub fn logout(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.latch.release_all();
        {
            let mut store = self.lock();
            store.reset();
            self.persistence.clear_all();
        }
        tracing::info!("Logged out, cache cleared");
        self.notifier.emit(Notification::success("Successfully logged out"));
    }
}

/// Replace a profile only if it is still cached.
fn replace_profile(store: &mut EntityStore, profile: &Profile) {
    if store.profiles.table.contains(&profile.id) {
        store.profiles.table.upsert(profile.clone());
    } else {
        tracing::debug!("Profile {} no longer cached, update dropped", profile.id);
    }
}

fn display_title(title: Option<String>, id: u64) -> String {
    title.unwrap_or_else(|| format!("#{}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_passes_through() {
        let err = RemoteError::api(409, "Profile name already in use");
        assert_eq!(
            Operation::AddProfile.failure_message(&err),
            "Profile name already in use"
        );
    }

    #[test]
    fn test_transport_failure_uses_fallback() {
        let err = RemoteError::transport("connection refused");
        assert_eq!(Operation::AddProfile.failure_message(&err), "Add Profile Failed");
        assert_eq!(
            Operation::UpdateMovieStatus.failure_message(&err),
            "Update Movie Watch Status Failed"
        );
    }

    #[test]
    fn test_blank_api_message_uses_fallback() {
        let err = RemoteError::api(500, "  ");
        assert_eq!(Operation::DeleteProfile.failure_message(&err), "Delete Profile Failed");
    }

    #[test]
    fn test_delete_profile_rewrites_both_namespaces() {
        assert_eq!(
            Operation::DeleteProfile.namespaces(),
            &[PROFILES_NAMESPACE, ACTIVE_PROFILE_NAMESPACE]
        );
        assert_eq!(Operation::EditProfile.namespaces(), &[PROFILES_NAMESPACE]);
        assert_eq!(Operation::AddShowFavorite.namespaces(), &[ACTIVE_PROFILE_NAMESPACE]);
    }

    #[test]
    fn test_system_notifications_are_not_persisted() {
        assert!(Operation::FetchSystemNotifications.namespaces().is_empty());
        assert!(Operation::DismissSystemNotification.namespaces().is_empty());
        assert_eq!(
            Operation::DismissSystemNotification.collection(),
            CollectionKind::SystemNotifications
        );
    }

    #[test]
    fn test_system_notification_fallbacks() {
        let err = RemoteError::transport("timed out");
        assert_eq!(
            Operation::FetchSystemNotifications.failure_message(&err),
            "Failed to fetch system notifications"
        );
        assert_eq!(
            Operation::DismissSystemNotification.failure_message(&err),
            "Failed to dismiss a system notification"
        );
    }
}
