//! Durable snapshots of the entity store.
//!
//! Two namespaces are persisted: the account's profiles, and the active
//! profile with its favorited content. Snapshots are written through on every
//! committed mutation and read exactly once, when the store is initialized.

use super::store::{Collection, EntityStore, EntityTable};
use crate::models::{Episode, Movie, Profile, Show};
use crate::utils::fs;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Namespace holding the account's profiles.
pub const PROFILES_NAMESPACE: &str = "profiles";

/// Namespace holding the active profile and its content.
pub const ACTIVE_PROFILE_NAMESPACE: &str = "active_profile";

/// Current snapshot layout. Older or newer snapshots are discarded.
pub const SCHEMA_VERSION: u32 = 1;

/// Namespaced text storage.
pub trait Storage: Send + Sync {
    fn save(&self, namespace: &str, data: &str) -> Result<()>;
    fn load(&self, namespace: &str) -> Result<Option<String>>;
    fn clear(&self, namespace: &str) -> Result<()>;
}

/// One JSON file per namespace under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{}.json", namespace))
    }
}

impl Storage for FileStorage {
    fn save(&self, namespace: &str, data: &str) -> Result<()> {
        let path = self.path_for(namespace);
        fs::write_atomic(&path, data.as_bytes())
            .map_err(|e| Error::Storage(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Snapshot saved to: {}", path.display());
        Ok(())
    }

    fn load(&self, namespace: &str) -> Result<Option<String>> {
        let path = self.path_for(namespace);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Storage(format!("{}: {}", path.display(), e)))?;
        Ok(Some(content))
    }

    fn clear(&self, namespace: &str) -> Result<()> {
        fs::remove_if_exists(&self.path_for(namespace))
    }
}

/// In-memory storage; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespaces(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl Storage for MemoryStorage {
    fn save(&self, namespace: &str, data: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(namespace.to_string(), data.to_string());
        Ok(())
    }

    fn load(&self, namespace: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(namespace)
            .cloned())
    }

    fn clear(&self, namespace: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(namespace);
        Ok(())
    }
}

/// A persisted document with a schema check.
pub trait Snapshot: Serialize + DeserializeOwned {
    fn schema_version(&self) -> u32;

    /// Record-level invariants beyond what decoding already enforces.
    fn validate(&self) -> std::result::Result<(), String>;
}

/// Snapshot of the `profiles` namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilesSnapshot {
    pub schema_version: u32,
    pub profiles: Vec<Profile>,
}

impl ProfilesSnapshot {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            profiles,
        }
    }
}

impl Snapshot for ProfilesSnapshot {
    fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn validate(&self) -> std::result::Result<(), String> {
        check_ids(self.profiles.iter().map(|p| p.id.clone()), "profile")?;
        if self.profiles.iter().any(|p| p.id.trim().is_empty()) {
            return Err("profile with empty id".to_string());
        }
        Ok(())
    }
}

/// Snapshot of the `active_profile` namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActiveProfileSnapshot {
    pub schema_version: u32,
    pub profile_id: Option<String>,
    pub shows: Vec<Show>,
    pub movies: Vec<Movie>,
    pub episodes: Vec<Episode>,
}

impl ActiveProfileSnapshot {
    pub fn from_store(store: &EntityStore) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            profile_id: store.active_profile_id.clone(),
            shows: store.shows.table.to_vec(),
            movies: store.movies.table.to_vec(),
            episodes: store.episodes.to_vec(),
        }
    }
}

impl Snapshot for ActiveProfileSnapshot {
    fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn validate(&self) -> std::result::Result<(), String> {
        check_ids(self.shows.iter().map(|s| s.show_id), "show")?;
        check_ids(self.movies.iter().map(|m| m.movie_id), "movie")?;
        check_ids(self.episodes.iter().map(|e| e.episode_id), "episode")?;

        let Some(ref profile_id) = self.profile_id else {
            if self.shows.is_empty() && self.movies.is_empty() && self.episodes.is_empty() {
                return Ok(());
            }
            return Err("content cached without an active profile".to_string());
        };

        if let Some(show) = self.shows.iter().find(|s| &s.profile_id != profile_id) {
            return Err(format!("show {} belongs to profile {}", show.show_id, show.profile_id));
        }
        if let Some(movie) = self.movies.iter().find(|m| &m.profile_id != profile_id) {
            return Err(format!("movie {} belongs to profile {}", movie.movie_id, movie.profile_id));
        }

        let show_ids: HashSet<u64> = self.shows.iter().map(|s| s.show_id).collect();
        if let Some(orphan) = self.episodes.iter().find(|e| !show_ids.contains(&e.show_id)) {
            return Err(format!(
                "episode {} references uncached show {}",
                orphan.episode_id, orphan.show_id
            ));
        }
        Ok(())
    }
}

fn check_ids<I, T>(ids: I, what: &str) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: std::hash::Hash + Eq + std::fmt::Display,
{
    let mut seen = HashSet::new();
    for id in ids {
        if seen.contains(&id) {
            return Err(format!("duplicate {} id {}", what, id));
        }
        seen.insert(id);
    }
    Ok(())
}

/// Typed, validating front for a [`Storage`] backend.
///
/// Storage failures never propagate: a failed write flips the adapter into
/// degraded mode and the cache carries on in memory.
pub struct Persistence {
    storage: Box<dyn Storage>,
    degraded: AtomicBool,
}

impl Persistence {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            storage,
            degraded: AtomicBool::new(false),
        }
    }

    /// True once any write has failed this session.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Serialize and write a snapshot.
    pub fn save<T: Snapshot>(&self, namespace: &str, data: &T) {
        let result = serde_json::to_string(data)
            .map_err(crate::Error::from)
            .and_then(|json| self.storage.save(namespace, &json));

        if let Err(e) = result {
            if !self.degraded.swap(true, Ordering::Relaxed) {
                tracing::warn!(
                    "Persisting '{}' failed, continuing in memory only: {}",
                    namespace,
                    e
                );
            } else {
                tracing::debug!("Persisting '{}' failed again: {}", namespace, e);
            }
        }
    }

    /// Read and validate a snapshot. Anything unreadable is a cache miss.
    pub fn load<T: Snapshot>(&self, namespace: &str) -> Option<T> {
        let raw = match self.storage.load(namespace) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Reading '{}' failed, starting empty: {}", namespace, e);
                return None;
            }
        };

        let snapshot: T = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Discarding '{}' snapshot with unexpected shape: {}", namespace, e);
                return None;
            }
        };

        if snapshot.schema_version() != SCHEMA_VERSION {
            tracing::warn!(
                "Discarding '{}' snapshot: schema version {} (expected {})",
                namespace,
                snapshot.schema_version(),
                SCHEMA_VERSION
            );
            return None;
        }

        if let Err(reason) = snapshot.validate() {
            tracing::warn!("Discarding invalid '{}' snapshot: {}", namespace, reason);
            return None;
        }

        Some(snapshot)
    }

    /// Remove a namespace.
    pub fn clear(&self, namespace: &str) {
        if let Err(e) = self.storage.clear(namespace) {
            tracing::warn!("Clearing '{}' failed: {}", namespace, e);
        }
    }

    pub fn save_profiles(&self, profiles: &EntityTable<Profile>) {
        self.save(PROFILES_NAMESPACE, &ProfilesSnapshot::new(profiles.to_vec()));
    }

    pub fn save_active_profile(&self, store: &EntityStore) {
        self.save(ACTIVE_PROFILE_NAMESPACE, &ActiveProfileSnapshot::from_store(store));
    }

    pub fn clear_all(&self) {
        self.clear(PROFILES_NAMESPACE);
        self.clear(ACTIVE_PROFILE_NAMESPACE);
    }

    /// Build the initial store from whatever snapshots survive validation.
    pub fn restore(&self) -> EntityStore {
        let mut store = EntityStore::new();

        if let Some(snapshot) = self.load::<ProfilesSnapshot>(PROFILES_NAMESPACE) {
            tracing::debug!("Recovered {} cached profiles", snapshot.profiles.len());
            store.profiles = Collection::seeded(snapshot.profiles);
        }

        if let Some(snapshot) = self.load::<ActiveProfileSnapshot>(ACTIVE_PROFILE_NAMESPACE) {
            tracing::debug!(
                "Recovered active profile {:?} with {} shows, {} movies",
                snapshot.profile_id,
                snapshot.shows.len(),
                snapshot.movies.len()
            );
            store.active_profile_id = snapshot.profile_id;
            store.shows = Collection::seeded(snapshot.shows);
            store.movies = Collection::seeded(snapshot.movies);
            store.episodes = EntityTable::from_entities(snapshot.episodes);
        }

        store
    }
}
