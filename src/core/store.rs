//! Normalized entity store.
//!
//! Each entity type lives in its own keyed table. Tables keep insertion order
//! and apply the entity's comparator on read, so the same content always
//! reads back in the same order.

use crate::models::{AccountNotification, Episode, Movie, Profile, Show};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A record with a stable identity.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned {
    type Id: Clone + Eq + Hash + Ord + Debug + Display;

    fn id(&self) -> Self::Id;

    /// Read order. The default keeps insertion order.
    fn compare(_a: &Self, _b: &Self) -> Ordering {
        Ordering::Equal
    }
}

/// Keyed table of one entity type.
#[derive(Debug, Clone)]
pub struct EntityTable<E: Entity> {
    entities: HashMap<E::Id, E>,
    order: Vec<E::Id>,
}

impl<E: Entity> Default for EntityTable<E> {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<E: Entity> EntityTable<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a list, later duplicates replacing earlier ones.
    pub fn from_entities(entities: Vec<E>) -> Self {
        let mut table = Self::new();
        table.upsert_many(entities);
        table
    }

    /// Insert or fully replace an entity. A replaced entity keeps its position.
    pub fn upsert(&mut self, entity: E) {
        let id = entity.id();
        if self.entities.insert(id.clone(), entity).is_none() {
            self.order.push(id);
        }
    }

    pub fn upsert_many(&mut self, entities: impl IntoIterator<Item = E>) {
        for entity in entities {
            self.upsert(entity);
        }
    }

    /// Remove by id. Absent ids are ignored.
    pub fn remove(&mut self, id: &E::Id) -> Option<E> {
        let removed = self.entities.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    /// Remove every entity matching the predicate.
    pub fn remove_where(&mut self, predicate: impl Fn(&E) -> bool) -> usize {
        let doomed: Vec<E::Id> = self
            .entities
            .values()
            .filter(|e| predicate(e))
            .map(|e| e.id())
            .collect();
        for id in &doomed {
            self.remove(id);
        }
        doomed.len()
    }

    /// Replace the whole table. The new table is built first and swapped in.
    pub fn set_all(&mut self, entities: Vec<E>) {
        *self = Self::from_entities(entities);
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.order.clear();
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.entities.contains_key(id)
    }

    /// All entities in read order.
    pub fn all(&self) -> Vec<&E> {
        let mut all: Vec<&E> = self
            .order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .collect();
        all.sort_by(|a, b| E::compare(a, b));
        all
    }

    /// Owned copy of all entities in read order.
    pub fn to_vec(&self) -> Vec<E> {
        self.all().into_iter().cloned().collect()
    }

    pub fn ids(&self) -> Vec<E::Id> {
        self.all().into_iter().map(|e| e.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn find(&self, predicate: impl Fn(&E) -> bool) -> Option<&E> {
        self.order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .find(|e| predicate(e))
    }
}

/// Synchronization status of a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::Idle => write!(f, "idle"),
            SyncStatus::Pending => write!(f, "pending"),
            SyncStatus::Succeeded => write!(f, "succeeded"),
            SyncStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A table plus its status envelope.
#[derive(Debug, Clone)]
pub struct Collection<E: Entity> {
    pub table: EntityTable<E>,
    pub status: SyncStatus,
    pub error: Option<String>,
}

impl<E: Entity> Default for Collection<E> {
    fn default() -> Self {
        Self {
            table: EntityTable::new(),
            status: SyncStatus::Idle,
            error: None,
        }
    }
}

impl<E: Entity> Collection<E> {
    /// Seed a collection from a recovered snapshot.
    ///
    /// A non-empty snapshot starts out `Succeeded` so the fetch guard treats
    /// it as already loaded.
    pub fn seeded(entities: Vec<E>) -> Self {
        let table = EntityTable::from_entities(entities);
        let status = if table.is_empty() {
            SyncStatus::Idle
        } else {
            SyncStatus::Succeeded
        };
        Self {
            table,
            status,
            error: None,
        }
    }

    /// True when a fetch would be redundant: already synced at least once and holding records.
    pub fn is_populated(&self) -> bool {
        self.status != SyncStatus::Idle && !self.table.is_empty()
    }

    pub fn mark_pending(&mut self) {
        self.status = SyncStatus::Pending;
        self.error = None;
    }

    pub fn mark_succeeded(&mut self) {
        self.status = SyncStatus::Succeeded;
        self.error = None;
    }

    pub fn mark_failed(&mut self, message: &str) {
        self.status = SyncStatus::Failed;
        self.error = Some(message.to_string());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Which collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Profiles,
    Shows,
    Movies,
    SystemNotifications,
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionKind::Profiles => write!(f, "profiles"),
            CollectionKind::Shows => write!(f, "shows"),
            CollectionKind::Movies => write!(f, "movies"),
            CollectionKind::SystemNotifications => write!(f, "system notifications"),
        }
    }
}

/// All cached records for one account.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub profiles: Collection<Profile>,
    /// Profile whose favorites are cached in `shows`, `movies` and `episodes`.
    pub active_profile_id: Option<String>,
    pub shows: Collection<Show>,
    pub movies: Collection<Movie>,
    /// Episodes of cached shows; they share the shows envelope.
    pub episodes: EntityTable<Episode>,
    /// Account-wide announcements, never persisted.
    pub system_notifications: Collection<AccountNotification>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status and error of a collection.
    pub fn envelope(&self, kind: CollectionKind) -> (SyncStatus, Option<String>) {
        match kind {
            CollectionKind::Profiles => (self.profiles.status, self.profiles.error.clone()),
            CollectionKind::Shows => (self.shows.status, self.shows.error.clone()),
            CollectionKind::Movies => (self.movies.status, self.movies.error.clone()),
            CollectionKind::SystemNotifications => (
                self.system_notifications.status,
                self.system_notifications.error.clone(),
            ),
        }
    }

    pub fn is_populated(&self, kind: CollectionKind) -> bool {
        match kind {
            CollectionKind::Profiles => self.profiles.is_populated(),
            CollectionKind::Shows => self.shows.is_populated(),
            CollectionKind::Movies => self.movies.is_populated(),
            CollectionKind::SystemNotifications => self.system_notifications.is_populated(),
        }
    }

    pub fn mark_pending(&mut self, kind: CollectionKind) {
        match kind {
            CollectionKind::Profiles => self.profiles.mark_pending(),
            CollectionKind::Shows => self.shows.mark_pending(),
            CollectionKind::Movies => self.movies.mark_pending(),
            CollectionKind::SystemNotifications => self.system_notifications.mark_pending(),
        }
    }

    pub fn mark_succeeded(&mut self, kind: CollectionKind) {
        match kind {
            CollectionKind::Profiles => self.profiles.mark_succeeded(),
            CollectionKind::Shows => self.shows.mark_succeeded(),
            CollectionKind::Movies => self.movies.mark_succeeded(),
            CollectionKind::SystemNotifications => self.system_notifications.mark_succeeded(),
        }
    }

    pub fn mark_failed(&mut self, kind: CollectionKind, message: &str) {
        match kind {
            CollectionKind::Profiles => self.profiles.mark_failed(message),
            CollectionKind::Shows => self.shows.mark_failed(message),
            CollectionKind::Movies => self.movies.mark_failed(message),
            CollectionKind::SystemNotifications => self.system_notifications.mark_failed(message),
        }
    }

    /// Remove a show together with its episodes.
    pub fn remove_show(&mut self, show_id: u64) -> Option<Show> {
        self.episodes.remove_where(|e| e.show_id == show_id);
        self.shows.table.remove(&show_id)
    }

    /// Replace shows and episodes in one step.
    pub fn set_shows(&mut self, shows: Vec<Show>, episodes: Vec<Episode>) {
        self.shows.table.set_all(shows);
        self.episodes.set_all(episodes);
    }

    /// Drop the active profile's content.
    pub fn clear_active_content(&mut self) {
        self.shows.reset();
        self.movies.reset();
        self.episodes.clear();
    }

    pub fn show_by_tmdb_id(&self, tmdb_id: u64) -> Option<&Show> {
        self.shows.table.find(|s| s.tmdb_id == tmdb_id)
    }

    pub fn movie_by_tmdb_id(&self, tmdb_id: u64) -> Option<&Movie> {
        self.movies.table.find(|m| m.tmdb_id == tmdb_id)
    }

    pub fn episodes_for_show(&self, show_id: u64) -> Vec<&Episode> {
        self.episodes
            .all()
            .into_iter()
            .filter(|e| e.show_id == show_id)
            .collect()
    }

    /// Every collection back to its initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
