//! Single in-flight fetch guard per collection.

use super::store::CollectionKind;
use std::collections::HashMap;
use std::sync::Mutex;

/// Tracks which collections have a fetch in flight.
///
/// A second fetch for a held collection is dropped rather than queued.
#[derive(Debug, Default)]
pub struct FetchLatch {
    held: Mutex<Held>,
}

#[derive(Debug, Default)]
struct Held {
    tokens: HashMap<CollectionKind, u64>,
    next: u64,
}

/// Releases the latch for its collection when dropped.
#[derive(Debug)]
pub struct LatchGuard<'a> {
    latch: &'a FetchLatch,
    kind: CollectionKind,
    token: u64,
}

impl FetchLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the latch for `kind`, or `None` if a fetch is already in flight.
    pub fn try_acquire(&self, kind: CollectionKind) -> Option<LatchGuard<'_>> {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        if held.tokens.contains_key(&kind) {
            return None;
        }
        held.next += 1;
        let token = held.next;
        held.tokens.insert(kind, token);
        Some(LatchGuard {
            latch: self,
            kind,
            token,
        })
    }

    pub fn is_held(&self, kind: CollectionKind) -> bool {
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .tokens
            .contains_key(&kind)
    }

    /// Forget the latch for one collection. Its outstanding guard releases harmlessly.
    pub fn release(&self, kind: CollectionKind) {
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .tokens
            .remove(&kind);
    }

    /// Forget every held latch. Outstanding guards release harmlessly.
    pub fn release_all(&self) {
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .tokens
            .clear();
    }
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        let mut held = self.latch.held.lock().unwrap_or_else(|e| e.into_inner());
        // A guard from before `release_all` must not free a newer holder.
        if held.tokens.get(&self.kind) == Some(&self.token) {
            held.tokens.remove(&self.kind);
        }
    }
}
