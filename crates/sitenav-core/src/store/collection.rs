// ── Generic reactive entity collection ──
//
// Concurrent storage with O(1) lookups and push-based change
// notification via `watch` channels. Snapshots keep the order in which
// the backend listed the entities.

use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::watch;

/// A reactive collection for a single entity type.
///
/// Every mutation bumps a version counter and rebuilds the snapshot that
/// subscribers receive.
pub(crate) struct EntityCollection<K, T>
where
    K: Copy + Eq + Hash + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    /// Primary storage: id -> (insertion sequence, entity).
    by_key: DashMap<K, (u64, Arc<T>)>,

    /// Next insertion sequence number.
    next_seq: AtomicU64,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Ordered snapshot, rebuilt on mutation.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<K, T> EntityCollection<K, T>
where
    K: Copy + Eq + Hash + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_key: DashMap::new(),
            next_seq: AtomicU64::new(0),
            version,
            snapshot,
        }
    }

    /// Insert or update an entity. Returns `true` if the key was new.
    ///
    /// Updates keep the entity's original position.
    pub(crate) fn upsert(&self, key: K, entity: T) -> bool {
        let is_new = self.insert_quiet(key, Arc::new(entity));
        self.publish();
        is_new
    }

    /// Replace the whole collection with `entities`, in the given order.
    pub(crate) fn replace_all(&self, entities: impl IntoIterator<Item = (K, T)>) {
        self.by_key.clear();
        self.next_seq.store(0, Ordering::Relaxed);
        for (key, entity) in entities {
            self.insert_quiet(key, Arc::new(entity));
        }
        self.publish();
    }

    pub(crate) fn get(&self, key: &K) -> Option<Arc<T>> {
        self.by_key.get(key).map(|r| Arc::clone(&r.value().1))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn insert_quiet(&self, key: K, entity: Arc<T>) -> bool {
        if let Some(mut slot) = self.by_key.get_mut(&key) {
            slot.1 = entity;
            return false;
        }
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.by_key.insert(key, (seq, entity));
        true
    }

    /// Rebuild the ordered snapshot, broadcast it and bump the version.
    fn publish(&self) {
        let mut entries: Vec<(u64, Arc<T>)> = self
            .by_key
            .iter()
            .map(|r| (r.value().0, Arc::clone(&r.value().1)))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        let values: Vec<Arc<T>> = entries.into_iter().map(|(_, v)| v).collect();

        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item(&'static str);

    #[test]
    fn upsert_reports_new_keys() {
        let col: EntityCollection<i64, Item> = EntityCollection::new();
        assert!(col.upsert(1, Item("a")));
        assert!(!col.upsert(1, Item("b")));
        assert_eq!(col.len(), 1);
        assert_eq!(*col.get(&1).unwrap(), Item("b"));
    }

    #[test]
    fn snapshot_keeps_listing_order() {
        let col: EntityCollection<i64, Item> = EntityCollection::new();
        col.replace_all([(30, Item("c")), (10, Item("a")), (20, Item("b"))]);
        col.upsert(10, Item("a2"));

        let names: Vec<&str> = col.snapshot().iter().map(|i| i.0).collect();
        assert_eq!(names, vec!["c", "a2", "b"]);
    }

    #[test]
    fn replace_all_drops_missing_entries() {
        let col: EntityCollection<i64, Item> = EntityCollection::new();
        col.replace_all([(1, Item("a")), (2, Item("b"))]);
        col.replace_all([(2, Item("b"))]);
        assert_eq!(col.len(), 1);
        assert!(col.get(&1).is_none());
    }

    #[test]
    fn mutations_bump_version_and_notify() {
        let col: EntityCollection<i64, Item> = EntityCollection::new();
        let mut rx = col.subscribe();
        assert!(col.is_empty());

        col.upsert(1, Item("a"));
        assert_eq!(col.version(), 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
