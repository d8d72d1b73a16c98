// ── Generic reactive record collection ──
//
// Ordered snapshot plus an O(1) id index, with push-based change
// notification via `watch` channels and a ticket guard that drops
// responses overtaken by a newer load or a local patch.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::{Record, RecordId};

/// Sequence number taken before a load request is issued.
///
/// A load result is only applied if no higher ticket has been applied in
/// the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct LoadTicket(u64);

/// A reactive collection for a single record type.
///
/// The snapshot keeps the order the store returned; the `DashMap` index
/// serves point lookups. Every applied mutation bumps a version counter
/// and republishes the snapshot to subscribers.
pub(crate) struct EntityCollection<T: Record> {
    /// Id -> record. Duplicate ids from the store resolve to the last one.
    by_id: DashMap<RecordId, Arc<T>>,

    /// Highest ticket handed out so far.
    issued: AtomicU64,

    /// Highest ticket whose result (or patch) has been applied. Held while
    /// mutating so apply order and ticket order agree.
    applied: Mutex<u64>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full ordered snapshot, rebuilt on mutation.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Record> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_id: DashMap::new(),
            issued: AtomicU64::new(0),
            applied: Mutex::new(0),
            version,
            snapshot,
        }
    }

    /// Take a ticket for a load that is about to be issued.
    pub(crate) fn begin_load(&self) -> LoadTicket {
        LoadTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replace the collection wholesale with a load result.
    ///
    /// Returns `false` (and changes nothing) when a newer ticket has
    /// already been applied.
    pub(crate) fn apply_load(&self, ticket: LoadTicket, items: Vec<T>) -> bool {
        let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
        if *applied > ticket.0 {
            return false;
        }
        *applied = ticket.0;
        self.replace_all(items);
        true
    }

    /// Drop one record locally. Counts as a mutation for the ticket guard,
    /// so loads issued before this call can no longer be applied.
    pub(crate) fn remove_local(&self, id: &RecordId) -> Option<Arc<T>> {
        let ticket = self.begin_load();
        let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
        *applied = (*applied).max(ticket.0);

        let removed = self.by_id.remove(id).map(|(_, v)| v);
        if removed.is_some() {
            let kept: Vec<Arc<T>> = self
                .snapshot
                .borrow()
                .iter()
                .filter(|r| r.record_id() != id)
                .cloned()
                .collect();
            self.publish(kept);
        }
        removed
    }

    pub(crate) fn get(&self, id: &RecordId) -> Option<Arc<T>> {
        self.by_id.get(id).map(|r| Arc::clone(r.value()))
    }

    pub(crate) fn contains(&self, id: &RecordId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Upsert every incoming record, then prune ids that are gone. Readers
    /// never observe a transiently empty index.
    fn replace_all(&self, items: Vec<T>) {
        let items: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        let incoming: HashSet<RecordId> = items.iter().map(|r| r.record_id().clone()).collect();

        for item in &items {
            self.by_id.insert(item.record_id().clone(), Arc::clone(item));
        }
        self.by_id.retain(|id, _| incoming.contains(id));

        self.publish(items);
    }

    fn publish(&self, values: Vec<Arc<T>>) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: RecordId,
        label: &'static str,
    }

    impl Record for Item {
        fn record_id(&self) -> &RecordId {
            &self.id
        }
    }

    fn item(id: &str, label: &'static str) -> Item {
        Item {
            id: RecordId::from(id),
            label,
        }
    }

    fn labels(col: &EntityCollection<Item>) -> Vec<&'static str> {
        col.snapshot().iter().map(|i| i.label).collect()
    }

    #[test]
    fn load_replaces_wholesale_and_keeps_store_order() {
        let col = EntityCollection::new();
        let t = col.begin_load();
        assert!(col.apply_load(t, vec![item("2", "b"), item("1", "a")]));
        assert_eq!(labels(&col), ["b", "a"]);

        let t = col.begin_load();
        assert!(col.apply_load(t, vec![item("3", "c")]));
        assert_eq!(labels(&col), ["c"]);
        assert!(col.get(&RecordId::from("1")).is_none());
        assert_eq!(col.get(&RecordId::from("3")).unwrap().label, "c");
        assert_eq!(col.len(), 1);
    }

    #[test]
    fn stale_load_is_discarded_after_newer_load() {
        let col = EntityCollection::new();
        let older = col.begin_load();
        let newer = col.begin_load();

        assert!(col.apply_load(newer, vec![item("1", "fresh")]));
        assert!(!col.apply_load(older, vec![item("1", "stale")]));
        assert_eq!(labels(&col), ["fresh"]);
    }

    #[test]
    fn load_issued_before_local_removal_cannot_resurrect() {
        let col = EntityCollection::new();
        let t = col.begin_load();
        col.apply_load(t, vec![item("1", "a"), item("2", "b")]);

        let in_flight = col.begin_load();
        assert!(col.remove_local(&RecordId::from("1")).is_some());
        assert!(!col.apply_load(in_flight, vec![item("1", "a"), item("2", "b")]));
        assert_eq!(labels(&col), ["b"]);

        let after = col.begin_load();
        assert!(col.apply_load(after, vec![item("2", "b")]));
    }

    #[test]
    fn remove_missing_id_changes_nothing() {
        let col = EntityCollection::new();
        let t = col.begin_load();
        col.apply_load(t, vec![item("1", "a")]);
        let version = col.version();

        assert!(col.remove_local(&RecordId::from("9")).is_none());
        assert_eq!(col.version(), version);
        assert!(col.contains(&RecordId::from("1")));
    }

    #[tokio::test]
    async fn subscribers_see_applied_snapshots() {
        let col = EntityCollection::new();
        let mut rx = col.subscribe();

        let t = col.begin_load();
        col.apply_load(t, vec![item("1", "a")]);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
