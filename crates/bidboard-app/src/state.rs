//! Observable collection state.
//!
//! [`SharedCollection`] holds the current [`Collection`] of one entity family
//! and publishes every new value through a `tokio::sync::watch` channel, so
//! views can subscribe and recompute when (and only when) a reconciliation
//! actually changed something.
//!
//! Updates run as a single synchronous closure over the current value. An
//! async operation therefore reads the collection it merges into at merge
//! time, never a copy captured before its remote call suspended.
//!
//! Every published change bumps a generation counter. A bulk fetch records
//! the generation before it suspends and commits with
//! [`SharedCollection::replace_if_unchanged`], so a merge that landed while
//! the fetch was in flight is never overwritten by the older fetch result.

use std::sync::atomic::{AtomicU64, Ordering};

use bidboard_core::{Collection, Identified, Reconciled};
use tokio::sync::watch;

/// Watchable, atomically updated collection.
#[derive(Debug)]
pub struct SharedCollection<T> {
    tx: watch::Sender<Collection<T>>,
    generation: AtomicU64,
}

impl<T: Identified + Clone + PartialEq> SharedCollection<T> {
    /// Shared collection starting from `initial`.
    pub fn new(initial: Collection<T>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx, generation: AtomicU64::new(0) }
    }

    /// Number of changes published so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Copy of the current collection.
    pub fn snapshot(&self) -> Collection<T> {
        self.tx.borrow().clone()
    }

    /// Subscribe to future values.
    pub fn subscribe(&self) -> watch::Receiver<Collection<T>> {
        self.tx.subscribe()
    }

    /// Copy of the element `id`. `None` if not tracked.
    pub fn get(&self, id: &T::Id) -> Option<T> {
        self.tx.borrow().get(id).cloned()
    }

    /// Whether `id` is tracked.
    pub fn contains(&self, id: &T::Id) -> bool {
        self.tx.borrow().contains(id)
    }

    /// Replace the whole collection (bulk fetch).
    pub fn replace_all(&self, collection: Collection<T>) {
        self.tx.send_replace(collection);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Replace the whole collection unless it changed since `seen`.
    ///
    /// Returns whether the collection was replaced.
    pub fn replace_if_unchanged(&self, collection: Collection<T>, seen: u64) -> bool {
        let mut replaced = false;
        self.tx.send_if_modified(|current| {
            if self.generation.load(Ordering::Acquire) != seen {
                return false;
            }
            replaced = true;
            self.generation.fetch_add(1, Ordering::AcqRel);
            let changed = *current != collection;
            *current = collection;
            changed
        });
        replaced
    }

    /// Apply one reconciliation step to the current collection.
    ///
    /// Subscribers are notified only if the step produced a different
    /// collection. Returns the step's match count.
    pub fn apply<F>(&self, step: F) -> usize
    where
        F: FnOnce(&Collection<T>) -> Reconciled<Collection<T>>,
    {
        let mut matched = 0;
        self.tx.send_if_modified(|current| {
            let reconciled = step(current);
            matched = reconciled.matched;
            if reconciled.value == *current {
                return false;
            }
            self.generation.fetch_add(1, Ordering::AcqRel);
            *current = reconciled.value;
            true
        });
        matched
    }
}

#[cfg(test)]
mod tests {
    use bidboard_core::{Request, RequestId};

    use super::*;

    fn shared(ids: &[&str]) -> SharedCollection<Request> {
        SharedCollection::new(Collection::from_remote(
            ids.iter().map(|id| Request::new(*id)).collect(),
        ))
    }

    #[test]
    fn apply_publishes_changes() {
        let requests = shared(&["r1"]);
        let mut rx = requests.subscribe();

        let matched = requests.apply(|c| c.prepend(Request::new("r2")));

        assert_eq!(matched, 0);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 2);
    }

    #[test]
    fn unmatched_step_does_not_notify() {
        let requests = shared(&["r1"]);
        let rx = requests.subscribe();

        let matched = requests.apply(|c| c.remove(&RequestId::new("r9")));

        assert_eq!(matched, 0);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(requests.snapshot().len(), 1);
    }

    #[test]
    fn identical_result_does_not_notify() {
        let requests = shared(&["r1", "r2"]);
        let rx = requests.subscribe();

        let matched = requests.apply(|c| c.replace(Request::new("r2")));

        assert_eq!(matched, 1);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(requests.generation(), 0);
    }

    #[test]
    fn merge_after_seen_generation_blocks_replace() {
        let requests = shared(&["r1"]);
        let seen = requests.generation();
        requests.apply(|c| c.prepend(Request::new("r2")));

        let replaced =
            requests.replace_if_unchanged(Collection::from_remote(vec![Request::new("r1")]), seen);

        assert!(!replaced);
        assert_eq!(requests.snapshot().len(), 2);
    }

    #[test]
    fn unchanged_generation_allows_replace() {
        let requests = shared(&["r1"]);
        let seen = requests.generation();

        let replaced =
            requests.replace_if_unchanged(Collection::from_remote(vec![Request::new("r3")]), seen);

        assert!(replaced);
        assert!(requests.contains(&RequestId::new("r3")));
        assert_eq!(requests.generation(), seen + 1);
    }

    #[test]
    fn replace_all_swaps_contents() {
        let requests = shared(&["r1", "r2"]);

        requests.replace_all(Collection::from_remote(vec![Request::new("r3")]));

        assert!(requests.contains(&RequestId::new("r3")));
        assert!(requests.get(&RequestId::new("r1")).is_none());
    }
}
