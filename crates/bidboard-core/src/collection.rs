//! Ordered collections unique by identity.
//!
//! [`Collection`] is the local source of truth for one entity family within a
//! session. It is immutable: every reconciliation returns a new collection,
//! built through the pure functions in [`crate::reconcile`].
//!
//! # Invariants
//!
//! - No two elements share an identity.
//! - Order is the remote's order for bulk fetches; created entities are
//!   prepended so the newest surfaces first.

use std::collections::HashSet;

use crate::{
    model::{Identified, Request},
    reconcile::{self, Reconciled},
};

/// Local collection of requests.
pub type RequestCollection = Collection<Request>;

/// Ordered sequence of entities, unique by identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified + Clone> Collection<T> {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection from a remote bulk fetch.
    ///
    /// Keeps the first occurrence of any repeated identity.
    pub fn from_remote(items: Vec<T>) -> Self {
        let total = items.len();
        let mut seen = HashSet::with_capacity(total);
        let items: Vec<T> =
            items.into_iter().filter(|item| seen.insert(item.id().clone())).collect();

        if items.len() < total {
            tracing::warn!(
                dropped = total - items.len(),
                "remote returned duplicate identities, keeping first occurrence"
            );
        }

        Self { items }
    }

    /// Element by identity. `None` if not tracked.
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        reconcile::find_by_identity(&self.items, id)
    }

    /// Whether an element with this identity is tracked.
    pub fn contains(&self, id: &T::Id) -> bool {
        self.get(id).is_some()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume into the underlying sequence.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// New collection with `created` first.
    ///
    /// An element already tracked under the same identity is superseded;
    /// `matched` counts superseded elements and is zero in the normal case.
    pub fn prepend(&self, created: T) -> Reconciled<Self> {
        let remaining = reconcile::remove_by_identity(&self.items, created.id());
        let matched = remaining.matched;
        let items = reconcile::prepend(&remaining.value, created);

        Reconciled { value: Self { items }, matched }
    }

    /// New collection with `updated` substituted for its tracked version.
    pub fn replace(&self, updated: T) -> Reconciled<Self> {
        reconcile::replace_by_identity(&self.items, updated).map(|items| Self { items })
    }

    /// New collection without `id`.
    pub fn remove(&self, id: &T::Id) -> Reconciled<Self> {
        reconcile::remove_by_identity(&self.items, id).map(|items| Self { items })
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
