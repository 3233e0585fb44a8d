//! Identity-based reconciliation.
//!
//! Pure functions that merge a single remote-confirmed change into a local
//! ordered sequence. None of them mutate their input: each returns a fresh
//! sequence so observers can tell a new state from the old one.
//!
//! Replace and remove report how many elements matched. A match count of
//! zero means the local sequence had drifted from the remote (the entity was
//! never tracked, or a concurrent operation already removed it); the returned
//! sequence is then equal to the input and the caller decides what to do.

use crate::model::Identified;

/// Result of a reconciliation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled<T> {
    /// Reconciled value.
    pub value: T,
    /// Number of elements whose identity matched.
    pub matched: usize,
}

impl<T> Reconciled<T> {
    /// Result where nothing matched.
    pub fn missing(value: T) -> Self {
        Self { value, matched: 0 }
    }

    /// At least one element matched.
    pub fn found(&self) -> bool {
        self.matched > 0
    }

    /// No element matched.
    pub fn is_missing(&self) -> bool {
        self.matched == 0
    }

    /// Transform the value, keeping the match count.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reconciled<U> {
        Reconciled { value: f(self.value), matched: self.matched }
    }
}

/// Substitute `updated` for every element sharing its identity.
///
/// Order is preserved. With no match the result equals `items`.
pub fn replace_by_identity<T>(items: &[T], updated: T) -> Reconciled<Vec<T>>
where
    T: Identified + Clone,
{
    let mut matched = 0;
    let value = items
        .iter()
        .map(|item| {
            if item.id() == updated.id() {
                matched += 1;
                updated.clone()
            } else {
                item.clone()
            }
        })
        .collect();

    Reconciled { value, matched }
}

/// Drop every element whose identity is `id`.
///
/// Relative order of the remaining elements is preserved. Applying the same
/// removal twice is a no-op the second time.
pub fn remove_by_identity<T>(items: &[T], id: &T::Id) -> Reconciled<Vec<T>>
where
    T: Identified + Clone,
{
    let value: Vec<T> = items.iter().filter(|item| item.id() != id).cloned().collect();
    let matched = items.len() - value.len();

    Reconciled { value, matched }
}

/// `[created, ...items]`.
pub fn prepend<T: Clone>(items: &[T], created: T) -> Vec<T> {
    let mut value = Vec::with_capacity(items.len() + 1);
    value.push(created);
    value.extend_from_slice(items);
    value
}

/// First element whose identity is `id`.
pub fn find_by_identity<'a, T: Identified>(items: &'a [T], id: &T::Id) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}
