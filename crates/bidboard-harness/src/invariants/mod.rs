//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold between operations.
//! Unlike example-based tests that check specific scenarios, invariants
//! verify behavioral properties across whole generated operation sequences.
//!
//! # Architecture
//!
//! The invariant system extracts observable state from the App and the
//! [`crate::MemoryRemote`] into a [`SystemSnapshot`], then runs registered
//! [`Invariant`] checks against it.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = SystemSnapshot::capture(&app, &remote);
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{LocalMatchesRemote, UniqueBidIds, UniqueRequestIds, WorkshopsKnownRemotely};
use serde::Serialize;
pub use snapshot::{RequestSnapshot, SystemSnapshot};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Identifies an invariant in violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InvariantKind {
    /// Request identities unique locally.
    UniqueRequestIds,
    /// Bid identities unique within each local request.
    UniqueBidIds,
    /// Session requests mirror the remote.
    LocalMatchesRemote,
    /// Workshop catalogue holds only remote workshops.
    WorkshopsKnownRemotely,
    /// Registered outside the standard set.
    Custom(&'static str),
}

impl fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(name) => f.write_str(name),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Invariant violation with context.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Violated invariant.
    pub invariant: InvariantKind,
    /// Description of what went wrong.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against system state.
pub trait Invariant: Send + Sync {
    /// Invariant identity for error reporting.
    fn kind(&self) -> InvariantKind;

    /// Check the invariant against the current state.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with the standard invariants.
    ///
    /// Includes:
    /// - [`UniqueRequestIds`]: no request held twice
    /// - [`UniqueBidIds`]: no bid held twice within a request
    /// - [`LocalMatchesRemote`]: session mirrors the remote
    /// - [`WorkshopsKnownRemotely`]: catalogue never invents workshops
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(UniqueRequestIds);
        registry.add(UniqueBidIds);
        registry.add(LocalMatchesRemote);
        registry.add(WorkshopsKnownRemotely);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given state.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
