//! Application side-effects.
//!
//! This module defines the [`AppAction`] enum: instructions produced by
//! [`crate::Session`] and [`crate::App`] after a successful operation, for
//! the runtime to execute in order.

use bidboard_core::{EntityKind, Route};

/// Actions produced by the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Move the user-facing view to a route.
    Navigate(Route),

    /// Local state could not take a remote-confirmed value.
    ///
    /// Either a confirmed change found no matching local entry, or a refresh
    /// kept gaining concurrent merges. The local collection was left as it
    /// was. Always precedes the operation's navigation or render.
    Drift {
        /// Entity family affected.
        kind: EntityKind,
        /// Raw identity that was not found locally, or the viewer whose
        /// refresh was abandoned.
        id: String,
    },
}

impl AppAction {
    /// Whether this action reports drift.
    pub fn is_drift(&self) -> bool {
        matches!(self, Self::Drift { .. })
    }
}
