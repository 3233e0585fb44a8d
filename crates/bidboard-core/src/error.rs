//! Remote facade errors.
//!
//! The application layer does not branch on these beyond presenting them: a
//! failed remote call leaves local state untouched and the error goes back
//! to the caller as-is. The variants exist so facades can report what
//! happened and callers can decide about retries.

use std::{fmt, io};

use thiserror::Error;

use crate::model::EntityKind;

/// Errors reported by a [`crate::Remote`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Network failure before a response arrived
    #[error("transport error: {0}")]
    Transport(String),

    /// Remote refused the submitted data
    #[error("rejected: {0}")]
    Rejected(String),

    /// Caller lacks permission for the operation
    #[error("unauthorized")]
    Unauthorized,

    /// Target entity does not exist on the remote
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity family
        kind: EntityKind,
        /// Raw identity that was looked up
        id: String,
    },

    /// Remote is temporarily unable to serve
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl RemoteError {
    /// Shorthand for [`RemoteError::NotFound`].
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound { kind, id: id.to_string() }
    }

    /// Returns true if this error is transient and may succeed on retry.
    ///
    /// Rejections, authorization failures and missing entities are never
    /// transient; repeating the call will fail the same way.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Unavailable(_))
    }
}

/// Convert `io::Error` to `RemoteError` (for transport errors)
impl From<io::Error> for RemoteError {
    fn from(err: io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_are_transient() {
        assert!(RemoteError::Transport("reset".to_string()).is_transient());
        assert!(RemoteError::Unavailable("maintenance".to_string()).is_transient());
        assert!(RemoteError::from(io::Error::other("broken pipe")).is_transient());
    }

    #[test]
    fn refusals_are_fatal() {
        assert!(!RemoteError::Rejected("title required".to_string()).is_transient());
        assert!(!RemoteError::Unauthorized.is_transient());
        assert!(!RemoteError::not_found(EntityKind::Bid, "b1").is_transient());
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(
            RemoteError::not_found(EntityKind::Request, "r7").to_string(),
            "request r7 not found"
        );
    }
}
