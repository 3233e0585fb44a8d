//! Application errors.
//!
//! Remote failures pass through unchanged; the remaining variants are local
//! precondition failures detected before any remote call is issued.

use bidboard_core::{RemoteError, RequestId};
use thiserror::Error;

/// Errors returned by [`crate::Session`] and [`crate::App`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Remote call failed; local state is unchanged
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Bid operation names a request the session does not track
    #[error("request {0} is not tracked by this session")]
    UnknownRequest(RequestId),

    /// Operation needs an authenticated viewer
    #[error("no authenticated viewer")]
    Unauthenticated,
}

impl AppError {
    /// Returns true if repeating the operation may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Remote(err) => err.is_transient(),
            Self::UnknownRequest(_) | Self::Unauthenticated => false,
        }
    }
}
