//! Driver trait for abstracting user-facing I/O.
//!
//! The [`Driver`] trait decouples the [`crate::Runtime`] from the frontend
//! that produces intents and presents state. The same orchestration code runs
//! behind a real user interface and behind the scripted simulation driver.

use std::future::Future;

use bidboard_core::{Remote, Route};

use crate::{App, AppError, Intent};

/// Abstracts user-facing I/O for the application runtime.
///
/// # Implementations
///
/// - **Simulation**: replays a scripted intent sequence and records what the
///   runtime asked it to do
/// - **UI**: maps form submissions and links to intents, and navigation to
///   page changes
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next user intent.
    ///
    /// Returns `None` when the input source is exhausted.
    fn poll_intent<R: Remote>(
        &mut self,
        app: &App<R>,
    ) -> impl Future<Output = Result<Option<Intent>, Self::Error>> + Send;

    /// Show `route`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be shown.
    fn navigate(&mut self, route: &Route) -> Result<(), Self::Error>;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render<R: Remote>(&mut self, app: &App<R>) -> Result<(), Self::Error>;

    /// Present an operation failure to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the failure cannot be shown.
    fn present_error(&mut self, error: &AppError) -> Result<(), Self::Error>;

    /// Release frontend resources.
    fn stop(&mut self);
}
