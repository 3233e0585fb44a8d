//! Application configuration.

/// What the App does after an operation reports drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriftPolicy {
    /// Surface [`crate::AppAction::Drift`] and leave local state as is.
    #[default]
    Report,
    /// Surface the drift, then re-fetch the session's collections.
    Refetch,
}

/// App configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Reaction to drift between local and remote state.
    pub drift_policy: DriftPolicy,
    /// Fetch the public workshop catalogue in [`crate::App::start`].
    pub fetch_workshops_on_start: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { drift_policy: DriftPolicy::Report, fetch_workshops_on_start: true }
    }
}
