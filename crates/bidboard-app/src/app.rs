//! Application state machine.
//!
//! [`App`] owns the optional [`Session`] of the authenticated viewer and the
//! public workshop catalogue. It consumes [`Intent`]s and produces
//! [`AppAction`]s for the runtime to execute; it never renders or navigates
//! itself.
//!
//! # Responsibilities
//!
//! - Builds a session on login and drops it on logout.
//! - Guards protected routes: without a viewer they resolve to the login page.
//! - Applies the configured [`DriftPolicy`] after each mutation.

use bidboard_core::{Collection, EntityKind, Form, Remote, Route, Viewer, Workshop, WorkshopId};
use tokio::sync::watch;

use crate::{
    AppAction, AppConfig, AppError, DriftPolicy, Intent, Session, SharedCollection,
    session::settle,
};

/// Application state machine.
pub struct App<R: Remote> {
    remote: R,
    config: AppConfig,
    /// Public catalogue, visible with or without a session.
    workshops: SharedCollection<Workshop>,
    /// `None` while nobody is logged in.
    session: Option<Session<R>>,
}

impl<R: Remote> App<R> {
    /// Create an App with no session and an empty workshop catalogue.
    pub fn new(remote: R, config: AppConfig) -> Self {
        Self {
            remote,
            config,
            workshops: SharedCollection::new(Collection::new()),
            session: None,
        }
    }

    /// Load state that does not depend on a viewer.
    pub async fn start(&mut self) -> Result<Vec<AppAction>, AppError> {
        if self.config.fetch_workshops_on_start {
            self.refresh_workshops().await?;
        }
        Ok(vec![AppAction::Render])
    }

    /// Process an intent and return actions.
    pub async fn handle(&mut self, intent: Intent) -> Result<Vec<AppAction>, AppError> {
        let actions = match intent {
            Intent::Quit => return Ok(vec![AppAction::Quit]),
            Intent::Login(viewer) => return self.login(viewer).await,
            Intent::Logout => return Ok(self.logout()),
            Intent::Visit(route) => {
                return Ok(vec![AppAction::Navigate(self.guard(route)), AppAction::Render]);
            },
            Intent::Refresh => return self.refresh().await,

            Intent::CreateRequest(form) => self.session()?.create_request(form).await?,
            Intent::UpdateRequest(update) => self.session()?.update_request(update).await?,
            Intent::DeleteRequest(id) => self.session()?.delete_request(&id).await?,
            Intent::CreateBid { request_id, form } => {
                self.session()?.create_bid(&request_id, form).await?
            },
            Intent::DeleteBid { request_id, bid_id } => {
                self.session()?.delete_bid(&request_id, &bid_id).await?
            },
            Intent::UpdateProfile(update) => self.session()?.update_profile(update).await?,
            Intent::UpdateVenue(update) => self.session()?.update_venue(update).await?,
            Intent::CreateWorkshop(form) => self.create_workshop(form).await?,
            Intent::DeleteWorkshop(id) => self.delete_workshop(&id).await?,
        };

        if self.config.drift_policy == DriftPolicy::Refetch
            && actions.iter().any(AppAction::is_drift)
            && let Some(session) = &self.session
            && let Err(err) = session.refresh().await
        {
            tracing::warn!(error = %err, "refetch after drift failed");
        }

        Ok(actions)
    }

    /// Replace any existing session with one for `viewer`.
    ///
    /// The previous session is dropped before the new one is fetched, so a
    /// failed login leaves nobody logged in.
    pub async fn login(&mut self, viewer: Viewer) -> Result<Vec<AppAction>, AppError> {
        if let Some(previous) = self.session.take() {
            tracing::info!(viewer = %previous.viewer().id, "replacing session");
        }

        let session = Session::establish(self.remote.clone(), viewer).await?;
        self.session = Some(session);
        Ok(vec![AppAction::Render])
    }

    /// Drop the session and go to the landing page.
    pub fn logout(&mut self) -> Vec<AppAction> {
        if let Some(session) = self.session.take() {
            tracing::info!(viewer = %session.viewer().id, "logged out");
        }
        vec![AppAction::Navigate(Route::Landing), AppAction::Render]
    }

    /// Active session.
    ///
    /// # Errors
    ///
    /// [`AppError::Unauthenticated`] if nobody is logged in.
    pub fn session(&self) -> Result<&Session<R>, AppError> {
        self.session.as_ref().ok_or(AppError::Unauthenticated)
    }

    /// Authenticated viewer. `None` if nobody is logged in.
    pub fn viewer(&self) -> Option<&Viewer> {
        self.session.as_ref().map(Session::viewer)
    }

    /// App configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current workshop catalogue.
    pub fn workshops(&self) -> Collection<Workshop> {
        self.workshops.snapshot()
    }

    /// Subscribe to workshop catalogue changes.
    pub fn subscribe_workshops(&self) -> watch::Receiver<Collection<Workshop>> {
        self.workshops.subscribe()
    }

    /// Route actually shown for `route`.
    ///
    /// Protected routes resolve to [`Route::Login`] while nobody is logged in.
    pub fn guard(&self, route: Route) -> Route {
        if route.requires_viewer() && self.session.is_none() {
            tracing::debug!(%route, "protected route without viewer");
            Route::Login
        } else {
            route
        }
    }

    /// Create a workshop; it becomes the first catalogue entry.
    pub async fn create_workshop(&self, form: Form) -> Result<Vec<AppAction>, AppError> {
        self.session()?;

        let created = self.remote.create_workshop(form).await?;
        let id = created.id.clone();

        tracing::debug!(workshop = %id, "workshop created");

        let superseded = self.workshops.apply(|workshops| workshops.prepend(created));
        Ok(settle(EntityKind::Workshop, &id, superseded > 0, Route::Workshops))
    }

    /// Delete a workshop and drop it from the catalogue.
    pub async fn delete_workshop(&self, id: &WorkshopId) -> Result<Vec<AppAction>, AppError> {
        self.session()?;

        let deleted = self.remote.delete_workshop(id).await?;

        tracing::debug!(workshop = %deleted, "workshop deleted");

        let matched = self.workshops.apply(|workshops| workshops.remove(&deleted));
        Ok(settle(EntityKind::Workshop, &deleted, matched == 0, Route::Workshops))
    }

    async fn refresh(&self) -> Result<Vec<AppAction>, AppError> {
        self.refresh_workshops().await?;
        match &self.session {
            Some(session) => session.refresh().await,
            None => Ok(vec![AppAction::Render]),
        }
    }

    async fn refresh_workshops(&self) -> Result<(), AppError> {
        let workshops = self.remote.fetch_workshops().await?;
        tracing::debug!(count = workshops.len(), "workshops fetched");
        self.workshops.replace_all(Collection::from_remote(workshops));
        Ok(())
    }
}
