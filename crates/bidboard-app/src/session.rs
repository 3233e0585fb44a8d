//! Request/bid lifecycle management.
//!
//! A [`Session`] is the state of one authenticated viewer: the requests the
//! viewer may see (each with its bids), profiles and venues. It is built when
//! the viewer logs in and dropped when they log out; nothing outlives it.
//!
//! # Consistency
//!
//! Every mutation is remote-confirmed, then reconciled, then followed by a
//! navigation action:
//!
//! 1. Call the remote. On failure return the error; local state is untouched
//!    and no action is produced.
//! 2. Merge the entity the remote returned into the current local collection
//!    in one synchronous step (see [`SharedCollection::apply`]).
//! 3. Return `[Drift?, Navigate, Render]`.
//!
//! Operations take `&self`, so several may be in flight on one session and
//! resolve in any order. Bid merges re-read the owning request at merge time
//! rather than reusing the request seen before the remote call, so a
//! concurrent update of the same request is never overwritten with stale
//! data. Request-level updates are last-writer-wins.

use std::fmt;

use bidboard_core::{
    BidId, Collection, EntityKind, FetchScope, Form, Profile, ProfileId, Reconciled, Remote,
    RemoteError, Request, RequestCollection, RequestId, Route, Update, Venue, VenueId, Viewer,
};
use tokio::sync::watch;

use crate::{AppAction, AppError, SharedCollection};

/// Bulk fetches a refresh issues before giving up on a moving collection.
pub const REFRESH_ATTEMPTS: usize = 3;

/// Collections fetched for a viewer.
struct Fetched {
    requests: RequestCollection,
    profiles: Collection<Profile>,
    venues: Collection<Venue>,
}

/// State of one authenticated viewer.
pub struct Session<R: Remote> {
    remote: R,
    viewer: Viewer,
    requests: SharedCollection<Request>,
    profiles: SharedCollection<Profile>,
    venues: SharedCollection<Venue>,
}

impl<R: Remote> Session<R> {
    /// Establish a session for `viewer`.
    ///
    /// Requests are fetched according to the viewer's role: everything for
    /// admins, only their own for everyone else. Requests, profiles and venues
    /// are fetched concurrently; any failure fails the whole session.
    pub async fn establish(remote: R, viewer: Viewer) -> Result<Self, AppError> {
        let fetched = fetch_scoped(&remote, &viewer).await?;

        tracing::info!(
            viewer = %viewer.id,
            scope = ?viewer.fetch_scope(),
            requests = fetched.requests.len(),
            "session established"
        );

        Ok(Self {
            remote,
            viewer,
            requests: SharedCollection::new(fetched.requests),
            profiles: SharedCollection::new(fetched.profiles),
            venues: SharedCollection::new(fetched.venues),
        })
    }

    /// Authenticated viewer.
    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Current requests.
    pub fn requests(&self) -> RequestCollection {
        self.requests.snapshot()
    }

    /// Current state of one request. `None` if not tracked.
    pub fn request(&self, id: &RequestId) -> Option<Request> {
        self.requests.get(id)
    }

    /// Subscribe to request collection changes.
    pub fn subscribe_requests(&self) -> watch::Receiver<RequestCollection> {
        self.requests.subscribe()
    }

    /// Current profiles.
    pub fn profiles(&self) -> Collection<Profile> {
        self.profiles.snapshot()
    }

    /// Subscribe to profile collection changes.
    pub fn subscribe_profiles(&self) -> watch::Receiver<Collection<Profile>> {
        self.profiles.subscribe()
    }

    /// Current venues.
    pub fn venues(&self) -> Collection<Venue> {
        self.venues.snapshot()
    }

    /// Subscribe to venue collection changes.
    pub fn subscribe_venues(&self) -> watch::Receiver<Collection<Venue>> {
        self.venues.subscribe()
    }

    /// Re-fetch every collection and replace local state wholesale.
    ///
    /// A collection that some mutation merged into while the fetch was in
    /// flight is not overwritten; the fetch is repeated instead, up to
    /// [`REFRESH_ATTEMPTS`] times. Collections still moving after that keep
    /// their local state and are reported as [`AppAction::Drift`] with the
    /// viewer's identity.
    pub async fn refresh(&self) -> Result<Vec<AppAction>, AppError> {
        let mut stale = vec![EntityKind::Request, EntityKind::Profile, EntityKind::Venue];

        for attempt in 1..=REFRESH_ATTEMPTS {
            let seen = (
                self.requests.generation(),
                self.profiles.generation(),
                self.venues.generation(),
            );
            let fetched = fetch_scoped(&self.remote, &self.viewer).await?;

            stale.retain(|kind| match kind {
                EntityKind::Request => {
                    !self.requests.replace_if_unchanged(fetched.requests.clone(), seen.0)
                },
                EntityKind::Profile => {
                    !self.profiles.replace_if_unchanged(fetched.profiles.clone(), seen.1)
                },
                EntityKind::Venue => {
                    !self.venues.replace_if_unchanged(fetched.venues.clone(), seen.2)
                },
                _ => false,
            });

            tracing::debug!(
                viewer = %self.viewer.id,
                attempt,
                requests = fetched.requests.len(),
                stale = stale.len(),
                "refreshed"
            );

            if stale.is_empty() {
                return Ok(vec![AppAction::Render]);
            }
        }

        let mut actions = Vec::with_capacity(stale.len() + 1);
        for kind in stale {
            tracing::warn!(%kind, viewer = %self.viewer.id, "refresh outpaced by merges");
            actions.push(AppAction::Drift { kind, id: self.viewer.id.to_string() });
        }
        actions.push(AppAction::Render);
        Ok(actions)
    }

    /// Create a request; it becomes the first local request.
    pub async fn create_request(&self, form: Form) -> Result<Vec<AppAction>, AppError> {
        let created = self.remote.create_request(&self.viewer.id, form).await?;
        let id = created.id.clone();

        tracing::debug!(request = %id, "request created");

        let superseded = self.requests.apply(|requests| requests.prepend(created));
        Ok(settle(EntityKind::Request, &id, superseded > 0, Route::Requests))
    }

    /// Update a request and replace its local version.
    pub async fn update_request(
        &self,
        update: Update<RequestId>,
    ) -> Result<Vec<AppAction>, AppError> {
        let updated = self.remote.update_request(update).await?;
        let id = updated.id.clone();

        tracing::debug!(request = %id, "request updated");

        let matched = self.requests.apply(|requests| requests.replace(updated));
        Ok(settle(EntityKind::Request, &id, matched == 0, Route::Requests))
    }

    /// Delete a request and drop it locally.
    ///
    /// The local entry removed is the one the remote reports as deleted.
    pub async fn delete_request(&self, id: &RequestId) -> Result<Vec<AppAction>, AppError> {
        let deleted = self.remote.delete_request(id).await?;

        tracing::debug!(request = %deleted, "request deleted");

        let matched = self.requests.apply(|requests| requests.remove(&deleted));
        Ok(settle(EntityKind::Request, &deleted, matched == 0, Route::Requests))
    }

    /// Submit a bid; it becomes the request's newest bid.
    ///
    /// The request must be tracked locally, otherwise
    /// [`AppError::UnknownRequest`] is returned without calling the remote.
    pub async fn create_bid(
        &self,
        request_id: &RequestId,
        form: Form,
    ) -> Result<Vec<AppAction>, AppError> {
        self.ensure_tracked(request_id)?;

        let bid = self.remote.create_bid(request_id, form).await?;

        tracing::debug!(request = %request_id, bid = %bid.id, "bid created");

        let matched = self.requests.apply(|requests| match requests.get(request_id) {
            Some(current) => requests.replace(current.prepend_bid(bid)),
            None => Reconciled::missing(requests.clone()),
        });
        Ok(settle(EntityKind::Request, request_id, matched == 0, Route::Requests))
    }

    /// Withdraw a bid and drop it from its local request.
    ///
    /// Same precondition as [`Session::create_bid`].
    pub async fn delete_bid(
        &self,
        request_id: &RequestId,
        bid_id: &BidId,
    ) -> Result<Vec<AppAction>, AppError> {
        self.ensure_tracked(request_id)?;

        let deleted = self.remote.delete_bid(request_id, bid_id).await?;

        tracing::debug!(request = %request_id, bid = %deleted, "bid deleted");

        let mut bid_found = false;
        let matched = self.requests.apply(|requests| match requests.get(request_id) {
            Some(current) => {
                let pruned = current.remove_bid(&deleted);
                bid_found = pruned.found();
                requests.replace(pruned.value)
            },
            None => Reconciled::missing(requests.clone()),
        });

        if matched == 0 {
            return Ok(settle(EntityKind::Request, request_id, true, Route::Requests));
        }
        Ok(settle(EntityKind::Bid, &deleted, !bid_found, Route::Requests))
    }

    /// Update a profile and show it.
    pub async fn update_profile(
        &self,
        update: Update<ProfileId>,
    ) -> Result<Vec<AppAction>, AppError> {
        let updated = self.remote.update_profile(update).await?;
        let id = updated.id.clone();

        tracing::debug!(profile = %id, "profile updated");

        let matched = self.profiles.apply(|profiles| profiles.replace(updated));
        Ok(settle(EntityKind::Profile, &id, matched == 0, Route::Profile(id.clone())))
    }

    /// Update a venue and show the venue list.
    pub async fn update_venue(&self, update: Update<VenueId>) -> Result<Vec<AppAction>, AppError> {
        let updated = self.remote.update_venue(update).await?;
        let id = updated.id.clone();

        tracing::debug!(venue = %id, "venue updated");

        let matched = self.venues.apply(|venues| venues.replace(updated));
        Ok(settle(EntityKind::Venue, &id, matched == 0, Route::Venues))
    }

    fn ensure_tracked(&self, request_id: &RequestId) -> Result<(), AppError> {
        if self.requests.contains(request_id) {
            Ok(())
        } else {
            Err(AppError::UnknownRequest(request_id.clone()))
        }
    }
}

/// Fetch the collections `viewer` may see.
async fn fetch_scoped<R: Remote>(remote: &R, viewer: &Viewer) -> Result<Fetched, RemoteError> {
    let requests = async {
        match viewer.fetch_scope() {
            FetchScope::All => remote.fetch_all_requests().await,
            FetchScope::Own => remote.fetch_my_requests(&viewer.id).await,
        }
    };

    let (requests, profiles, venues) =
        tokio::try_join!(requests, remote.fetch_profiles(), remote.fetch_venues())?;

    Ok(Fetched {
        requests: Collection::from_remote(requests),
        profiles: Collection::from_remote(profiles),
        venues: Collection::from_remote(venues),
    })
}

/// Actions closing a successful mutation.
pub(crate) fn settle(
    kind: EntityKind,
    id: &impl fmt::Display,
    drifted: bool,
    route: Route,
) -> Vec<AppAction> {
    let mut actions = Vec::with_capacity(3);
    if drifted {
        tracing::warn!(%kind, %id, "remote-confirmed change had no local counterpart");
        actions.push(AppAction::Drift { kind, id: id.to_string() });
    }
    actions.push(AppAction::Navigate(route));
    actions.push(AppAction::Render);
    actions
}
