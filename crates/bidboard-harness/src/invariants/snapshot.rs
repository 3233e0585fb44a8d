//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the local state of an [`App`] next to the state of the
//! [`MemoryRemote`] behind it. Invariants operate on snapshots rather than
//! live state so every check sees one consistent moment.

use bidboard_app::App;
use bidboard_core::{Fields, Remote, Request, Workshop};
use serde::Serialize;

use crate::MemoryRemote;

/// Snapshot of the whole system: one client and its remote.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemSnapshot {
    /// Authenticated viewer. `None` without a session.
    pub viewer: Option<String>,
    /// Requests held by the session. Empty without a session.
    pub local_requests: Vec<RequestSnapshot>,
    /// Remote requests the viewer may see. Empty without a session.
    pub remote_requests: Vec<RequestSnapshot>,
    /// Workshop identities held by the App, in order.
    pub local_workshops: Vec<String>,
    /// Workshop identities on the remote, in order.
    pub remote_workshops: Vec<String>,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no session, no workshops).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture `app` and the remote it talks to.
    pub fn capture<R: Remote>(app: &App<R>, remote: &MemoryRemote) -> Self {
        let mut snapshot = Self {
            local_workshops: workshop_ids(app.workshops().iter()),
            remote_workshops: workshop_ids(remote.workshops().iter()),
            ..Self::default()
        };

        if let Ok(session) = app.session() {
            let viewer = session.viewer();
            snapshot.viewer = Some(viewer.id.to_string());
            snapshot.local_requests =
                session.requests().iter().map(RequestSnapshot::from).collect();
            snapshot.remote_requests =
                remote.requests_visible_to(viewer).iter().map(RequestSnapshot::from).collect();
        }

        snapshot
    }
}

fn workshop_ids<'a>(workshops: impl Iterator<Item = &'a Workshop>) -> Vec<String> {
    workshops.map(|workshop| workshop.id.to_string()).collect()
}

/// Snapshot of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestSnapshot {
    /// Request identity.
    pub id: String,
    /// Bid identities, newest first.
    pub bids: Vec<String>,
    /// Rendered `key=value` fields, sorted by key.
    pub fields: Vec<String>,
}

impl RequestSnapshot {
    /// Create a request snapshot with no bids or fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    /// Set bid identities.
    #[must_use]
    pub fn with_bids<S: Into<String>>(mut self, bids: impl IntoIterator<Item = S>) -> Self {
        self.bids = bids.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&Request> for RequestSnapshot {
    fn from(request: &Request) -> Self {
        Self {
            id: request.id.to_string(),
            bids: request.bids.iter().map(|bid| bid.id.to_string()).collect(),
            fields: render_fields(&request.fields),
        }
    }
}

fn render_fields(fields: &Fields) -> Vec<String> {
    fields.iter().map(|(key, value)| format!("{key}={value:?}")).collect()
}
