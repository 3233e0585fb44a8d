//! Operations for model-based testing.
//!
//! Operations represent every mutation a viewer can issue. They are generated
//! randomly (by proptest in tests, from a seed in the simulation binary) and
//! applied to both the reference model and the real App.
//!
//! Targets are small indices resolved against the current collection at
//! application time, so any generated sequence is meaningful whatever the
//! identities the remote assigned earlier.

use arbitrary::{Arbitrary, Unstructured};
use bidboard_app::{App, Intent};
use bidboard_core::{Form, Remote, Update};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Field holding a request, workshop, profile or venue title.
pub const TITLE_FIELD: &str = "title";

/// Field holding a bid amount.
pub const AMOUNT_FIELD: &str = "amount";

/// Operations that can be applied to the system.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Post a new request.
    CreateRequest {
        /// Request title.
        title: u8,
    },

    /// Retitle a request.
    UpdateRequest {
        /// Index into the current requests.
        target: u8,
        /// New title.
        title: u8,
    },

    /// Delete a request.
    DeleteRequest {
        /// Index into the current requests.
        target: u8,
    },

    /// Bid on a request.
    CreateBid {
        /// Index into the current requests.
        target: u8,
        /// Bid amount.
        amount: u16,
    },

    /// Withdraw a bid.
    DeleteBid {
        /// Index into the current requests.
        target: u8,
        /// Index into the target's bids.
        bid: u8,
    },

    /// Rename a profile.
    UpdateProfile {
        /// Index into the current profiles.
        target: u8,
        /// New title.
        title: u8,
    },

    /// Rename a venue.
    UpdateVenue {
        /// Index into the current venues.
        target: u8,
        /// New title.
        title: u8,
    },

    /// Publish a workshop.
    CreateWorkshop {
        /// Workshop title.
        title: u8,
    },

    /// Delete a workshop.
    DeleteWorkshop {
        /// Index into the current catalogue.
        target: u8,
    },

    /// Re-fetch everything.
    Refresh,
}

/// Pick `target` modulo `len`. `None` for an empty collection.
pub(crate) fn pick(target: u8, len: usize) -> Option<usize> {
    (len > 0).then(|| usize::from(target) % len)
}

fn titled(title: u8) -> Form {
    Form::new().with(TITLE_FIELD, u64::from(title))
}

impl Operation {
    /// Intent this operation stands for in the current state of `app`.
    ///
    /// Returns `None` when the operation has nothing to act on: no session
    /// for a session operation, or an empty target collection.
    pub fn resolve<R: Remote>(&self, app: &App<R>) -> Option<Intent> {
        match *self {
            Self::Refresh => Some(Intent::Refresh),
            Self::CreateWorkshop { title } => {
                app.session().ok()?;
                Some(Intent::CreateWorkshop(titled(title)))
            },
            Self::DeleteWorkshop { target } => {
                app.session().ok()?;
                let workshops = app.workshops();
                let index = pick(target, workshops.len())?;
                Some(Intent::DeleteWorkshop(workshops.as_slice()[index].id.clone()))
            },
            Self::CreateRequest { title } => {
                app.session().ok()?;
                Some(Intent::CreateRequest(titled(title)))
            },
            Self::UpdateRequest { target, title } => {
                let requests = app.session().ok()?.requests();
                let index = pick(target, requests.len())?;
                let id = requests.as_slice()[index].id.clone();
                Some(Intent::UpdateRequest(Update::new(id, titled(title))))
            },
            Self::DeleteRequest { target } => {
                let requests = app.session().ok()?.requests();
                let index = pick(target, requests.len())?;
                Some(Intent::DeleteRequest(requests.as_slice()[index].id.clone()))
            },
            Self::CreateBid { target, amount } => {
                let requests = app.session().ok()?.requests();
                let index = pick(target, requests.len())?;
                Some(Intent::CreateBid {
                    request_id: requests.as_slice()[index].id.clone(),
                    form: Form::new().with(AMOUNT_FIELD, u64::from(amount)),
                })
            },
            Self::DeleteBid { target, bid } => {
                let requests = app.session().ok()?.requests();
                let request = &requests.as_slice()[pick(target, requests.len())?];
                let bid = &request.bids[pick(bid, request.bids.len())?];
                Some(Intent::DeleteBid { request_id: request.id.clone(), bid_id: bid.id.clone() })
            },
            Self::UpdateProfile { target, title } => {
                let profiles = app.session().ok()?.profiles();
                let index = pick(target, profiles.len())?;
                let id = profiles.as_slice()[index].id.clone();
                Some(Intent::UpdateProfile(Update::new(id, titled(title))))
            },
            Self::UpdateVenue { target, title } => {
                let venues = app.session().ok()?.venues();
                let index = pick(target, venues.len())?;
                let id = venues.as_slice()[index].id.clone();
                Some(Intent::UpdateVenue(Update::new(id, titled(title))))
            },
        }
    }
}

/// Deterministic operation sequence of `len` operations for `seed`.
pub fn sequence_from_seed(seed: u64, len: usize) -> Vec<Operation> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut bytes = vec![0u8; len.saturating_mul(16)];
    rng.fill_bytes(&mut bytes);

    let mut input = Unstructured::new(&bytes);
    (0..len).map_while(|_| Operation::arbitrary(&mut input).ok()).collect()
}
