//! Bidboard core
//!
//! Domain types and pure reconciliation logic for the Bidboard marketplace
//! client: requests with nested bids, flat records (profiles, venues,
//! workshops), viewer roles, the route table, and the [`Remote`] facade the
//! application layer talks to.
//!
//! # Architecture
//!
//! Nothing in this crate performs I/O. The [`Remote`] trait describes the
//! remote source of truth; implementations live with the caller (production
//! HTTP clients) or in `bidboard-harness` (in-memory and fault-injecting
//! remotes). Reconciliation is a set of pure functions over slices and the
//! [`Collection`] type, so every merge can be tested without a runtime.
//!
//! # Components
//!
//! - [`reconcile`]: identity-based replace/remove/prepend with match counts
//! - [`Collection`]: ordered sequence unique by identity
//! - [`Request`], [`Bid`], [`Record`]: entities and their fields
//! - [`Viewer`], [`Role`]: the authenticated actor and its fetch scope
//! - [`Route`]: navigation targets and the protected-route predicate

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod collection;
pub mod error;
pub mod id;
pub mod model;
pub mod reconcile;
pub mod remote;
pub mod route;
pub mod viewer;

pub use collection::{Collection, RequestCollection};
pub use error::RemoteError;
pub use id::{BidId, ProfileId, RequestId, ReviewId, VenueId, ViewerId, WorkshopId};
pub use model::{
    Bid, EntityKind, FieldValue, Fields, Form, Identified, Profile, Record, Request, Update,
    Venue, Workshop,
};
pub use reconcile::Reconciled;
pub use remote::Remote;
pub use route::Route;
pub use viewer::{FetchScope, Role, Viewer};
