//! Remote service facade.
//!
//! The remote is the source of truth for every entity. The application layer
//! only mutates local state after the remote has confirmed a change, using
//! the entity the remote returns (server-assigned identity, normalized
//! fields).
//!
//! Authentication is handled by the facade implementation (for example a
//! bearer token attached to every call); operations that are scoped to the
//! caller take the viewer's identity explicitly.

use std::future::Future;

use crate::{
    error::RemoteError,
    id::{BidId, ProfileId, RequestId, VenueId, ViewerId, WorkshopId},
    model::{Bid, Form, Profile, Request, Update, Venue, Workshop},
};

/// Abstract remote service for all entity families.
///
/// Must be Clone (one handle per session), Send + Sync, and every returned
/// future Send. Implementations typically share a connection pool or client
/// via Arc, so clones talk to the same remote.
///
/// # Invariants
///
/// - A returned entity reflects the remote state after the operation.
/// - A failed operation has no effect the caller can rely on; the client
///   leaves its local state untouched.
pub trait Remote: Clone + Send + Sync + 'static {
    /// Every request on the remote, in the remote's order.
    fn fetch_all_requests(&self)
    -> impl Future<Output = Result<Vec<Request>, RemoteError>> + Send;

    /// Requests owned by `owner`, in the remote's order.
    fn fetch_my_requests(
        &self,
        owner: &ViewerId,
    ) -> impl Future<Output = Result<Vec<Request>, RemoteError>> + Send;

    /// Persist a new request owned by `owner`.
    ///
    /// Returns the stored request with its server-assigned identity.
    fn create_request(
        &self,
        owner: &ViewerId,
        form: Form,
    ) -> impl Future<Output = Result<Request, RemoteError>> + Send;

    /// Persist changes to an existing request.
    fn update_request(
        &self,
        update: Update<RequestId>,
    ) -> impl Future<Output = Result<Request, RemoteError>> + Send;

    /// Delete a request.
    ///
    /// Returns the identity of the deleted request.
    fn delete_request(
        &self,
        id: &RequestId,
    ) -> impl Future<Output = Result<RequestId, RemoteError>> + Send;

    /// Submit a bid against `request_id`.
    fn create_bid(
        &self,
        request_id: &RequestId,
        form: Form,
    ) -> impl Future<Output = Result<Bid, RemoteError>> + Send;

    /// Withdraw a bid from `request_id`.
    ///
    /// Returns the identity of the deleted bid.
    fn delete_bid(
        &self,
        request_id: &RequestId,
        bid_id: &BidId,
    ) -> impl Future<Output = Result<BidId, RemoteError>> + Send;

    /// Every profile.
    fn fetch_profiles(&self) -> impl Future<Output = Result<Vec<Profile>, RemoteError>> + Send;

    /// Persist changes to a profile.
    fn update_profile(
        &self,
        update: Update<ProfileId>,
    ) -> impl Future<Output = Result<Profile, RemoteError>> + Send;

    /// Every venue.
    fn fetch_venues(&self) -> impl Future<Output = Result<Vec<Venue>, RemoteError>> + Send;

    /// Persist changes to a venue.
    fn update_venue(
        &self,
        update: Update<VenueId>,
    ) -> impl Future<Output = Result<Venue, RemoteError>> + Send;

    /// Every workshop. Public: needs no authenticated viewer.
    fn fetch_workshops(&self) -> impl Future<Output = Result<Vec<Workshop>, RemoteError>> + Send;

    /// Persist a new workshop.
    fn create_workshop(
        &self,
        form: Form,
    ) -> impl Future<Output = Result<Workshop, RemoteError>> + Send;

    /// Delete a workshop.
    ///
    /// Returns the identity of the deleted workshop.
    fn delete_workshop(
        &self,
        id: &WorkshopId,
    ) -> impl Future<Output = Result<WorkshopId, RemoteError>> + Send;
}
