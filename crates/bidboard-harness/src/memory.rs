//! In-memory remote for testing and simulation.
//!
//! [`MemoryRemote`] stores every entity family in memory and behaves like the
//! production backend: it assigns identities, keeps requests and bids newest
//! first, merges update forms into stored fields, and reports `NotFound` for
//! missing targets.
//!
//! All state sits behind `Arc<Mutex<_>>` so clones share one store. The lock
//! is never held across an await point. Optional latency yields to the
//! scheduler before and after each operation is applied, which lets tests
//! interleave in-flight operations deterministically.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use bidboard_core::{
    Bid, BidId, EntityKind, Form, Identified, Profile, ProfileId, Record, Remote, RemoteError,
    Request, RequestId, Update, Venue, VenueId, Viewer, ViewerId, Workshop, WorkshopId,
};

/// Stored request plus the viewer that owns it.
#[derive(Debug, Clone)]
struct Owned {
    owner: ViewerId,
    request: Request,
}

#[derive(Debug, Default)]
struct MemoryRemoteInner {
    /// Newest first.
    requests: Vec<Owned>,
    profiles: Vec<Profile>,
    venues: Vec<Venue>,
    /// Newest first.
    workshops: Vec<Workshop>,
    /// Sequence number for generated identities.
    next_id: u64,
    /// Failures returned by the next operations, in order.
    scripted_failures: VecDeque<RemoteError>,
    /// Operations issued, including failed ones.
    calls: usize,
}

impl MemoryRemoteInner {
    /// Fresh identity with `prefix`, unused by any stored entity.
    fn fresh_id(&mut self, prefix: char) -> String {
        loop {
            self.next_id += 1;
            let candidate = format!("{prefix}{}", self.next_id);
            if !self.is_taken(&candidate) {
                return candidate;
            }
        }
    }

    fn is_taken(&self, id: &str) -> bool {
        self.requests.iter().any(|owned| {
            owned.request.id.as_str() == id
                || owned.request.bids.iter().any(|bid| bid.id.as_str() == id)
        }) || self.workshops.iter().any(|workshop| workshop.id.as_str() == id)
    }

    fn request_mut(&mut self, id: &RequestId) -> Result<&mut Request, RemoteError> {
        self.requests
            .iter_mut()
            .map(|owned| &mut owned.request)
            .find(|request| &request.id == id)
            .ok_or_else(|| RemoteError::not_found(EntityKind::Request, id))
    }
}

/// Shared in-memory remote.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<Mutex<MemoryRemoteInner>>,
    /// Scheduler yields before and after each operation.
    latency: usize,
}

impl MemoryRemote {
    /// Create an empty remote with no latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Yield `yields` times before and after applying each operation.
    ///
    /// Latency belongs to the handle: other handles on the same store keep
    /// their own.
    #[must_use]
    pub fn with_latency(mut self, yields: usize) -> Self {
        self.latency = yields;
        self
    }

    /// Store `request` as owned by `owner`, newest first.
    pub fn seed_request(&self, owner: impl Into<ViewerId>, request: Request) {
        self.lock().requests.insert(0, Owned { owner: owner.into(), request });
    }

    /// Store a profile.
    pub fn seed_profile(&self, profile: Profile) {
        self.lock().profiles.push(profile);
    }

    /// Store a venue.
    pub fn seed_venue(&self, venue: Venue) {
        self.lock().venues.push(venue);
    }

    /// Store a workshop, newest first.
    pub fn seed_workshop(&self, workshop: Workshop) {
        self.lock().workshops.insert(0, workshop);
    }

    /// Fail the next operation with `error`.
    ///
    /// Failures queue up; each operation consumes at most one.
    pub fn fail_next(&self, error: RemoteError) {
        self.lock().scripted_failures.push_back(error);
    }

    /// Every stored request, newest first.
    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.iter().map(|owned| owned.request.clone()).collect()
    }

    /// Requests `viewer` is allowed to see, newest first.
    pub fn requests_visible_to(&self, viewer: &Viewer) -> Vec<Request> {
        self.lock()
            .requests
            .iter()
            .filter(|owned| viewer.can_view_all_requests() || owned.owner == viewer.id)
            .map(|owned| owned.request.clone())
            .collect()
    }

    /// Stored request `id`. `None` if absent.
    pub fn request(&self, id: &RequestId) -> Option<Request> {
        let inner = self.lock();
        inner.requests.iter().find(|owned| &owned.request.id == id).map(|o| o.request.clone())
    }

    /// Owner of request `id`. `None` if absent.
    pub fn owner_of(&self, id: &RequestId) -> Option<ViewerId> {
        let inner = self.lock();
        inner.requests.iter().find(|owned| &owned.request.id == id).map(|o| o.owner.clone())
    }

    /// Every stored profile.
    pub fn profiles(&self) -> Vec<Profile> {
        self.lock().profiles.clone()
    }

    /// Every stored venue.
    pub fn venues(&self) -> Vec<Venue> {
        self.lock().venues.clone()
    }

    /// Every stored workshop, newest first.
    pub fn workshops(&self) -> Vec<Workshop> {
        self.lock().workshops.clone()
    }

    /// Number of operations issued so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.lock().calls
    }

    /// Lock for inspection. A poisoned store is still readable.
    fn lock(&self) -> MutexGuard<'_, MemoryRemoteInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn pause(&self) {
        for _ in 0..self.latency {
            tokio::task::yield_now().await;
        }
    }

    /// Run one remote operation.
    async fn call<T, F>(&self, op: F) -> Result<T, RemoteError>
    where
        F: FnOnce(&mut MemoryRemoteInner) -> Result<T, RemoteError> + Send,
        T: Send,
    {
        self.pause().await;
        let result = self.apply(op);
        self.pause().await;
        result
    }

    fn apply<T, F>(&self, op: F) -> Result<T, RemoteError>
    where
        F: FnOnce(&mut MemoryRemoteInner) -> Result<T, RemoteError>,
    {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| RemoteError::Unavailable("memory remote poisoned".into()))?;
        inner.calls += 1;
        if let Some(error) = inner.scripted_failures.pop_front() {
            return Err(error);
        }
        op(&mut inner)
    }
}

fn update_record<I>(
    records: &mut [Record<I>],
    update: &Update<I>,
    kind: EntityKind,
) -> Result<Record<I>, RemoteError>
where
    I: Clone + Eq + std::hash::Hash + std::fmt::Debug + std::fmt::Display,
{
    let record = records
        .iter_mut()
        .find(|record| record.id() == &update.id)
        .ok_or_else(|| RemoteError::not_found(kind, &update.id))?;
    update.form.merge_into(&mut record.fields);
    Ok(record.clone())
}

impl Remote for MemoryRemote {
    async fn fetch_all_requests(&self) -> Result<Vec<Request>, RemoteError> {
        self.call(|inner| Ok(inner.requests.iter().map(|owned| owned.request.clone()).collect()))
            .await
    }

    async fn fetch_my_requests(&self, owner: &ViewerId) -> Result<Vec<Request>, RemoteError> {
        self.call(|inner| {
            Ok(inner
                .requests
                .iter()
                .filter(|owned| &owned.owner == owner)
                .map(|owned| owned.request.clone())
                .collect())
        })
        .await
    }

    async fn create_request(&self, owner: &ViewerId, form: Form) -> Result<Request, RemoteError> {
        self.call(|inner| {
            let mut request = Request::new(inner.fresh_id('r'));
            form.merge_into(&mut request.fields);
            inner.requests.insert(0, Owned { owner: owner.clone(), request: request.clone() });
            Ok(request)
        })
        .await
    }

    async fn update_request(&self, update: Update<RequestId>) -> Result<Request, RemoteError> {
        self.call(|inner| {
            let request = inner.request_mut(&update.id)?;
            update.form.merge_into(&mut request.fields);
            Ok(request.clone())
        })
        .await
    }

    async fn delete_request(&self, id: &RequestId) -> Result<RequestId, RemoteError> {
        self.call(|inner| {
            let index = inner
                .requests
                .iter()
                .position(|owned| &owned.request.id == id)
                .ok_or_else(|| RemoteError::not_found(EntityKind::Request, id))?;
            Ok(inner.requests.remove(index).request.id)
        })
        .await
    }

    async fn create_bid(&self, request_id: &RequestId, form: Form) -> Result<Bid, RemoteError> {
        self.call(|inner| {
            inner.request_mut(request_id)?;
            let mut bid = Bid::new(inner.fresh_id('b'));
            form.merge_into(&mut bid.fields);
            let request = inner.request_mut(request_id)?;
            request.bids.insert(0, bid.clone());
            Ok(bid)
        })
        .await
    }

    async fn delete_bid(
        &self,
        request_id: &RequestId,
        bid_id: &BidId,
    ) -> Result<BidId, RemoteError> {
        self.call(|inner| {
            let request = inner.request_mut(request_id)?;
            let index = request
                .bids
                .iter()
                .position(|bid| &bid.id == bid_id)
                .ok_or_else(|| RemoteError::not_found(EntityKind::Bid, bid_id))?;
            Ok(request.bids.remove(index).id)
        })
        .await
    }

    async fn fetch_profiles(&self) -> Result<Vec<Profile>, RemoteError> {
        self.call(|inner| Ok(inner.profiles.clone())).await
    }

    async fn update_profile(&self, update: Update<ProfileId>) -> Result<Profile, RemoteError> {
        self.call(|inner| update_record(&mut inner.profiles, &update, EntityKind::Profile)).await
    }

    async fn fetch_venues(&self) -> Result<Vec<Venue>, RemoteError> {
        self.call(|inner| Ok(inner.venues.clone())).await
    }

    async fn update_venue(&self, update: Update<VenueId>) -> Result<Venue, RemoteError> {
        self.call(|inner| update_record(&mut inner.venues, &update, EntityKind::Venue)).await
    }

    async fn fetch_workshops(&self) -> Result<Vec<Workshop>, RemoteError> {
        self.call(|inner| Ok(inner.workshops.clone())).await
    }

    async fn create_workshop(&self, form: Form) -> Result<Workshop, RemoteError> {
        self.call(|inner| {
            let mut workshop = Workshop::new(inner.fresh_id('w'));
            form.merge_into(&mut workshop.fields);
            inner.workshops.insert(0, workshop.clone());
            Ok(workshop)
        })
        .await
    }

    async fn delete_workshop(&self, id: &WorkshopId) -> Result<WorkshopId, RemoteError> {
        self.call(|inner| {
            let index = inner
                .workshops
                .iter()
                .position(|workshop| &workshop.id == id)
                .ok_or_else(|| RemoteError::not_found(EntityKind::Workshop, id))?;
            Ok(inner.workshops.remove(index).id)
        })
        .await
    }
}
