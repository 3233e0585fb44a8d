//! Chaotic remote wrapper for fault injection testing
//!
//! Remote wrapper that randomly fails operations before they reach the
//! wrapped remote. A failed operation therefore never changes remote state,
//! which is exactly what the client may assume about a failure; the system
//! must leave its local state untouched as well.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

use bidboard_core::{
    Bid, BidId, Form, Profile, ProfileId, Remote, RemoteError, Request, RequestId, Update, Venue,
    VenueId, ViewerId, Workshop, WorkshopId,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Chaotic remote wrapper that randomly injects transport failures
///
/// Clones share the RNG and counters, so a cloned handle (one per session)
/// continues the same deterministic failure sequence.
#[derive(Clone)]
pub struct ChaoticRemote<R: Remote> {
    inner: R,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    rng: Arc<Mutex<ChaCha8Rng>>,
    operations: Arc<AtomicUsize>,
    injected: Arc<AtomicUsize>,
}

impl<R: Remote> ChaoticRemote<R> {
    /// Wrap `inner` with a seeded failure sequence.
    ///
    /// `failure_rate` is clamped to [0.0, 1.0]; NaN means no failures.
    pub fn new(inner: R, failure_rate: f64, seed: u64) -> Self {
        let failure_rate = if failure_rate.is_nan() { 0.0 } else { failure_rate.clamp(0.0, 1.0) };
        Self {
            inner,
            failure_rate,
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            operations: Arc::new(AtomicUsize::new(0)),
            injected: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Underlying remote (for checking invariants after chaos).
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Total number of operations attempted.
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::Relaxed)
    }

    /// Number of operations failed by injection.
    pub fn injected_failures(&self) -> usize {
        self.injected.load(Ordering::Relaxed)
    }

    /// Count the operation and decide whether it fails.
    fn intercept(&self) -> Result<(), RemoteError> {
        self.operations.fetch_add(1, Ordering::Relaxed);

        let fail = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            rng.gen_bool(self.failure_rate)
        };

        if fail {
            self.injected.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("injecting remote failure");
            return Err(RemoteError::Transport("chaotic failure injection".to_string()));
        }
        Ok(())
    }
}

impl<R: Remote> Remote for ChaoticRemote<R> {
    async fn fetch_all_requests(&self) -> Result<Vec<Request>, RemoteError> {
        self.intercept()?;
        self.inner.fetch_all_requests().await
    }

    async fn fetch_my_requests(&self, owner: &ViewerId) -> Result<Vec<Request>, RemoteError> {
        self.intercept()?;
        self.inner.fetch_my_requests(owner).await
    }

    async fn create_request(&self, owner: &ViewerId, form: Form) -> Result<Request, RemoteError> {
        self.intercept()?;
        self.inner.create_request(owner, form).await
    }

    async fn update_request(&self, update: Update<RequestId>) -> Result<Request, RemoteError> {
        self.intercept()?;
        self.inner.update_request(update).await
    }

    async fn delete_request(&self, id: &RequestId) -> Result<RequestId, RemoteError> {
        self.intercept()?;
        self.inner.delete_request(id).await
    }

    async fn create_bid(&self, request_id: &RequestId, form: Form) -> Result<Bid, RemoteError> {
        self.intercept()?;
        self.inner.create_bid(request_id, form).await
    }

    async fn delete_bid(
        &self,
        request_id: &RequestId,
        bid_id: &BidId,
    ) -> Result<BidId, RemoteError> {
        self.intercept()?;
        self.inner.delete_bid(request_id, bid_id).await
    }

    async fn fetch_profiles(&self) -> Result<Vec<Profile>, RemoteError> {
        self.intercept()?;
        self.inner.fetch_profiles().await
    }

    async fn update_profile(&self, update: Update<ProfileId>) -> Result<Profile, RemoteError> {
        self.intercept()?;
        self.inner.update_profile(update).await
    }

    async fn fetch_venues(&self) -> Result<Vec<Venue>, RemoteError> {
        self.intercept()?;
        self.inner.fetch_venues().await
    }

    async fn update_venue(&self, update: Update<VenueId>) -> Result<Venue, RemoteError> {
        self.intercept()?;
        self.inner.update_venue(update).await
    }

    async fn fetch_workshops(&self) -> Result<Vec<Workshop>, RemoteError> {
        self.intercept()?;
        self.inner.fetch_workshops().await
    }

    async fn create_workshop(&self, form: Form) -> Result<Workshop, RemoteError> {
        self.intercept()?;
        self.inner.create_workshop(form).await
    }

    async fn delete_workshop(&self, id: &WorkshopId) -> Result<WorkshopId, RemoteError> {
        self.intercept()?;
        self.inner.delete_workshop(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryRemote;

    #[tokio::test]
    async fn zero_rate_never_fails() {
        let remote = ChaoticRemote::new(MemoryRemote::new(), 0.0, 7);

        for _ in 0..20 {
            assert!(remote.fetch_workshops().await.is_ok());
        }
        assert_eq!(remote.operation_count(), 20);
        assert_eq!(remote.injected_failures(), 0);
    }

    #[tokio::test]
    async fn full_rate_always_fails_without_reaching_inner() {
        let remote = ChaoticRemote::new(MemoryRemote::new(), 1.0, 7);

        let err = remote.create_workshop(Form::new()).await.unwrap_err();

        assert!(err.is_transient());
        assert_eq!(remote.inner().call_count(), 0);
        assert!(remote.inner().workshops().is_empty());
    }

    #[tokio::test]
    async fn nan_rate_never_fails() {
        let remote = ChaoticRemote::new(MemoryRemote::new(), f64::NAN, 1);

        assert!(remote.fetch_workshops().await.is_ok());
        assert_eq!(remote.injected_failures(), 0);
    }

    #[tokio::test]
    async fn infinite_rate_always_fails() {
        let remote = ChaoticRemote::new(MemoryRemote::new(), f64::INFINITY, 1);

        assert!(remote.fetch_workshops().await.is_err());
        assert_eq!(remote.injected_failures(), 1);
    }

    #[tokio::test]
    async fn same_seed_same_failures() {
        let outcomes = |seed| async move {
            let remote = ChaoticRemote::new(MemoryRemote::new(), 0.5, seed);
            let mut outcomes = Vec::new();
            for _ in 0..32 {
                outcomes.push(remote.fetch_venues().await.is_ok());
            }
            outcomes
        };

        assert_eq!(outcomes(42).await, outcomes(42).await);
    }
}
