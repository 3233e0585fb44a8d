//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold
//! between operations, whatever the operation sequence and injected failures.

use std::collections::HashSet;

use super::{Invariant, InvariantKind, InvariantResult, SystemSnapshot, Violation};

/// Request identities must be unique within the local collection.
pub struct UniqueRequestIds;

impl Invariant for UniqueRequestIds {
    fn kind(&self) -> InvariantKind {
        InvariantKind::UniqueRequestIds
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let mut seen = HashSet::new();
        for request in &state.local_requests {
            if !seen.insert(request.id.as_str()) {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("request {} held twice", request.id),
                });
            }
        }
        Ok(())
    }
}

/// Bid identities must be unique within each local request.
pub struct UniqueBidIds;

impl Invariant for UniqueBidIds {
    fn kind(&self) -> InvariantKind {
        InvariantKind::UniqueBidIds
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for request in &state.local_requests {
            let mut seen = HashSet::new();
            for bid in &request.bids {
                if !seen.insert(bid.as_str()) {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!("request {}: bid {} held twice", request.id, bid),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Local requests must equal the remote requests the viewer may see.
///
/// Operations complete one at a time in simulation, and every successful
/// mutation is merged from the remote's own answer, so after each operation
/// the session mirrors the remote exactly: same requests, same order, same
/// bids, same fields. A failed operation changes neither side.
pub struct LocalMatchesRemote;

impl Invariant for LocalMatchesRemote {
    fn kind(&self) -> InvariantKind {
        InvariantKind::LocalMatchesRemote
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        if state.viewer.is_none() {
            return Ok(());
        }

        if state.local_requests.len() != state.remote_requests.len() {
            return Err(Violation {
                invariant: self.kind(),
                message: format!(
                    "local holds {} requests, remote shows {}",
                    state.local_requests.len(),
                    state.remote_requests.len()
                ),
            });
        }

        for (local, remote) in state.local_requests.iter().zip(&state.remote_requests) {
            if local != remote {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("local {local:?} differs from remote {remote:?}"),
                });
            }
        }
        Ok(())
    }
}

/// Every local workshop must exist remotely, in the remote's relative order.
///
/// The catalogue may lag behind the remote (a failed fetch leaves it empty)
/// but must never hold a workshop the remote does not have.
pub struct WorkshopsKnownRemotely;

impl Invariant for WorkshopsKnownRemotely {
    fn kind(&self) -> InvariantKind {
        InvariantKind::WorkshopsKnownRemotely
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let mut remote = state.remote_workshops.iter();
        for local in &state.local_workshops {
            if !remote.any(|id| id == local) {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "workshop {local} missing or out of order; remote holds {:?}",
                        state.remote_workshops
                    ),
                });
            }
        }
        Ok(())
    }
}
