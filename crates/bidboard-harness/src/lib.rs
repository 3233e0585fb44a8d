//! Deterministic simulation harness for Bidboard.
//!
//! In-memory and fault-injecting implementations of the [`Remote`] trait,
//! plus a scripted [`bidboard_app::Driver`], so the real App and Runtime can
//! be exercised reproducibly without a backend.
//!
//! [`Remote`]: bidboard_core::Remote
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation of one viewer's
//! board. Operations are applied to both the model and the real App, and
//! their observable states are compared.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks against a snapshot of the App and its remote. Use
//! [`InvariantRegistry::standard()`] for the common set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chaotic;
pub mod invariants;
pub mod memory;
pub mod model;
pub mod sim_driver;

pub use chaotic::ChaoticRemote;
pub use invariants::{
    Invariant, InvariantKind, InvariantRegistry, InvariantResult, LocalMatchesRemote,
    RequestSnapshot, SystemSnapshot, UniqueBidIds, UniqueRequestIds, Violation,
    WorkshopsKnownRemotely,
};
pub use memory::MemoryRemote;
pub use model::{
    AMOUNT_FIELD, ModelBoard, ModelRequest, ObservableState, Operation, TITLE_FIELD,
    sequence_from_seed,
};
pub use sim_driver::{ObservedViolation, SimDriver, SimDriverError, Step};
