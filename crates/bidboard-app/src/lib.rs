//! Application layer for Bidboard
//!
//! Remote-confirmed state management for requests and bids, plus the generic
//! runtime that connects it to a user interface. The same code runs against a
//! production remote and against the deterministic harness.
//!
//! # Components
//!
//! - [`Session`]: Lifecycle manager for one authenticated viewer (requests,
//!   bids, profiles, venues)
//! - [`App`]: Session construction/teardown, workshop catalogue, route guard
//! - [`Driver`]: Trait for platform-specific UI abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod config;
mod driver;
mod error;
mod intent;
mod runtime;
mod session;
mod state;

pub use action::AppAction;
pub use app::App;
pub use config::{AppConfig, DriftPolicy};
pub use driver::Driver;
pub use error::AppError;
pub use intent::Intent;
pub use runtime::Runtime;
pub use session::{REFRESH_ATTEMPTS, Session};
pub use state::SharedCollection;
