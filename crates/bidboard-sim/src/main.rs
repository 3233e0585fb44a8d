//! Bidboard simulation binary.
//!
//! Replays a seeded operation sequence through the real App and Runtime
//! against an in-memory remote with optional failure injection, checking the
//! standard invariants after every render. The same seed always produces the
//! same run.
//!
//! # Usage
//!
//! ```bash
//! # 500 operations as a regular member, no failures
//! bidboard-sim --seed 7 --operations 500
//!
//! # Admin viewer, 20% of remote calls fail
//! bidboard-sim --seed 7 --admin --failure-rate 0.2 --log-level debug
//! ```

use bidboard_app::{App, AppConfig, DriftPolicy, Intent, Runtime};
use bidboard_core::{Bid, Profile, Request, Role, Venue, Viewer, Workshop};
use bidboard_harness::{
    ChaoticRemote, InvariantRegistry, MemoryRemote, SimDriver, SimDriverError, Violation,
    sequence_from_seed,
};
use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Viewer the simulated user logs in as.
const MEMBER: &str = "member-1";

/// Bidboard simulation
#[derive(Parser, Debug)]
#[command(name = "bidboard-sim")]
#[command(about = "Seeded Bidboard session simulation")]
#[command(version)]
struct Args {
    /// Seed for operation generation and failure injection
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Number of generated operations
    #[arg(short, long, default_value = "200")]
    operations: usize,

    /// Fraction of remote calls that fail (0.0 to 1.0)
    #[arg(short, long, default_value = "0.0")]
    failure_rate: f64,

    /// Log in with the admin role code instead of as a member
    #[arg(long)]
    admin: bool,

    /// Reaction to local/remote drift
    #[arg(long, value_enum, default_value = "report")]
    drift_policy: DriftArg,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DriftArg {
    Report,
    Refetch,
}

impl From<DriftArg> for DriftPolicy {
    fn from(arg: DriftArg) -> Self {
        match arg {
            DriftArg::Report => Self::Report,
            DriftArg::Refetch => Self::Refetch,
        }
    }
}

#[derive(Error, Debug)]
enum SimError {
    #[error("driver failed: {0}")]
    Driver(#[from] SimDriverError),

    #[error("{count} invariant violations, first: {first}")]
    Invariants { count: usize, first: Violation },

    #[error("{presented} errors presented for {injected} injected failures")]
    UnaccountedErrors { presented: usize, injected: usize },
}

/// Remote with a few members' requests, profiles, venues and workshops.
fn seeded_remote() -> MemoryRemote {
    let remote = MemoryRemote::new();
    remote.seed_request(
        MEMBER,
        Request::new("req-wedding")
            .with_field("title", "String quartet for wedding")
            .with_bids([Bid::new("bid-1").with_field("amount", 1800u64)]),
    );
    remote.seed_request("member-2", Request::new("req-gala").with_field("title", "DJ for gala"));
    remote.seed_request(MEMBER, Request::new("req-party").with_field("title", "Birthday band"));
    remote.seed_profile(Profile::new("prof-quartet").with_field("name", "Aurora Quartet"));
    remote.seed_profile(Profile::new("prof-dj").with_field("name", "DJ Nightjar"));
    remote.seed_venue(Venue::new("venue-hall").with_field("name", "Harbour Hall"));
    remote.seed_workshop(Workshop::new("ws-mixing").with_field("title", "Live mixing"));
    remote
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), SimError> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!(
        seed = args.seed,
        operations = args.operations,
        failure_rate = args.failure_rate,
        admin = args.admin,
        "simulation starting"
    );

    let memory = seeded_remote();
    let remote = ChaoticRemote::new(memory.clone(), args.failure_rate, args.seed);

    let role = if args.admin { Role::from_code(Role::ADMIN_CODE) } else { Role::Member };
    let viewer = Viewer::new(MEMBER, role);

    let mut driver =
        SimDriver::new().with_invariants(InvariantRegistry::standard(), memory.clone());
    driver.push_intent(Intent::Login(viewer));
    driver.extend_operations(sequence_from_seed(args.seed, args.operations));
    driver.push_intent(Intent::Logout);

    let config = AppConfig { drift_policy: args.drift_policy.into(), ..AppConfig::default() };
    let mut runtime = Runtime::new(driver, App::new(remote.clone(), config));
    runtime.run().await?;

    let driver = runtime.driver();
    if let Some(first) = driver.violations().first() {
        return Err(SimError::Invariants {
            count: driver.violations().len(),
            first: first.violation.clone(),
        });
    }

    let presented = driver.errors().len();
    let injected = remote.injected_failures();
    if presented != injected {
        return Err(SimError::UnaccountedErrors { presented, injected });
    }

    tracing::info!(
        renders = driver.render_count(),
        navigations = driver.navigations().len(),
        skipped = driver.skipped(),
        remote_calls = remote.operation_count(),
        injected,
        requests = memory.requests().len(),
        workshops = memory.workshops().len(),
        "simulation finished"
    );

    Ok(())
}
