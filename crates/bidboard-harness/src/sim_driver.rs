//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` replays a scripted sequence of intents and model operations
//! and records everything the runtime asks of it. It implements [`Driver`] so
//! the same [`bidboard_app::Runtime`] orchestration code runs in both a real
//! frontend and in simulation.

use std::{
    collections::VecDeque,
    future::{self, Future},
};

use bidboard_app::{App, AppError, Driver, Intent};
use bidboard_core::{Remote, Route};

use crate::{
    MemoryRemote,
    invariants::{InvariantRegistry, SystemSnapshot, Violation},
    model::Operation,
};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// One scripted input.
#[derive(Debug, Clone)]
pub enum Step {
    /// Deliver this intent as is.
    Intent(Intent),
    /// Resolve against the App when polled; skipped if it resolves to nothing.
    Operation(Operation),
}

/// Invariant violation observed during a run.
#[derive(Debug, Clone)]
pub struct ObservedViolation {
    /// Render count when the violation was observed.
    pub render: usize,
    /// What was violated.
    pub violation: Violation,
}

/// Simulation driver for deterministic testing.
pub struct SimDriver {
    script: VecDeque<Step>,
    navigations: Vec<Route>,
    errors: Vec<AppError>,
    renders: usize,
    skipped: usize,
    stopped: bool,
    /// Registry plus the remote whose state the snapshots compare against.
    invariants: Option<(InvariantRegistry, MemoryRemote)>,
    violations: Vec<ObservedViolation>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a driver with an empty script.
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            navigations: Vec::new(),
            errors: Vec::new(),
            renders: 0,
            skipped: 0,
            stopped: false,
            invariants: None,
            violations: Vec::new(),
        }
    }

    /// Enable invariant checking after every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry, remote: MemoryRemote) -> Self {
        self.invariants = Some((registry, remote));
        self
    }

    /// Queue an intent.
    pub fn push_intent(&mut self, intent: Intent) {
        self.script.push_back(Step::Intent(intent));
    }

    /// Queue a model operation.
    pub fn push_operation(&mut self, op: Operation) {
        self.script.push_back(Step::Operation(op));
    }

    /// Queue every operation in `ops`.
    pub fn extend_operations(&mut self, ops: impl IntoIterator<Item = Operation>) {
        self.script.extend(ops.into_iter().map(Step::Operation));
    }

    /// Routes navigated to, in order.
    pub fn navigations(&self) -> &[Route] {
        &self.navigations
    }

    /// Most recent navigation. `None` before the first one.
    pub fn current_route(&self) -> Option<&Route> {
        self.navigations.last()
    }

    /// Errors presented, in order.
    pub fn errors(&self) -> &[AppError] {
        &self.errors
    }

    /// Number of renders.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Operations that resolved to nothing.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Invariant violations observed so far.
    pub fn violations(&self) -> &[ObservedViolation] {
        &self.violations
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn next_intent<R: Remote>(&mut self, app: &App<R>) -> Option<Intent> {
        while let Some(step) = self.script.pop_front() {
            match step {
                Step::Intent(intent) => return Some(intent),
                Step::Operation(op) => match op.resolve(app) {
                    Some(intent) => return Some(intent),
                    None => {
                        tracing::trace!(?op, "operation skipped");
                        self.skipped += 1;
                    },
                },
            }
        }
        None
    }

    fn check_invariants<R: Remote>(&mut self, app: &App<R>) {
        let Some((registry, remote)) = &self.invariants else { return };

        let snapshot = SystemSnapshot::capture(app, remote);
        if let Err(violations) = registry.check_all(&snapshot) {
            for violation in violations {
                tracing::error!(%violation, render = self.renders, "invariant violated");
                self.violations.push(ObservedViolation { render: self.renders, violation });
            }
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    fn poll_intent<R: Remote>(
        &mut self,
        app: &App<R>,
    ) -> impl Future<Output = Result<Option<Intent>, Self::Error>> + Send {
        future::ready(Ok(self.next_intent(app)))
    }

    fn navigate(&mut self, route: &Route) -> Result<(), Self::Error> {
        if self.stopped {
            return Err(SimDriverError("navigate after stop".into()));
        }
        self.navigations.push(route.clone());
        Ok(())
    }

    fn render<R: Remote>(&mut self, app: &App<R>) -> Result<(), Self::Error> {
        if self.stopped {
            return Err(SimDriverError("render after stop".into()));
        }
        self.renders += 1;
        self.check_invariants(app);
        Ok(())
    }

    fn present_error(&mut self, error: &AppError) -> Result<(), Self::Error> {
        self.errors.push(error.clone());
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
