//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application loop, coordinating between:
//! - [`App`]: session and catalogue state machine
//! - [`Driver`]: platform-specific user I/O

use bidboard_core::Remote;

use crate::{App, AppAction, AppError, Driver};

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `R`: Remote backend
pub struct Runtime<D, R>
where
    D: Driver,
    R: Remote,
{
    driver: D,
    app: App<R>,
}

impl<D, R> Runtime<D, R>
where
    D: Driver,
    R: Remote,
{
    /// Create a new runtime around `app`.
    pub fn new(driver: D, app: App<R>) -> Self {
        Self { driver, app }
    }

    /// Run the main loop.
    ///
    /// 1. Starts the App (public data fetch)
    /// 2. Polls intents from the driver until it is exhausted or the App quits
    /// 3. Executes the actions each intent produces
    ///
    /// Operation failures are presented through the driver and do not stop
    /// the loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        let started = self.app.start().await;
        self.settle(started)?;

        loop {
            let should_quit = self.process_cycle().await?;
            if should_quit {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Process one intent.
    ///
    /// Returns `true` if the application should quit.
    pub async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        let Some(intent) = self.driver.poll_intent(&self.app).await? else {
            return Ok(true);
        };

        tracing::trace!(?intent, "handling intent");

        let outcome = self.app.handle(intent).await;
        self.settle(outcome)
    }

    /// Execute actions, or present the failure.
    ///
    /// Returns `true` if should quit.
    fn settle(&mut self, outcome: Result<Vec<AppAction>, AppError>) -> Result<bool, D::Error> {
        match outcome {
            Ok(actions) => self.execute(actions),
            Err(err) => {
                tracing::debug!(error = %err, "operation failed");
                self.driver.present_error(&err)?;
                self.driver.render(&self.app)?;
                Ok(false)
            },
        }
    }

    /// Execute actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn execute(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Navigate(route) => self.driver.navigate(&route)?,
                AppAction::Drift { kind, id } => {
                    tracing::warn!(%kind, %id, "local state drifted from remote");
                },
                AppAction::Quit => return Ok(true),
            }
        }
        Ok(false)
    }

    /// Get a reference to the App.
    pub fn app(&self) -> &App<R> {
        &self.app
    }

    /// Get a mutable reference to the App.
    pub fn app_mut(&mut self) -> &mut App<R> {
        &mut self.app
    }

    /// Get a reference to the driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
