//! Fixed-period fetch-then-render polling.
//!
//! A [`PollController`] owns one background task that calls a [`Fetch`]
//! implementation, hands the decoded payload to a [`Render`]
//! implementation, then waits `interval` before the next cycle. Fetch and
//! render failures are logged and never stop the schedule; only
//! [`PollController::stop`] (or dropping the controller) does.

mod cycle;
mod task;

use std::{sync::Arc, time::Duration};

use thiserror::Error;

pub use task::PollTask;

/// Source of one poll cycle's payload.
pub trait Fetch: Send + Sync + 'static {
    type Output: Send + 'static;
    type Error: std::fmt::Display + Send + 'static;

    fn fetch(
        &self,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

/// Maps a payload onto the view this renderer owns.
///
/// Every call fully replaces what the previous call produced, and an empty
/// collection must still render (as an empty-state placeholder).
pub trait Render<T>: Send + Sync + 'static {
    /// # Errors
    /// If the view cannot be written or the payload cannot be shown.
    fn render(&self, data: &T) -> Result<(), RenderError>;
}

impl<T, F> Render<T> for F
where
    F: Fn(&T) -> Result<(), RenderError> + Send + Sync + 'static,
{
    fn render(&self, data: &T) -> Result<(), RenderError> {
        self(data)
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to write view: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot render payload: {0}")]
    Payload(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PollError {
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
}

pub(crate) struct Job<F, R> {
    pub(crate) name: String,
    pub(crate) interval: Duration,
    pub(crate) fetcher: F,
    pub(crate) renderer: R,
}

/// Runs a fetch-then-render cycle every `interval` until stopped.
///
/// The interval is measured from the end of one cycle to the start of the
/// next, so a slow endpoint stretches the period instead of stacking
/// requests. At most one cycle task exists per controller.
pub struct PollController<F, R> {
    job: Arc<Job<F, R>>,
    task: Option<PollTask>,
}

impl<F, R> PollController<F, R>
where
    F: Fetch,
    R: Render<F::Output>,
{
    /// # Errors
    /// [`PollError::ZeroInterval`] if `interval` is zero.
    pub fn new(
        name: impl Into<String>,
        interval: Duration,
        fetcher: F,
        renderer: R,
    ) -> Result<Self, PollError> {
        if interval.is_zero() {
            return Err(PollError::ZeroInterval);
        }

        Ok(Self {
            job: Arc::new(Job {
                name: name.into(),
                interval,
                fetcher,
                renderer,
            }),
            task: None,
        })
    }

    /// Start polling, running the first cycle immediately.
    ///
    /// Does nothing if already running. Must be called from within a
    /// tokio runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        tracing::info!(
            "{}: polling every {} ms",
            self.job.name,
            self.job.interval.as_millis()
        );

        self.task = Some(PollTask::spawn(Arc::clone(&self.job)));
    }

    /// Stop polling.
    ///
    /// The pending wait is cancelled and an in-flight fetch is dropped, so
    /// no render happens after this returns. Does nothing if stopped.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
            tracing::info!("{}: polling stopped", self.job.name);
        }
    }

    /// Run the next cycle now instead of waiting for the timer.
    ///
    /// Requests made while a cycle is in flight collapse into a single
    /// extra cycle once it finishes. Ignored when stopped.
    pub fn refresh_now(&self) {
        if let Some(task) = &self.task {
            task.wake();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.job.interval
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.job.name
    }
}
