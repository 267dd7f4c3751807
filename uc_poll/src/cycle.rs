use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use tokio::sync::Notify;

use crate::{Fetch, Job, Render};

/// The poll loop: one cycle, then wait for the timer or a wake-up.
///
/// Never returns on its own; it ends when its task is aborted.
pub(crate) async fn run<F, R>(job: Arc<Job<F, R>>, wake: Arc<Notify>)
where
    F: Fetch,
    R: Render<F::Output>,
{
    let mut streak = FailureStreak::default();

    loop {
        match streak.record(run_cycle(&job).await) {
            StreakChange::Recovered(failures) => tracing::info!(
                "{}: recovered after {} failed cycles",
                job.name,
                failures
            ),
            StreakChange::Failing(failures) if failures > 1 => tracing::warn!(
                "{}: {} failed cycles in a row",
                job.name,
                failures
            ),
            StreakChange::Failing(_) | StreakChange::Healthy => {}
        }

        tokio::select! {
            () = tokio::time::sleep(job.interval) => {}
            () = wake.notified() => {
                tracing::debug!("{}: refresh requested", job.name);
            }
        }
    }
}

/// Consecutive failed cycles of one controller.
#[derive(Debug, Default)]
struct FailureStreak {
    failures: u32,
}

#[derive(Debug, PartialEq, Eq)]
enum StreakChange {
    Healthy,
    /// First success after this many failures.
    Recovered(u32),
    /// Length of the current streak, this failure included.
    Failing(u32),
}

impl FailureStreak {
    fn record(&mut self, succeeded: bool) -> StreakChange {
        if succeeded {
            match std::mem::take(&mut self.failures) {
                0 => StreakChange::Healthy,
                failures => StreakChange::Recovered(failures),
            }
        } else {
            self.failures = self.failures.saturating_add(1);
            StreakChange::Failing(self.failures)
        }
    }
}

/// Fetch then render. Returns whether both steps succeeded.
async fn run_cycle<F, R>(job: &Job<F, R>) -> bool
where
    F: Fetch,
    R: Render<F::Output>,
{
    let data = match job.fetcher.fetch().await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("{}: fetch failed: {}", job.name, e);
            return false;
        }
    };

    // a panicking renderer must not take the loop down with it
    match panic::catch_unwind(AssertUnwindSafe(|| job.renderer.render(&data)))
    {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::error!("{}: render failed: {}", job.name, e);
            false
        }
        Err(payload) => {
            tracing::error!(
                "{}: render panicked: {}",
                job.name,
                panic_message(payload.as_ref())
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
