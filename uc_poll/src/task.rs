use std::sync::Arc;

use tokio::{sync::Notify, task::JoinHandle};

use crate::{Fetch, Job, Render, cycle};

/// Handle to a running poll loop.
///
/// Cancelling (or dropping) the handle aborts the loop at its next await
/// point, which is either the fetch or the wait between cycles.
pub struct PollTask {
    handle: JoinHandle<()>,
    wake: Arc<Notify>,
}

impl PollTask {
    pub(crate) fn spawn<F, R>(job: Arc<Job<F, R>>) -> Self
    where
        F: Fetch,
        R: Render<F::Output>,
    {
        let wake = Arc::new(Notify::new());
        let handle = tokio::spawn(cycle::run(job, Arc::clone(&wake)));

        Self { handle, wake }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }

    /// Cut the current wait short, or queue one immediate cycle if a cycle
    /// is in flight.
    pub fn wake(&self) {
        self.wake.notify_one();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
