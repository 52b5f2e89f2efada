// ── Interval refresh ──
//
// A background task that refetches one list on a fixed period. The
// handle owns the task: dropping it is the unmount.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{Resource, ResourceList};
use crate::notice::Notice;

/// Cancels its refresh task on [`stop`](Self::stop) or drop.
#[must_use = "dropping the handle stops the refresh immediately"]
pub struct RefreshHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    pub fn stop(mut self) {
        self.cancel.cancel();
        self.task.take();
    }

    /// Stop and wait for an in-flight fetch to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<R: Resource> ResourceList<R> {
    /// Refetch every `period` until the returned handle is stopped or
    /// dropped. The first refetch happens one full period from now.
    ///
    /// Failures are stored in the list state and surfaced as a warning
    /// notice; the timer keeps running.
    pub fn auto_refresh(&self, period: Duration) -> RefreshHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(refresh_task(self.clone(), period, cancel.clone()));
        RefreshHandle {
            cancel,
            task: Some(task),
        }
    }
}

async fn refresh_task<R: Resource>(list: ResourceList<R>, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = list.refresh().await {
                    list.notify(Notice::warning(format!("{} refresh failed: {e}", R::KIND)));
                }
            }
        }
    }
    debug!(kind = R::KIND, "auto-refresh stopped");
}
