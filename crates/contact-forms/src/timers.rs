// File: src/timers.rs
// Purpose: Owned, cancellable delayed callbacks

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Holds at most one pending delayed callback.
///
/// Arming the slot aborts whatever it held before, so a superseded callback
/// never runs. Dropping the slot aborts the pending callback too.
#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
    pending: Option<AbortHandle>,
}

impl TimerSlot {
    /// Run `task` after `delay`, replacing any pending callback.
    ///
    /// Outside a Tokio runtime nothing is scheduled.
    pub fn arm<F>(&mut self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("No Tokio runtime available, dropping delayed callback");
            return;
        };

        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        self.pending = Some(handle.abort_handle());
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
