//! Progress callback plumbing.

use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// Callback invoked with the cumulative number of published alerts.
pub type ProgressFn = Box<dyn Fn(u64) + Send + Sync>;

/// Optional progress observer injected at job start.
#[derive(Default)]
pub(crate) struct ProgressObserver {
    callback: Option<ProgressFn>,
}

impl ProgressObserver {
    pub(crate) fn new(callback: ProgressFn) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// Report the cumulative count. A panicking callback is logged and
    /// otherwise ignored so it cannot take the job down.
    pub(crate) fn notify(&self, sent: u64) {
        if let Some(callback) = &self.callback {
            if catch_unwind(AssertUnwindSafe(|| callback(sent))).is_err() {
                warn!(sent, "Progress callback panicked; continuing job");
            }
        }
    }
}
