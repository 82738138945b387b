use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Cooperative cancellation flag plus a progress counter.
///
/// One token is shared by everything working on a single request. Setting
/// it makes every in-flight computation return
/// [`CoreError::Cancelled`](crate::CoreError::Cancelled) at its next check.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
    progress_done: AtomicU64,
    progress_total: AtomicU64,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Reset progress for a new phase with `total` work units.
    pub fn reset_progress(&self, total: u64) {
        self.progress_total.store(total, Ordering::Relaxed);
        self.progress_done.store(0, Ordering::Relaxed);
    }

    pub fn add_progress(&self, units: u64) {
        self.progress_done.fetch_add(units, Ordering::Relaxed);
    }

    /// Current progress as `(done, total)`.
    pub fn progress(&self) -> (u64, u64) {
        (
            self.progress_done.load(Ordering::Relaxed),
            self.progress_total.load(Ordering::Relaxed),
        )
    }
}
