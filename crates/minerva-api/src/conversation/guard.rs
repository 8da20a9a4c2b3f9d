//! Submission latch.

use std::sync::atomic::{AtomicBool, Ordering};

/// Guard that clears the `busy` flag on drop, ensuring the latch is always
/// released even if the submit future is cancelled or returns early.
pub(crate) struct SubmitGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmitGuard<'a> {
    /// Attempt to acquire the latch. Returns `None` if a request is
    /// already in flight.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
