//! Busy flags for panels that refuse re-entrant requests

use std::sync::atomic::{AtomicBool, Ordering};

/// Holds a busy flag set; clears it when dropped, including when the
/// owning future is cancelled mid-request.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Set `flag`. Returns `None` when it was already set.
    pub fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self { flag })
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
