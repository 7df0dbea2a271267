//! Outstanding-work accounting for the dynamic resolution task tree.
//!
//! Every resolution task holds a [`PendingGuard`] for its whole lifetime.
//! The guard is taken before the task is spawned and released on drop, so
//! every exit path (success, duplicate, failure, panic) gives its unit back.
//! A parent registers its children while still holding its own guard, which
//! keeps the count above zero until the whole subtree is finished.

use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

#[derive(Default)]
pub struct Pending {
    count: AtomicUsize,
    idle: Notify,
}

impl Pending {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one unit of outstanding work.
    pub fn register(self: &Arc<Self>) -> PendingGuard {
        self.count.fetch_add(1, Ordering::AcqRel);
        PendingGuard {
            pending: Arc::clone(self),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Waits until no work is registered.
    pub async fn wait_idle(&self) {
        loop {
            let mut idle = pin!(self.idle.notified());
            // Subscribe before checking so a release in between is not lost.
            idle.as_mut().enable();
            if self.count() == 0 {
                return;
            }
            idle.await;
        }
    }
}

/// One unit of outstanding work, released on drop.
pub struct PendingGuard {
    pending: Arc<Pending>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.pending.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.pending.idle.notify_waiters();
        }
    }
}
