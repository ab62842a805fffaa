//! Discarding of stale responses.
//!
//! Every load is tagged with a ticket from a monotonically increasing
//! sequence when it is issued. A response may only be applied if its
//! ticket is still the latest one, otherwise it is dropped silently.
//! After [`LoadGuard::detach`] no response is applied anymore.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

/// What happened to a loaded response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was issued in the meantime or the consumer was detached.
    Discarded,
    /// The error is visible in the state, the previous data is kept.
    Failed,
}

#[derive(Debug, Default)]
pub struct LoadGuard {
    latest: AtomicU64,
    detached: AtomicBool,
}

impl LoadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> LoadTicket {
        LoadTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        !self.is_detached() && self.latest.load(Ordering::SeqCst) == ticket.0
    }

    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }
}
