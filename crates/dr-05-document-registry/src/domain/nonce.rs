//! # Nonce Tracker
//!
//! Local cursor over the sender's account nonce. Lives behind the service's
//! write lock; the node's pending count is read on every submission and
//! the tracker only guards against a node that has not yet seen our last
//! broadcast.

/// Last nonce this process successfully broadcast.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NonceTracker {
    last_used: Option<u64>,
}

impl NonceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `max(pending_count, last_used + 1)`
    pub fn next(&self, pending_count: u64) -> u64 {
        match self.last_used {
            Some(last) => pending_count.max(last.saturating_add(1)),
            None => pending_count,
        }
    }

    /// Record a nonce the node accepted.
    pub fn commit(&mut self, nonce: u64) {
        self.last_used = Some(nonce);
    }

    /// Forget the cursor; the next submission trusts the node.
    pub fn reset(&mut self) {
        self.last_used = None;
    }

    pub fn last_used(&self) -> Option<u64> {
        self.last_used
    }
}
