//! Single-slot debouncer driven by an injected clock.
//!
//! Scheduling replaces whatever was pending, so at most one action is ever
//! outstanding and only the most recently scheduled one can fire. The
//! debouncer never sleeps on its own; the plugin host arms a Zellij timer
//! for the returned deadline and calls [`Debouncer::poll`] when it wakes.

use std::time::{Duration, Instant};

/// Default quiet window for search input.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Debouncer<A> {
    delay: Duration,
    pending: Option<Pending<A>>,
}

#[derive(Debug, Clone)]
struct Pending<A> {
    deadline: Instant,
    action: A,
}

impl<A> Debouncer<A> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending action and schedules `action` to fire at
    /// `now + delay`. Returns that deadline.
    pub fn schedule(&mut self, action: A, now: Instant) -> Instant {
        let deadline = now + self.delay;
        if self.pending.is_some() {
            tracing::trace!("superseding pending debounced action");
        }
        self.pending = Some(Pending { deadline, action });
        deadline
    }

    /// Takes the pending action if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take().map(|p| p.action),
            _ => None,
        }
    }

    /// Drops the pending action, if any.
    pub fn cancel_all(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }
}

impl<A> Default for Debouncer<A> {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}
