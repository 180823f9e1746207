use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Sliding-window call limiter.
///
/// Holds the timestamps of calls issued within the last `window`. Expired
/// timestamps are purged lazily on every check. The limiter never blocks:
/// callers get a yes/no answer immediately.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            calls: Mutex::new(VecDeque::new()),
        }
    }

    pub const fn max_calls(&self) -> usize {
        self.max_calls
    }

    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Returns whether another call fits in the current window.
    pub fn allow(&self) -> bool {
        self.allow_at(Instant::now())
    }

    /// Records a call issued now.
    pub fn record(&self) {
        self.record_at(Instant::now());
    }

    /// Checks and records in one step.
    ///
    /// The returned reservation counts toward the window until it is dropped;
    /// [`Reservation::commit`] keeps it permanently.
    pub fn try_acquire(&self) -> Option<Reservation<'_>> {
        self.try_acquire_at(Instant::now())
    }

    /// Number of calls currently inside the window.
    pub fn in_window(&self) -> usize {
        let mut calls = self.lock();
        self.purge(&mut calls, Instant::now());
        calls.len()
    }

    pub(crate) fn allow_at(&self, now: Instant) -> bool {
        let mut calls = self.lock();
        self.purge(&mut calls, now);
        calls.len() < self.max_calls
    }

    pub(crate) fn record_at(&self, now: Instant) {
        self.lock().push_back(now);
    }

    pub(crate) fn try_acquire_at(&self, now: Instant) -> Option<Reservation<'_>> {
        let mut calls = self.lock();
        self.purge(&mut calls, now);
        if calls.len() >= self.max_calls {
            return None;
        }
        calls.push_back(now);
        drop(calls);

        Some(Reservation {
            limiter: self,
            at: now,
            committed: false,
        })
    }

    fn purge(&self, calls: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = calls.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                calls.pop_front();
            } else {
                break;
            }
        }
    }

    fn release(&self, at: Instant) {
        let mut calls = self.lock();
        if let Some(pos) = calls.iter().rposition(|&t| t == at) {
            calls.remove(pos);
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A slot taken in the limiter window, released on drop unless committed.
#[derive(Debug)]
pub struct Reservation<'a> {
    limiter: &'a RateLimiter,
    at: Instant,
    committed: bool,
}

impl Reservation<'_> {
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.limiter.release(self.at);
        }
    }
}
