/*!
 * Condvar-Based Wait Strategy
 *
 * Cross-platform strategy using parking_lot::Condvar for reliability.
 * Timed waits are bounded twice: by `wait_until` itself and by a
 * `DeadlineTimer` that notifies the condvar when the deadline passes.
 */

use super::timer::DeadlineTimer;
use super::traits::{WaitOutcome, WaitStrategy, WakeResult};
use parking_lot::{Condvar, MutexGuard};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::trace;

/// Condvar-based wait strategy
///
/// # Performance
///
/// - Slightly more overhead than futex
/// - Timed receives that have to sleep spawn one short-lived timer thread
/// - Works on all platforms
pub struct CondvarWait {
    /// Shared so deadline timers can hold a `Weak` handle
    condvar: Arc<Condvar>,
    waiters: AtomicUsize,
}

impl CondvarWait {
    /// Create a new condvar-based wait strategy
    pub fn new() -> Self {
        Self {
            condvar: Arc::new(Condvar::new()),
            waiters: AtomicUsize::new(0),
        }
    }
}

impl Default for CondvarWait {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for CondvarWait {
    type DeadlineGuard = Option<DeadlineTimer>;

    fn wait<S>(&self, guard: &mut MutexGuard<'_, S>, deadline: Option<Instant>) -> WaitOutcome {
        self.waiters.fetch_add(1, Ordering::Relaxed);
        trace!(timed = deadline.is_some(), "waiting on condvar");

        let outcome = match deadline {
            Some(deadline) => {
                if self.condvar.wait_until(guard, deadline).timed_out() {
                    WaitOutcome::TimedOut
                } else {
                    WaitOutcome::Notified
                }
            }
            None => {
                self.condvar.wait(guard);
                WaitOutcome::Notified
            }
        };

        self.waiters.fetch_sub(1, Ordering::Relaxed);
        outcome
    }

    fn notify_one(&self) -> WakeResult {
        if self.condvar.notify_one() {
            WakeResult::Woken(1)
        } else {
            WakeResult::NoWaiters
        }
    }

    fn arm_deadline(&self, deadline: Instant) -> Self::DeadlineGuard {
        DeadlineTimer::arm(Arc::downgrade(&self.condvar), deadline)
    }

    fn waiter_count(&self) -> usize {
        self.waiters.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "condvar"
    }
}
