/*!
 * Synchronization Traits
 *
 * Core abstraction for the wait/notify half of a blocking queue.
 *
 * # Design: Guard-Passing Waits
 *
 * A strategy never owns the queue storage. The queue hands the strategy its
 * locked storage guard, and the strategy is responsible for releasing the lock
 * while asleep and re-acquiring it before returning. This keeps the
 * "check storage, then sleep" step atomic with respect to senders for every
 * strategy, which is what rules out lost wakeups.
 */

use parking_lot::MutexGuard;
use std::time::Instant;

/// Result of a wake operation
///
/// Compact representation (single usize) for efficient returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeResult {
    /// Successfully woke N waiters (N >= 1)
    Woken(usize),
    /// No waiters were waiting
    NoWaiters,
}

impl WakeResult {
    /// Check if any waiters were woken
    #[inline(always)]
    pub fn is_woken(&self) -> bool {
        matches!(self, WakeResult::Woken(_))
    }

    /// Get number of woken waiters (0 if none)
    #[inline(always)]
    pub fn count(&self) -> usize {
        match self {
            WakeResult::Woken(n) => *n,
            WakeResult::NoWaiters => 0,
        }
    }
}

/// Why a call to [`WaitStrategy::wait`] returned
///
/// Only a hint: the caller must re-check storage either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Woken by a notification, a changed signal word, or spuriously
    Notified,
    /// The deadline passed before any notification arrived
    TimedOut,
}

impl WaitOutcome {
    #[inline]
    pub fn timed_out(&self) -> bool {
        matches!(self, WaitOutcome::TimedOut)
    }
}

/// Strategy for sleeping until a queue may have become non-empty
///
/// Implementations must be:
/// - **Thread-safe**: Safe to call from multiple threads
/// - **Lossless**: A `notify_one` that happens after `wait` observed empty
///   storage must end that wait (or a concurrent one)
/// - **Efficient**: No busy polling while waiting
pub trait WaitStrategy: Send + Sync {
    /// Held for the duration of one timed receive that had to wait
    type DeadlineGuard;

    /// Sleep until notified or until `deadline` passes
    ///
    /// Called with the storage lock held, after storage was found empty.
    /// The lock is released while sleeping and held again on return.
    fn wait<S>(&self, guard: &mut MutexGuard<'_, S>, deadline: Option<Instant>) -> WaitOutcome;

    /// Signal that one message was pushed
    ///
    /// Wakes at most one waiter.
    fn notify_one(&self) -> WakeResult;

    /// Prepare any out-of-band deadline enforcement for a timed receive
    fn arm_deadline(&self, deadline: Instant) -> Self::DeadlineGuard;

    /// Get approximate count of sleeping receivers (for diagnostics)
    fn waiter_count(&self) -> usize {
        0 // Default: unknown
    }

    /// Get strategy name for debugging
    fn name(&self) -> &'static str;
}
