/*!
 * Futex-Based Wait Strategy
 *
 * Uses parking_lot_core for futex-like operations on all platforms.
 * On Linux, this maps directly to futex syscalls for minimal overhead.
 *
 * # Design
 *
 * One 32-bit signal word per queue, used as a sequence counter:
 * - Every `notify_one` bumps the word, so each send is a distinct value
 * - A receiver snapshots the word while it still holds the storage lock
 * - Parking re-validates "word == snapshot" atomically with going to sleep,
 *   so a send that lands between unlock and park is never missed
 * - The word is a hint; receivers always re-check storage after waking
 */

use super::traits::{WaitOutcome, WaitStrategy, WakeResult};
use parking_lot::MutexGuard;
use parking_lot_core::{park, unpark_one, ParkResult, DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Instant;
use tracing::trace;

/// Futex-based wait strategy over a single sequence word
///
/// # Performance
///
/// - Zero allocations
/// - Direct futex syscalls on Linux
/// - Lock-free notify fast path when nobody is parked
#[repr(C, align(64))] // Cache-line aligned to prevent false sharing
pub struct FutexWait {
    /// Bumped once per send; wraps on overflow
    seq: AtomicU32,
    /// Receivers between snapshot and wake-up
    waiters: AtomicUsize,
}

impl FutexWait {
    /// Create a new futex-based wait strategy
    pub const fn new() -> Self {
        Self {
            seq: AtomicU32::new(0),
            waiters: AtomicUsize::new(0),
        }
    }

    /// Parking address: the signal word itself
    #[inline]
    fn key(&self) -> usize {
        &self.seq as *const AtomicU32 as usize
    }

    /// Current value of the signal word (for diagnostics and tests)
    pub fn sequence(&self) -> u32 {
        self.seq.load(Ordering::SeqCst)
    }
}

impl Default for FutexWait {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for FutexWait {
    type DeadlineGuard = ();

    fn wait<S>(&self, guard: &mut MutexGuard<'_, S>, deadline: Option<Instant>) -> WaitOutcome {
        // Snapshot under the storage lock: any later push bumps past it
        let observed = self.seq.load(Ordering::SeqCst);
        self.waiters.fetch_add(1, Ordering::SeqCst);

        let key = self.key();
        let result = MutexGuard::unlocked(guard, || {
            trace!(seq = observed, "parking on signal word");
            // SAFETY: `key` is the address of `self.seq`, which outlives this
            // call, and none of the callbacks call back into parking_lot.
            unsafe {
                park(
                    key,
                    || self.seq.load(Ordering::SeqCst) == observed,
                    || {},
                    |_, _| {},
                    DEFAULT_PARK_TOKEN,
                    deadline,
                )
            }
        });

        self.waiters.fetch_sub(1, Ordering::SeqCst);

        match result {
            ParkResult::Unparked(_) => WaitOutcome::Notified,
            // Word already moved on before we could sleep
            ParkResult::Invalid => WaitOutcome::Notified,
            ParkResult::TimedOut => WaitOutcome::TimedOut,
        }
    }

    fn notify_one(&self) -> WakeResult {
        self.seq.fetch_add(1, Ordering::SeqCst);

        if self.waiters.load(Ordering::SeqCst) == 0 {
            return WakeResult::NoWaiters;
        }

        // SAFETY: same key as `wait`; the callback does not touch parking_lot.
        let result = unsafe { unpark_one(self.key(), |_| DEFAULT_UNPARK_TOKEN) };
        match result.unparked_threads {
            0 => WakeResult::NoWaiters,
            n => WakeResult::Woken(n),
        }
    }

    fn arm_deadline(&self, _deadline: Instant) -> Self::DeadlineGuard {}

    fn waiter_count(&self) -> usize {
        self.waiters.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "futex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_futex_wake_one() {
        let shared = Arc::new((Mutex::new(()), FutexWait::new()));
        let shared_clone = shared.clone();

        let handle = thread::spawn(move || {
            let (lock, futex) = &*shared_clone;
            let mut guard = lock.lock();
            futex.wait(&mut guard, Some(Instant::now() + Duration::from_secs(1)))
        });

        // Give thread time to park
        thread::sleep(Duration::from_millis(50));

        let result = shared.1.notify_one();
        assert_eq!(result, WakeResult::Woken(1));

        assert_eq!(handle.join().unwrap(), WaitOutcome::Notified);
    }

    #[test]
    fn test_futex_timeout() {
        let lock = Mutex::new(());
        let futex = FutexWait::new();
        let start = Instant::now();
        let mut guard = lock.lock();
        let result = futex.wait(&mut guard, Some(start + Duration::from_millis(50)));
        let elapsed = start.elapsed();

        assert_eq!(result, WaitOutcome::TimedOut);
        assert!(elapsed >= Duration::from_millis(50));
        assert_eq!(futex.waiter_count(), 0);
    }

    #[test]
    fn test_notify_without_waiters_still_bumps_sequence() {
        let futex = FutexWait::new();
        assert_eq!(futex.notify_one(), WakeResult::NoWaiters);
        assert_eq!(futex.notify_one(), WakeResult::NoWaiters);
        assert_eq!(futex.sequence(), 2);
    }

    #[test]
    fn test_sequence_wraps() {
        let futex = FutexWait::new();
        futex.seq.store(u32::MAX, Ordering::SeqCst);
        futex.notify_one();
        assert_eq!(futex.sequence(), 0);
    }
}
