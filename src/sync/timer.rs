/*!
 * Deadline Timer
 *
 * One-shot helper thread that notifies a condition variable when a receive
 * deadline passes. It only ever holds a `Weak` handle to the condvar, so a
 * queue dropped before the timer fires turns the late notification into a
 * no-op. Dropping the timer cancels it; it is never joined.
 */

use parking_lot::Condvar;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle, Thread};
use std::time::Instant;
use tracing::{debug, trace, warn};

const TIMER_THREAD_NAME: &str = "queue-deadline-timer";

/// Cancellable one-shot notification at a deadline
pub struct DeadlineTimer {
    cancelled: Arc<AtomicBool>,
    thread: Thread,
}

impl DeadlineTimer {
    /// Spawn a timer that calls `notify_one` on `target` at `deadline`
    ///
    /// Returns `None` if the helper thread could not be spawned; callers
    /// still have their own deadline-bounded wait in that case.
    pub fn arm(target: Weak<Condvar>, deadline: Instant) -> Option<Self> {
        match Self::spawn(target, deadline) {
            // Detached: cancellation, not joining, ends the thread
            Ok((timer, _handle)) => Some(timer),
            Err(e) => {
                warn!(error = %e, "failed to spawn deadline timer; relying on timed wait");
                None
            }
        }
    }

    fn spawn(
        target: Weak<Condvar>,
        deadline: Instant,
    ) -> std::io::Result<(Self, JoinHandle<()>)> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let handle = thread::Builder::new()
            .name(TIMER_THREAD_NAME.into())
            .spawn(move || run_timer(target, deadline, flag))?;

        let timer = Self {
            cancelled,
            thread: handle.thread().clone(),
        };
        Ok((timer, handle))
    }

    /// Stop the timer if it has not fired yet
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.thread.unpark();
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run_timer(target: Weak<Condvar>, deadline: Instant, cancelled: Arc<AtomicBool>) {
    loop {
        if cancelled.load(Ordering::Acquire) {
            trace!("deadline timer cancelled");
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        // Spurious unparks just loop around
        thread::park_timeout(deadline - now);
    }

    match target.upgrade() {
        Some(condvar) => {
            debug!("deadline reached; notifying waiter");
            condvar.notify_one();
        }
        None => trace!("deadline reached after queue was dropped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[test]
    fn test_timer_wakes_untimed_wait() {
        let condvar = Arc::new(Condvar::new());
        let lock = Mutex::new(());

        let start = Instant::now();
        let _timer = DeadlineTimer::arm(
            Arc::downgrade(&condvar),
            start + Duration::from_millis(50),
        )
        .unwrap();

        let mut guard = lock.lock();
        // Without the timer this would block forever; the outer bound only
        // catches a broken timer.
        let result = condvar.wait_for(&mut guard, Duration::from_secs(5));

        assert!(!result.timed_out());
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_cancelled_timer_does_not_notify() {
        let condvar = Arc::new(Condvar::new());
        let lock = Mutex::new(());

        let timer = DeadlineTimer::arm(
            Arc::downgrade(&condvar),
            Instant::now() + Duration::from_millis(20),
        )
        .unwrap();
        drop(timer);

        let mut guard = lock.lock();
        let result = condvar.wait_for(&mut guard, Duration::from_millis(200));
        assert!(result.timed_out());
    }

    #[test]
    fn test_timer_outliving_condvar_is_noop() {
        let condvar = Arc::new(Condvar::new());
        let (timer, handle) = DeadlineTimer::spawn(
            Arc::downgrade(&condvar),
            Instant::now() + Duration::from_millis(20),
        )
        .unwrap();
        drop(condvar);

        // Fires against the dropped condvar and exits without panicking
        handle.join().unwrap();
        drop(timer);
    }

    #[test]
    fn test_cancel_ends_timer_thread_early() {
        let condvar = Arc::new(Condvar::new());
        let (timer, handle) = DeadlineTimer::spawn(
            Arc::downgrade(&condvar),
            Instant::now() + Duration::from_secs(60),
        )
        .unwrap();

        let start = Instant::now();
        timer.cancel();
        handle.join().unwrap();
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
