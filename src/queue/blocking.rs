/*!
 * Blocking Queue
 *
 * Thread-safe FIFO with blocking, timed, and non-blocking receive.
 *
 * # Protocol
 *
 * - `send` pushes under the storage lock, then notifies the strategy once
 * - receivers pop under the lock; only on empty do they ask the strategy to
 *   sleep, handing it the held guard so the check and the sleep are atomic
 * - every wake (notify, timeout, spurious) loops back to a locked re-check,
 *   so a message that lands right at the deadline is still delivered
 */

use super::storage::Storage;
use crate::errors::{RecvTimeoutError, TryRecvError};
use crate::sync::{Backend, SyncConfig, WaitStrategy};
use parking_lot::Mutex;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Unbounded multi-producer FIFO channel
///
/// Not `Clone`: share it between threads with `Arc`.
///
/// # Examples
///
/// ```
/// use blocking_queue::BlockingQueue;
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
///
/// let queue = Arc::new(BlockingQueue::new());
/// let sender = queue.clone();
///
/// let handle = thread::spawn(move || sender.send("ping"));
///
/// assert_eq!(queue.recv_timeout(Duration::from_secs(5)), Ok("ping"));
/// handle.join().unwrap();
/// ```
pub struct BlockingQueue<T, W = Backend>
where
    W: WaitStrategy,
{
    storage: Mutex<Storage<T>>,
    strategy: W,
}

impl<T> BlockingQueue<T, Backend> {
    /// Create a queue with the platform's preferred strategy
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    /// Create a queue with the strategy selected by `config`
    pub fn with_config(config: SyncConfig) -> Self {
        Self::with_strategy(Backend::new(&config))
    }
}

impl<T> Default for BlockingQueue<T, Backend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, W> BlockingQueue<T, W>
where
    W: WaitStrategy,
{
    /// Create a queue over an explicit strategy
    pub fn with_strategy(strategy: W) -> Self {
        Self {
            storage: Mutex::new(Storage::new()),
            strategy,
        }
    }

    /// Enqueue a message and wake at most one receiver
    ///
    /// Never blocks beyond the storage lock hold time.
    pub fn send(&self, message: T) {
        let len = {
            let mut storage = self.storage.lock();
            storage.push(message);
            storage.len()
        };

        let woken = self.strategy.notify_one();
        trace!(len, woken = woken.count(), "message enqueued");
    }

    /// Block until a message is available
    ///
    /// Only a `send` releases a blocked `recv`; use [`recv_timeout`] when the
    /// caller needs a liveness bound.
    ///
    /// [`recv_timeout`]: Self::recv_timeout
    pub fn recv(&self) -> T {
        let mut storage = self.storage.lock();
        loop {
            if let Some(message) = storage.pop() {
                return message;
            }
            self.strategy.wait(&mut storage, None);
        }
    }

    /// Block for at most `timeout` waiting for a message
    ///
    /// A timeout too large to represent as a deadline waits indefinitely.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.recv_deadline(deadline),
            None => Ok(self.recv()),
        }
    }

    /// Block until `deadline` waiting for a message
    pub fn recv_deadline(&self, deadline: Instant) -> Result<T, RecvTimeoutError> {
        if let Some(message) = self.storage.lock().pop() {
            return Ok(message);
        }
        if Instant::now() >= deadline {
            return Err(RecvTimeoutError::Timeout);
        }

        // Armed outside the lock; cancelled when this call returns
        let _deadline_guard = self.strategy.arm_deadline(deadline);

        let mut storage = self.storage.lock();
        loop {
            if let Some(message) = storage.pop() {
                return Ok(message);
            }
            if Instant::now() >= deadline {
                debug!(strategy = self.strategy.name(), "receive deadline elapsed");
                return Err(RecvTimeoutError::Timeout);
            }
            if self.strategy.wait(&mut storage, Some(deadline)).timed_out() {
                trace!("receiver woke at deadline; re-checking storage");
            } else {
                trace!("receiver notified");
            }
        }
    }

    /// Take the head message if there is one, without waiting
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.storage.lock().pop().ok_or(TryRecvError::Empty)
    }

    /// Number of queued messages
    pub fn len(&self) -> usize {
        self.storage.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.lock().is_empty()
    }

    /// Name of the active wait strategy
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Approximate number of receivers currently asleep
    pub fn waiter_count(&self) -> usize {
        self.strategy.waiter_count()
    }
}

impl<T, W> fmt::Debug for BlockingQueue<T, W>
where
    W: WaitStrategy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingQueue")
            .field("len", &self.len())
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
