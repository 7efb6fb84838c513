/*!
 * Synchronization Primitives
 *
 * Wait/notify strategies that let a queue receiver sleep until a message
 * arrives or a deadline passes:
 * - Futex-based (Linux) for minimal overhead
 * - Condvar-based (cross-platform) with a deadline timer thread
 *
 * # Architecture
 *
 * Both strategies implement [`WaitStrategy`] and are interchangeable behind
 * the [`Backend`] enum. Neither is trusted as proof that a message exists:
 * every wake is followed by a lock-protected re-check of storage.
 */

mod backend;
mod condvar;
mod config;
mod futex;
mod timer;
mod traits;

pub use backend::Backend;
pub use config::{StrategyType, SyncConfig, STRATEGY_ENV_VAR};
pub use traits::{WaitOutcome, WaitStrategy, WakeResult};

// Re-export specific strategies for advanced users
pub use condvar::CondvarWait;
pub use futex::FutexWait;
pub use timer::DeadlineTimer;
