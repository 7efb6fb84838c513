/*!
 * Strategy Backend
 *
 * Enum dispatch over the concrete strategies so the default queue type can
 * pick its strategy at runtime without boxing.
 */

use super::condvar::CondvarWait;
use super::config::{StrategyType, SyncConfig};
use super::futex::FutexWait;
use super::timer::DeadlineTimer;
use super::traits::{WaitOutcome, WaitStrategy, WakeResult};
use parking_lot::MutexGuard;
use std::time::Instant;

/// Runtime-selected wait strategy
pub enum Backend {
    Futex(FutexWait),
    Condvar(CondvarWait),
}

impl Backend {
    /// Build the strategy named by `config`
    pub fn new(config: &SyncConfig) -> Self {
        match config.select_strategy() {
            StrategyType::Condvar => Backend::Condvar(CondvarWait::new()),
            // Auto is already resolved by select_strategy
            StrategyType::Futex | StrategyType::Auto => Backend::Futex(FutexWait::new()),
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::new(&SyncConfig::default())
    }
}

impl From<FutexWait> for Backend {
    fn from(strategy: FutexWait) -> Self {
        Backend::Futex(strategy)
    }
}

impl From<CondvarWait> for Backend {
    fn from(strategy: CondvarWait) -> Self {
        Backend::Condvar(strategy)
    }
}

impl WaitStrategy for Backend {
    type DeadlineGuard = Option<DeadlineTimer>;

    #[inline]
    fn wait<S>(&self, guard: &mut MutexGuard<'_, S>, deadline: Option<Instant>) -> WaitOutcome {
        match self {
            Backend::Futex(s) => s.wait(guard, deadline),
            Backend::Condvar(s) => s.wait(guard, deadline),
        }
    }

    #[inline]
    fn notify_one(&self) -> WakeResult {
        match self {
            Backend::Futex(s) => s.notify_one(),
            Backend::Condvar(s) => s.notify_one(),
        }
    }

    fn arm_deadline(&self, deadline: Instant) -> Self::DeadlineGuard {
        match self {
            // The futex park is deadline-aware on its own
            Backend::Futex(_) => None,
            Backend::Condvar(s) => s.arm_deadline(deadline),
        }
    }

    fn waiter_count(&self) -> usize {
        match self {
            Backend::Futex(s) => s.waiter_count(),
            Backend::Condvar(s) => s.waiter_count(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Backend::Futex(s) => s.name(),
            Backend::Condvar(s) => s.name(),
        }
    }
}
