/*!
 * Blocking Queue Library
 * In-process FIFO channel with futex and condvar wait strategies
 */

pub mod cli;
pub mod errors;
pub mod monitoring;
pub mod queue;
pub mod sync;

// Re-exports
pub use errors::*;
pub use monitoring::init_tracing;
pub use queue::BlockingQueue;
pub use sync::{StrategyType, SyncConfig};
