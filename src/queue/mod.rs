/*!
 * Queue Module
 * Blocking FIFO channel built on the sync strategies
 */

mod blocking;
mod storage;

pub use blocking::BlockingQueue;
