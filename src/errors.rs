/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 *
 * "Nothing to receive" is a normal outcome, not a failure: the receive
 * errors below are plain result variants the caller is expected to match on.
 */

use miette::Diagnostic;
use thiserror::Error;

/// Returned by `try_recv` when no message is queued
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Diagnostic)]
pub enum TryRecvError {
    #[error("queue is empty")]
    #[diagnostic(
        code(queue::empty),
        help("Use recv or recv_timeout to wait for a message.")
    )]
    Empty,
}

/// Returned by `recv_timeout` / `recv_deadline` when the deadline passes
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Diagnostic)]
pub enum RecvTimeoutError {
    #[error("timed out waiting for a message")]
    #[diagnostic(
        code(queue::timeout),
        help("No message was sent before the deadline. A later try_recv may still succeed.")
    )]
    Timeout,
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Unknown wait strategy: {0:?}")]
    #[diagnostic(
        code(config::unknown_strategy),
        help("Expected one of: futex, condvar, auto.")
    )]
    UnknownStrategy(String),
}
