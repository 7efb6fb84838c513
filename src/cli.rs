/*!
 * Demo Harness
 *
 * Spawns a delayed sender thread and receives with a timeout on the calling
 * thread. Argument errors are reported as miette diagnostics.
 */

use crate::queue::BlockingQueue;
use crate::sync::SyncConfig;
use miette::Diagnostic;
use std::ffi::OsString;
use std::fmt;
use std::num::ParseIntError;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

/// Payload sent by the delayed sender
pub const DEMO_PAYLOAD: &str = "Hello from the sender thread!";

/// Command-line argument errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ArgsError {
    #[error("expected 2 arguments, got {0}")]
    #[diagnostic(
        code(cli::arg_count),
        help("usage: blocking-queue <send_delay_seconds> <recv_timeout_seconds>")
    )]
    WrongArgCount(usize),

    #[error("invalid {name} {value:?}")]
    #[diagnostic(
        code(cli::invalid_duration),
        help("Durations are whole, non-negative seconds.")
    )]
    InvalidDuration {
        name: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid {name} {value:?}: not valid UTF-8")]
    #[diagnostic(
        code(cli::not_unicode),
        help("Durations are whole, non-negative seconds.")
    )]
    NotUnicode { name: &'static str, value: String },
}

/// Parsed demo arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoArgs {
    pub send_delay: Duration,
    pub recv_timeout: Duration,
}

impl DemoArgs {
    /// Parse a full argv, program name first
    ///
    /// Takes OS strings so arguments that are not UTF-8 become an
    /// `ArgsError` rather than a panic.
    pub fn parse<I, S>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().skip(1).map(Into::into).collect();
        if args.len() != 2 {
            return Err(ArgsError::WrongArgCount(args.len()));
        }

        Ok(Self {
            send_delay: parse_seconds("send delay", &args[0])?,
            recv_timeout: parse_seconds("receive timeout", &args[1])?,
        })
    }
}

fn parse_seconds(name: &'static str, raw: &OsString) -> Result<Duration, ArgsError> {
    let value = raw.to_str().ok_or_else(|| ArgsError::NotUnicode {
        name,
        value: raw.to_string_lossy().into_owned(),
    })?;

    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|source| ArgsError::InvalidDuration {
            name,
            value: value.to_string(),
            source,
        })
}

/// What the receiving side observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoOutcome {
    Received(String),
    TimedOut,
}

impl fmt::Display for DemoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoOutcome::Received(message) => write!(f, "Received: {}", message),
            DemoOutcome::TimedOut => write!(f, "Timeout occurred."),
        }
    }
}

/// Run one delayed send against one timed receive
///
/// The sender thread is joined before returning, so a receive that timed out
/// still waits for the late send to finish.
pub fn run_demo(args: DemoArgs, config: SyncConfig) -> std::io::Result<DemoOutcome> {
    let queue = Arc::new(BlockingQueue::with_config(config));
    info!(
        strategy = queue.strategy_name(),
        send_delay = ?args.send_delay,
        recv_timeout = ?args.recv_timeout,
        "starting demo"
    );

    let sender_queue = queue.clone();
    let send_delay = args.send_delay;
    let sender = thread::Builder::new()
        .name("delayed-sender".into())
        .spawn(move || {
            thread::sleep(send_delay);
            sender_queue.send(DEMO_PAYLOAD.to_string());
        })?;

    let start = Instant::now();
    let outcome = match queue.recv_timeout(args.recv_timeout) {
        Ok(message) => DemoOutcome::Received(message),
        Err(_) => DemoOutcome::TimedOut,
    };
    info!(elapsed = ?start.elapsed(), ?outcome, "receive finished");

    if sender.join().is_err() {
        warn!("delayed sender panicked");
    }
    Ok(outcome)
}
