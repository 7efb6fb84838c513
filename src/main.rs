/*!
 * Blocking Queue - Demo Entry Point
 *
 * Usage: blocking-queue <send_delay_seconds> <recv_timeout_seconds>
 *
 * A helper thread sends one message after the first delay while the main
 * thread waits at most the second delay for it.
 */

use blocking_queue::cli::{run_demo, DemoArgs};
use blocking_queue::{init_tracing, SyncConfig};
use miette::IntoDiagnostic;

fn main() -> miette::Result<()> {
    // Initialize structured tracing
    init_tracing();

    let args = DemoArgs::parse(std::env::args_os())?;
    let config = SyncConfig::from_env()?;

    let outcome = run_demo(args, config).into_diagnostic()?;
    println!("{}", outcome);

    Ok(())
}
