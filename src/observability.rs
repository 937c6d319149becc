//! Tracing setup and structured crash reports.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`);
//! `info` shows phase-level progress, `debug` per-component detail. The
//! panic hook prints a structured report with version and location so bug
//! reports carry enough context.

use std::panic::PanicHookInfo;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const ISSUE_URL: &str = "https://github.com/archmap/archmap/issues/new";

/// Initialize the tracing subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Install the crash-report panic hook. Call before any analysis begins.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    eprintln!();
    eprintln!("════════════════════════════════════════");
    eprintln!("archmap {VERSION} crashed");
    eprintln!("════════════════════════════════════════");

    if let Some(location) = info.location() {
        eprintln!("at {}:{}:{}", location.file(), location.line(), location.column());
    }
    eprintln!("{}", panic_message(info));
    eprintln!();
    eprintln!("Set RUST_BACKTRACE=1 for a backtrace.");
    eprintln!("Please report this at {ISSUE_URL}");
}

/// Best-effort extraction of the panic payload message.
pub fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
