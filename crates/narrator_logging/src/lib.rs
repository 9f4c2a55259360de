#![deny(missing_docs)]
//! Shared logging utilities for the narrator workspace.
//!
//! This crate provides the `narrator_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the sequence number of the current orchestration run.
    static RUN_SEQ: Cell<u64> = const { Cell::new(0) };
}

/// Records the sequence number of the orchestration run active on this thread.
/// The orchestrator calls this once per click.
pub fn set_run_seq(seq: u64) {
    RUN_SEQ.with(|v| v.set(seq));
}

/// Retrieves the sequence number of the run active on this thread.
/// Returns 0 before the first run.
pub fn current_run_seq() -> u64 {
    RUN_SEQ.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current run.
#[macro_export]
macro_rules! narrator_trace {
    ($($arg:tt)*) => {{
        log::trace!("[run {}] {}", $crate::current_run_seq(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current run.
#[macro_export]
macro_rules! narrator_info {
    ($($arg:tt)*) => {{
        log::info!("[run {}] {}", $crate::current_run_seq(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current run.
#[macro_export]
macro_rules! narrator_debug {
    ($($arg:tt)*) => {{
        log::debug!("[run {}] {}", $crate::current_run_seq(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current run.
#[macro_export]
macro_rules! narrator_warn {
    ($($arg:tt)*) => {{
        log::warn!("[run {}] {}", $crate::current_run_seq(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current run.
#[macro_export]
macro_rules! narrator_error {
    ($($arg:tt)*) => {{
        log::error!("[run {}] {}", $crate::current_run_seq(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
