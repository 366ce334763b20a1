//! Tracing subscriber setup
//!
//! `RUST_LOG` always wins. Without it, only warnings and errors from this
//! crate are shown, or `info` and up with `--debug`.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Log file written by the interactive browser, inside the data directory
pub const LOG_FILE_NAME: &str = "query-history.log";

fn env_filter(debug: bool) -> EnvFilter {
    let default_filter = if debug { "query_history=info" } else { "query_history=warn" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Log to stderr, for one-shot commands
pub fn init_stderr_logging(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to an append-only file, for the full-screen browser where stderr
/// output would corrupt the display.
pub fn init_file_logging(data_dir: &Path, debug: bool) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

    let mut log_file_opts = OpenOptions::new();
    log_file_opts.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        log_file_opts.mode(0o600);
    }

    let log_path = data_dir.join(LOG_FILE_NAME);
    let log_file = log_file_opts
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    Ok(())
}
