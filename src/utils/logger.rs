//! Logging initialization and configuration.
//!
//! Logs go to files under the install directory so they never interleave
//! with the interactive prompt. Each run creates a new timestamped file,
//! e.g. `~/.psbridge/logs/psbridge.2025-08-04-14-30-25.log`.
//!
//! The log level is controlled via the `RUST_LOG` environment variable
//! (`debug`, `info`, `warn`, `error`), defaulting to `info`.

use std::fs;

use chrono::Local;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config;

/// Initialize file-based logging. Failures are reported to stderr and
/// otherwise ignored: the shell must come up even when logging cannot.
pub fn init_logging() {
    let log_dir = config::install_dir().join("logs");

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create logs directory: {e}");
        return;
    }

    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let log_path = log_dir.join(format!("psbridge.{timestamp}.log"));

    let log_file = match fs::File::create(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {e}");
            return;
        }
    };

    // Non-blocking writer so logging never stalls the prompt.
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // The guard must outlive the program for the writer thread to keep
    // draining; leaking it is fine in a binary entry point.
    std::mem::forget(guard);

    tracing::info!("Logging initialized - writing to {}", log_path.display());
}
