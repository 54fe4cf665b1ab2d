//! Logging Infrastructure
//!
//! Console output by default; a daily-rolling file when a log directory is
//! given and exists. `RUST_LOG`, when set, overrides the configured level.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with default settings (info, stdout)
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional daily-rolling file output
///
/// Calling this twice is harmless; the second call keeps the first subscriber.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},sqlx=warn")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    match log_dir.map(Path::new).filter(|dir| dir.is_dir()) {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "green-server.log");
            let _ = subscriber
                .with_ansi(false)
                .with_writer(file_appender)
                .try_init();
        }
        None => {
            let _ = subscriber.try_init();
        }
    }
}
