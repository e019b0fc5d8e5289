//! Logging system initialization
//!
//! Sets up the tracing subscriber from the loaded configuration: level
//! filter, stdout or file output with optional daily rotation, and text
//! or JSON formatting.

use tracing_appender::rolling;

use crate::config::StaticConfig;

/// Initialize the logging system.
///
/// Call once during startup, after the configuration has been loaded.
/// The returned guard must be kept alive for the duration of the program
/// so the non-blocking writer flushes on exit.
///
/// # Panics
/// * If creating the log appender fails
/// * If the global subscriber is already set
pub fn init_logging(config: &StaticConfig) -> tracing_appender::non_blocking::WorkerGuard {
    let log_file = config
        .logging
        .file
        .as_deref()
        .filter(|path| !path.is_empty());

    let writer: Box<dyn std::io::Write + Send + Sync> = match log_file {
        Some(path) if config.logging.enable_rotation => {
            let dir = std::path::Path::new(path)
                .parent()
                .unwrap_or(std::path::Path::new("."));
            let filename = std::path::Path::new(path)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("addrgate.log");
            let appender = rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(filename.trim_end_matches(".log"))
                .filename_suffix("log")
                .max_log_files(config.logging.max_backups as usize)
                .build(dir)
                .expect("Failed to create rolling log appender");
            Box::new(appender)
        }
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .expect("Failed to open log file");
            Box::new(file)
        }
        None => Box::new(std::io::stdout()),
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::new(config.logging.level.clone());

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(log_file.is_none());

    if config.logging.format == "json" {
        subscriber_builder.json().init();
    } else {
        subscriber_builder.init();
    }

    guard
}
