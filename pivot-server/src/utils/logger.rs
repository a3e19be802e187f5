//! Logging setup
//!
//! fmt subscriber with an env filter; output goes to a daily rolling file
//! when the log directory exists, stdout otherwise. Production emits JSON
//! lines, every other environment the compact human format.

use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Initialize the logger with optional file output
///
/// `RUST_LOG` wins over `log_level` when set. Safe to call more than once;
/// later calls are ignored.
///
/// ```no_run
/// // development: human-readable, stdout
/// pivot_server::init_logger_with_file(Some("debug"), false, None);
///
/// // production: JSON lines into ./logs/pivot-server.YYYY-MM-DD
/// pivot_server::init_logger_with_file(Some("info"), true, Some("./logs"));
/// ```
pub fn init_logger_with_file(log_level: Option<&str>, json_format: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (writer, to_file) = match log_dir {
        Some(dir) if Path::new(dir).is_dir() => (
            BoxMakeWriter::new(tracing_appender::rolling::daily(dir, "pivot-server")),
            true,
        ),
        Some(dir) => {
            eprintln!("Log directory {} does not exist, logging to stdout", dir);
            (BoxMakeWriter::new(std::io::stdout), false)
        }
        None => (BoxMakeWriter::new(std::io::stdout), false),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(!to_file && !json_format);

    let _ = if json_format {
        builder
            .json()
            .with_target(true)
            .with_current_span(true)
            .try_init()
    } else {
        builder
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_target(false)
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_file_logger_initializes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();
        init_logger_with_file(Some("debug"), true, Some(&path));
        tracing::info!(target: "pivot_server", "first line");
        // second call is ignored rather than panicking
        init_logger_with_file(Some("info"), false, None);
    }
}
