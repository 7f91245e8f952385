//! Diagnostic log initialization.
//!
//! Every event goes to two sinks with the same line format,
//! `<timestamp> - <LEVEL> - <message>`:
//! - the log file, opened in append mode
//! - stdout

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Fallback level variable when `RUST_LOG` is unset.
pub const LOG_LEVEL_ENV: &str = "SYSPROBE_LOG_LEVEL";

/// Keeps the non-blocking writers alive.
///
/// Buffered lines are flushed when this is dropped, so hold it until the run
/// has finished.
#[must_use = "dropping the guards stops the log writers"]
#[derive(Debug)]
pub struct LoggingGuards {
    _file: WorkerGuard,
    _stdout: WorkerGuard,
}

/// Formats events as `2025-01-15 03:30:00,123 - INFO - message`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashFormat;

impl<S, N> FormatEvent<S, N> for DashFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Initialize logging to `log_file` and stdout.
///
/// # Errors
///
/// Returns an error if the env filter cannot be parsed, the log file cannot
/// be opened, or a global subscriber is already installed.
pub fn init(log_file: &Path) -> anyhow::Result<LoggingGuards> {
    let log_level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender(log_file)?);
    let (non_blocking_stdout, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(DashFormat)
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(DashFormat)
        .with_writer(non_blocking_stdout)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(LoggingGuards {
        _file: file_guard,
        _stdout: stdout_guard,
    })
}

/// Open `log_file` for appending, creating its directory if needed.
fn file_appender(log_file: &Path) -> anyhow::Result<RollingFileAppender> {
    let (dir, file_name) = split_log_path(log_file);

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(&dir)
        .with_context(|| format!("failed to open log file {}", log_file.display()))
}

/// Split a log path into the directory to create and the file name to append to.
fn split_log_path(log_file: &Path) -> (PathBuf, PathBuf) {
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let file_name = log_file
        .file_name()
        .map_or_else(|| PathBuf::from("system_test.log"), PathBuf::from);
    (dir, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bare_file_name() {
        let (dir, name) = split_log_path(Path::new("system_test.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, PathBuf::from("system_test.log"));
    }

    #[test]
    fn test_split_nested_path() {
        let (dir, name) = split_log_path(Path::new("/var/log/sysprobe/run.log"));
        assert_eq!(dir, PathBuf::from("/var/log/sysprobe"));
        assert_eq!(name, PathBuf::from("run.log"));
    }

    #[test]
    fn test_file_appender_unopenable_path_is_error() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let log_file = blocker.path().join("nested").join("system_test.log");

        let err = file_appender(&log_file).unwrap_err();
        assert!(err.to_string().contains("failed to create log directory"));
    }

    #[test]
    fn test_file_appender_appends_across_opens() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("logs").join("system_test.log");

        for line in ["first run\n", "second run\n"] {
            let mut appender = file_appender(&log_file).unwrap();
            appender.write_all(line.as_bytes()).unwrap();
            appender.flush().unwrap();
        }

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert_eq!(content, "first run\nsecond run\n");
    }

    #[test]
    fn test_dash_format_line_shape() {
        use std::sync::{Arc, Mutex};
        use tracing_subscriber::fmt::MakeWriter;

        #[derive(Clone, Default)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        impl<'a> MakeWriter<'a> for Capture {
            type Writer = Self;
            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        let capture = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .event_format(DashFormat)
            .with_writer(capture.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("Wi-Fi test failed: No response from server.");
        });

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(output.ends_with(" - ERROR - Wi-Fi test failed: No response from server.\n"));
        let timestamp = output.split(" - ").next().unwrap();
        assert_eq!(timestamp.len(), "2025-01-15 03:30:00,123".len());
    }
}
