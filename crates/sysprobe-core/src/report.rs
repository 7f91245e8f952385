//! CSV report output.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::{Result, SysprobeError};
use crate::types::ResultLog;

/// Report header row.
pub const HEADER: [&str; 3] = ["Test", "Status", "Details"];

/// Write `log` to `path`, replacing any previous report.
///
/// The file is closed when this returns, on success or failure.
///
/// # Errors
///
/// Returns `ReportWriteFailed` if the file cannot be created or written.
pub fn write_report(path: &Path, log: &ResultLog) -> Result<()> {
    info!("Generating test report.");

    let wrap = |source: csv::Error| SysprobeError::ReportWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| wrap(e.into()))?;
    write_report_to(file, log).map_err(wrap)?;

    info!("Test report generated: {}", path.display());
    Ok(())
}

/// Serialize `log` as CSV into any writer.
///
/// The header is always written, even for an empty log.
///
/// # Errors
///
/// Returns the underlying CSV or I/O error.
pub fn write_report_to<W: Write>(sink: W, log: &ResultLog) -> std::result::Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);

    writer.write_record(HEADER)?;
    for record in log {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutcomeRecord, TestStatus};

    fn sample_log() -> ResultLog {
        let mut log = ResultLog::new();
        log.push(OutcomeRecord::new(
            "Wi-Fi Connectivity",
            TestStatus::Pass,
            "Ping response: 12.5 ms",
        ));
        log.push(OutcomeRecord::new(
            "Bluetooth Discovery",
            TestStatus::Pass,
            "Devices: [('Speaker', 'AA:BB:CC:DD:EE:FF'), (None, '11:22:33:44:55:66')]",
        ));
        log.push(OutcomeRecord::new(
            "Simultaneous Operations",
            TestStatus::Fail,
            "Operation failed during simultaneous execution.",
        ));
        log
    }

    fn render(log: &ResultLog) -> String {
        let mut buf = Vec::new();
        write_report_to(&mut buf, log).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_and_one_row_per_record() {
        let output = render(&sample_log());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Test,Status,Details");
        assert_eq!(lines[1], "Wi-Fi Connectivity,Pass,Ping response: 12.5 ms");
        assert_eq!(
            lines[3],
            "Simultaneous Operations,Fail,Operation failed during simultaneous execution."
        );
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let output = render(&sample_log());
        let row = output.lines().nth(2).unwrap();
        assert_eq!(
            row,
            r#"Bluetooth Discovery,Pass,"Devices: [('Speaker', 'AA:BB:CC:DD:EE:FF'), (None, '11:22:33:44:55:66')]""#
        );
    }

    #[test]
    fn test_empty_log_still_has_header() {
        assert_eq!(render(&ResultLog::new()), "Test,Status,Details\n");
    }

    #[test]
    fn test_write_report_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_report.csv");
        std::fs::write(&path, "stale\nstale\nstale\nstale\nstale\nstale\n").unwrap();

        write_report(&path, &sample_log()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert!(!content.contains("stale"));
    }

    #[test]
    fn test_unwritable_path_is_report_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.csv");

        let err = write_report(&path, &sample_log()).unwrap_err();
        assert_eq!(err.error_code(), "REPORT_WRITE_FAILED");
        assert!(err.is_fatal());
    }
}
