// TraceSweep - core/export.rs
//
// Text, CSV and JSON rendering of scan reports.
// Core layer: writes to any Write implementation.

use crate::core::model::ScanReport;
use crate::util::error::ExportError;
use std::io::Write;

/// Plain listing grouped by check. Returns the number of files written.
pub fn write_text<W: Write>(report: &ScanReport, mut writer: W) -> Result<usize, ExportError> {
    let io_err = |source: std::io::Error| ExportError::Io { source };

    if report.is_empty() {
        writeln!(writer, "No matching files found under {}", report.root).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        return Ok(0);
    }

    for check in &report.checks {
        if check.files.is_empty() {
            continue;
        }
        writeln!(writer, "[{}] {} file(s)", check.name, check.files.len()).map_err(io_err)?;
        for file in &check.files {
            writeln!(writer, "  {file}").map_err(io_err)?;
        }
    }
    writeln!(
        writer,
        "{} file(s) found under {}",
        report.total_files, report.root
    )
    .map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    Ok(report.total_files)
}

/// One `check,path` row per file, with a header.
pub fn write_csv<W: Write>(report: &ScanReport, writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["check", "path"])
        .map_err(|source| ExportError::Csv { source })?;

    let mut count = 0;
    for check in &report.checks {
        for file in &check.files {
            csv_writer
                .write_record([check.name.as_str(), file.path()])
                .map_err(|source| ExportError::Csv { source })?;
            count += 1;
        }
    }

    csv_writer
        .flush()
        .map_err(|source| ExportError::Io { source })?;

    Ok(count)
}

/// The whole report as pretty-printed JSON.
pub fn write_json<W: Write>(report: &ScanReport, writer: W) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, report).map_err(|source| ExportError::Json { source })?;
    Ok(report.total_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{CheckResult, FileInfo};

    fn make_report() -> ScanReport {
        ScanReport::new(
            "/",
            vec![
                CheckResult {
                    name: "system_logs".to_string(),
                    files: vec![
                        FileInfo::from_relative("var/log/syslog"),
                        FileInfo::from_relative("var/log/kern.log"),
                    ],
                },
                CheckResult {
                    name: "audit_logs".to_string(),
                    files: vec![],
                },
            ],
        )
    }

    #[test]
    fn test_text_export() {
        let mut buf = Vec::new();
        let count = write_text(&make_report(), &mut buf).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("[system_logs] 2 file(s)"));
        assert!(output.contains("  /var/log/syslog"));
        assert!(!output.contains("audit_logs"), "empty checks are skipped");
        assert!(output.contains("2 file(s) found under /"));
    }

    #[test]
    fn test_text_export_empty_report() {
        let report = ScanReport::new(
            "/mnt/image",
            vec![CheckResult {
                name: "audit_logs".to_string(),
                files: vec![],
            }],
        );
        let mut buf = Vec::new();
        let count = write_text(&report, &mut buf).unwrap();
        assert_eq!(count, 0);

        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output, "No matching files found under /mnt/image\n");
    }

    #[test]
    fn test_csv_export() {
        let mut buf = Vec::new();
        let count = write_csv(&make_report(), &mut buf).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("check,path"));
        assert!(output.contains("system_logs,/var/log/kern.log"));
    }

    #[test]
    fn test_json_export() {
        let mut buf = Vec::new();
        let count = write_json(&make_report(), &mut buf).unwrap();
        assert_eq!(count, 2);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["total_files"], 2);
        assert_eq!(value["checks"][0]["files"][0], "/var/log/syslog");
        assert!(value["generated_at"].is_string());
    }
}
