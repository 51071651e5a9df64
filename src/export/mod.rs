//! Single-execution export to spreadsheet (CSV) and text documents.
//!
//! Two call sites decide the field set: the quick download from the execution
//! list, and the download from the detail table.

pub mod document;
pub mod spreadsheet;

pub use self::document::to_document;
pub use self::spreadsheet::to_spreadsheet;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

use crate::model::ExecutionRecord;

/// File name used by detail-table exports.
pub const DETAIL_FILE_STEM: &str = "execution_data";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode export: {0}")]
    Encode(#[from] std::fmt::Error),

    #[error("failed to encode spreadsheet: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to move export into place at {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the export was triggered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportContext {
    /// Quick download from the execution list; named after the record.
    List,
    /// Download from the detail table; fixed generic name.
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Spreadsheet,
    Document,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "csv",
            ExportFormat::Document => "txt",
        }
    }
}

impl FromStr for ExportContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "list" => Ok(ExportContext::List),
            "detail" => Ok(ExportContext::Detail),
            other => Err(format!("unknown export context '{}', expected list or detail", other)),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spreadsheet" | "csv" | "excel" => Ok(ExportFormat::Spreadsheet),
            "document" | "txt" | "pdf" => Ok(ExportFormat::Document),
            other => Err(format!(
                "unknown export format '{}', expected spreadsheet or document",
                other
            )),
        }
    }
}

/// An encoded export, not yet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A header label and the cell text under it.
pub type Field = (&'static str, String);

/// Fields written for `record` in `context`, in column order.
pub fn fields(record: &ExecutionRecord, context: ExportContext, format: ExportFormat) -> Vec<Field> {
    let id = record
        .execution_id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    let text = |v: &Option<String>| v.clone().unwrap_or_default();

    match (context, format) {
        (ExportContext::List, ExportFormat::Spreadsheet) => vec![
            ("ExecutionID", id),
            ("Name", record.name().to_string()),
            ("Status", record.status.to_string()),
            ("StartTime", text(&record.start_time)),
            ("EndTime", text(&record.end_time)),
        ],
        (ExportContext::List, ExportFormat::Document) => vec![
            ("Name", record.name().to_string()),
            ("Status", record.status.to_string()),
            ("Start Time", text(&record.start_time)),
            ("End Time", text(&record.end_time)),
        ],
        (ExportContext::Detail, _) => vec![
            ("Execution ID", id),
            ("Name", record.name().to_string()),
            ("Status", record.status.to_string()),
            ("Start Time", text(&record.start_time)),
            ("End Time", text(&record.end_time)),
            ("Total Test Cases", record.test_cases().to_string()),
            ("Passed", record.passed().to_string()),
            ("Failed", record.failed().to_string()),
            ("Incomplete", record.incomplete().to_string()),
        ],
    }
}

/// `<Name>.<ext>` for list exports, `execution_data.<ext>` for detail exports.
pub fn file_name(record: &ExecutionRecord, context: ExportContext, format: ExportFormat) -> String {
    let stem = match context {
        ExportContext::List => sanitize_stem(record.name()),
        ExportContext::Detail => DETAIL_FILE_STEM.to_string(),
    };
    format!("{}.{}", stem, format.extension())
}

fn sanitize_stem(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "execution".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn render(
    record: &ExecutionRecord,
    context: ExportContext,
    format: ExportFormat,
) -> Result<ExportFile, ExportError> {
    match format {
        ExportFormat::Spreadsheet => to_spreadsheet(record, context),
        ExportFormat::Document => to_document(record, context),
    }
}

/// Write `file` into `dir` and return its final path.
///
/// Bytes go to a temporary file in `dir` first and are renamed into place, so
/// a failed export leaves nothing under the final name.
pub fn save(file: &ExportFile, dir: &Path) -> Result<PathBuf, ExportError> {
    let target = dir.join(&file.file_name);

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&file.bytes)?;
    tmp.as_file().sync_all()?;
    // Dropping the returned temp file on failure deletes it.
    tmp.persist(&target).map_err(|e| ExportError::Persist {
        path: target.clone(),
        source: e.error,
    })?;

    info!(path = %target.display(), bytes = file.bytes.len(), "export written");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    fn record() -> ExecutionRecord {
        ExecutionRecord::new(12, "Regression", Status::Failed)
            .with_counts(20, 15, 4, 1)
            .with_times(Some("2024-05-01T10:00:00Z"), Some("2024-05-01T11:00:00Z"))
    }

    fn labels(fields: &[Field]) -> Vec<&'static str> {
        fields.iter().map(|(label, _)| *label).collect()
    }

    #[test]
    fn test_list_spreadsheet_fields() {
        let f = fields(&record(), ExportContext::List, ExportFormat::Spreadsheet);
        assert_eq!(
            labels(&f),
            vec!["ExecutionID", "Name", "Status", "StartTime", "EndTime"]
        );
        assert_eq!(f[0].1, "12");
    }

    #[test]
    fn test_list_document_fields() {
        let f = fields(&record(), ExportContext::List, ExportFormat::Document);
        assert_eq!(labels(&f), vec!["Name", "Status", "Start Time", "End Time"]);
    }

    #[test]
    fn test_detail_fields_same_for_both_formats() {
        let a = fields(&record(), ExportContext::Detail, ExportFormat::Spreadsheet);
        let b = fields(&record(), ExportContext::Detail, ExportFormat::Document);
        assert_eq!(a, b);
        assert_eq!(
            labels(&a),
            vec![
                "Execution ID",
                "Name",
                "Status",
                "Start Time",
                "End Time",
                "Total Test Cases",
                "Passed",
                "Failed",
                "Incomplete"
            ]
        );
        assert_eq!(a[5].1, "20");
    }

    #[test]
    fn test_missing_values_are_blank() {
        let mut r = ExecutionRecord::new(1, "x", Status::Incomplete);
        r.execution_id = None;
        let f = fields(&r, ExportContext::Detail, ExportFormat::Spreadsheet);
        assert_eq!(f[0].1, "");
        assert_eq!(f[4].1, "");
        assert_eq!(f[6].1, "0");
    }

    #[test]
    fn test_file_names() {
        let r = record();
        assert_eq!(
            file_name(&r, ExportContext::List, ExportFormat::Spreadsheet),
            "Regression.csv"
        );
        assert_eq!(
            file_name(&r, ExportContext::Detail, ExportFormat::Document),
            "execution_data.txt"
        );
    }

    #[test]
    fn test_file_name_sanitized() {
        let r = ExecutionRecord::new(1, "../etc/passwd", Status::Passed);
        assert_eq!(
            file_name(&r, ExportContext::List, ExportFormat::Document),
            "_etc_passwd.txt"
        );

        let unnamed = ExecutionRecord::new(2, "  ", Status::Passed);
        assert_eq!(
            file_name(&unnamed, ExportContext::List, ExportFormat::Spreadsheet),
            "execution.csv"
        );
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = render(&record(), ExportContext::List, ExportFormat::Document).unwrap();

        let path = save(&file, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Regression.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), file.bytes);

        // Only the final file remains.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_failure_leaves_nothing_behind() {
        let dir = tempfile::TempDir::new().unwrap();
        // A directory squatting on the target name makes the rename fail.
        std::fs::create_dir(dir.path().join("execution_data.csv")).unwrap();
        let file = render(&record(), ExportContext::Detail, ExportFormat::Spreadsheet).unwrap();

        let err = save(&file, dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::Persist { .. }));

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("execution_data.csv")]);
        assert!(dir.path().join("execution_data.csv").is_dir());
    }

    #[test]
    fn test_save_into_missing_directory_is_io_error() {
        let file = render(&record(), ExportContext::List, ExportFormat::Spreadsheet).unwrap();
        let err = save(&file, Path::new("/nonexistent/exports")).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }

    #[test]
    fn test_parse_format_and_context() {
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Spreadsheet);
        assert_eq!("Document".parse::<ExportFormat>().unwrap(), ExportFormat::Document);
        assert_eq!("detail".parse::<ExportContext>().unwrap(), ExportContext::Detail);
        assert!("zip".parse::<ExportFormat>().is_err());
    }
}
