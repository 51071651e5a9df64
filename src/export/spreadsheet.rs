//! Single-sheet CSV export: one header row, one data row.

use csv::{Terminator, WriterBuilder};

use super::{fields, file_name, ExportContext, ExportError, ExportFile, ExportFormat};
use crate::model::ExecutionRecord;

/// One header row and one data row, CRLF-terminated, quoted only where a cell
/// needs it.
pub fn to_spreadsheet(
    record: &ExecutionRecord,
    context: ExportContext,
) -> Result<ExportFile, ExportError> {
    let fields = fields(record, context, ExportFormat::Spreadsheet);

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(fields.iter().map(|(label, _)| *label))?;
    writer.write_record(fields.iter().map(|(_, value)| value.as_str()))?;
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;

    Ok(ExportFile {
        file_name: file_name(record, context, ExportFormat::Spreadsheet),
        bytes,
    })
}
