//! Fixed-layout text document export.
//!
//! List exports are key/value lines; detail exports are an aligned two-row
//! table.

use std::fmt::Write;

use super::{fields, file_name, ExportContext, ExportError, ExportFile, ExportFormat, Field};
use crate::model::ExecutionRecord;

pub fn to_document(
    record: &ExecutionRecord,
    context: ExportContext,
) -> Result<ExportFile, ExportError> {
    let fields = fields(record, context, ExportFormat::Document);
    let mut out = String::new();

    match context {
        ExportContext::List => write_key_values(&mut out, &fields)?,
        ExportContext::Detail => write_table(&mut out, &fields)?,
    }

    Ok(ExportFile {
        file_name: file_name(record, context, ExportFormat::Document),
        bytes: out.into_bytes(),
    })
}

fn write_key_values(out: &mut String, fields: &[Field]) -> std::fmt::Result {
    for (label, value) in fields {
        writeln!(out, "{}: {}", label, single_line(value))?;
    }
    Ok(())
}

fn write_table(out: &mut String, fields: &[Field]) -> std::fmt::Result {
    let values: Vec<String> = fields.iter().map(|(_, v)| single_line(v)).collect();
    let widths: Vec<usize> = fields
        .iter()
        .zip(&values)
        .map(|((label, _), value)| label.chars().count().max(value.chars().count()))
        .collect();

    let header: Vec<String> = fields
        .iter()
        .zip(&widths)
        .map(|((label, _), w)| format!("{:<w$}", label, w = *w))
        .collect();
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let body: Vec<String> = values
        .iter()
        .zip(&widths)
        .map(|(value, w)| format!("{:<w$}", value, w = *w))
        .collect();

    writeln!(out, "{}", header.join(" | ").trim_end())?;
    writeln!(out, "{}", rule.join("-+-"))?;
    writeln!(out, "{}", body.join(" | ").trim_end())
}

/// Line breaks inside a value would break the layout.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
