//! Target file read-back and directory listing

use crate::contract::FileFormat;
use crate::error::{Error, Result};
use crate::transform::{count_pages, kilobytes, report_body_lines, Table};
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;

/// A target file decoded for a download response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetDocument {
    /// `{format: "csv"|"json"|"text", ...}`
    pub content: Value,
    /// Rows, lines or pages found in the file
    pub record_count: usize,
    /// File size in kilobytes
    pub file_size_kb: f64,
}

/// Read a target file back into structured JSON.
///
/// `source_format` tells how the record count of a text target is derived
/// (pages for PDF extractions, lines otherwise).
pub fn read_back(path: &Path, source_format: FileFormat) -> Result<TargetDocument> {
    let bytes = std::fs::read(path)?;
    let file_size_kb = kilobytes(bytes.len() as u64);
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    if extension == "csv" {
        let table = Table::from_csv(&bytes, path)?;
        return Ok(TargetDocument {
            record_count: table.len(),
            content: json!({
                "format": "csv",
                "records": table.records(usize::MAX),
                "shape": [table.len(), table.columns.len()],
                "columns": table.columns,
            }),
            file_size_kb,
        });
    }

    let text = String::from_utf8(bytes)
        .map_err(|e| Error::malformed(path, format!("target is not valid UTF-8: {e}")))?;

    if let Ok(data) = serde_json::from_str::<Value>(&text) {
        return Ok(TargetDocument {
            record_count: json_record_count(&data),
            content: json!({ "format": "json", "data": data }),
            file_size_kb,
        });
    }

    let record_count = match source_format {
        FileFormat::Pdf => count_pages(&text),
        _ => report_body_lines(&text).unwrap_or_else(|| text.lines().count()),
    };

    Ok(TargetDocument {
        record_count,
        content: json!({ "format": "text", "content": text }),
        file_size_kb,
    })
}

/// Record count of a JSON target written by one of the transformers
fn json_record_count(data: &Value) -> usize {
    if let Some(n) = data.get("line_count").and_then(Value::as_u64) {
        return n as usize;
    }
    if let Some(lines) = data.get("parsed_lines").and_then(Value::as_array) {
        return lines.len();
    }
    if data.get("metadata").and_then(|m| m.get("sheet_count")).is_some() {
        return data
            .as_object()
            .into_iter()
            .flat_map(|obj| obj.values())
            .filter_map(|sheet| sheet.get("shape")?.get(0)?.as_u64())
            .sum::<u64>() as usize;
    }
    match data {
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

/// MIME type to serve a file with
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => "text/csv; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        _ => "application/octet-stream",
    }
}

/// A file present in one of the system directories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEntry {
    pub filename: String,
    pub size_kb: f64,
    pub modified: Option<String>,
}

/// List regular, non-hidden files in a directory, sorted by name.
///
/// A missing directory lists as empty.
pub fn list_files(dir: &Path) -> Result<Vec<FileEntry>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let filename = entry.file_name().to_string_lossy().into_owned();
        if filename.starts_with('.') {
            continue;
        }

        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        let modified = metadata
            .modified()
            .ok()
            .map(|t| DateTime::<Local>::from(t).to_rfc3339());

        files.push(FileEntry {
            filename,
            size_kb: kilobytes(metadata.len()),
            modified,
        });
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(files)
}
