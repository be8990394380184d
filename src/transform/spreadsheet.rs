//! Excel transformer
//!
//! Reads every sheet of a workbook, treating the first row of each sheet as
//! its header. With `flatten_sheets` the sheets are stacked into one CSV
//! table tagged with a `source_sheet` column; without it a JSON document
//! keyed by sheet name is written instead.

use super::delimited::PROCESSED_AT_COLUMN;
use super::table::{row_to_record, Table};
use super::types::{TransformJob, TransformOutput, Transformer};
use crate::contract::FileFormat;
use crate::error::{Error, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDateTime, NaiveTime};
use serde_json::{json, Map, Value};

/// Column naming the sheet a flattened row came from
pub const SOURCE_SHEET_COLUMN: &str = "source_sheet";

/// One worksheet read into memory
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub table: Table,
}

/// Transformer for Excel workbooks
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelTransformer;

impl Transformer for ExcelTransformer {
    fn format(&self) -> FileFormat {
        FileFormat::Excel
    }

    fn transform(&self, job: &TransformJob<'_>) -> Result<TransformOutput> {
        let sheets = read_sheets(job)?;
        let record_count = sheets.iter().map(|s| s.table.len()).sum();

        let summary = json!({
            "sheet_count": sheets.len(),
            "sheets": sheets
                .iter()
                .map(|s| json!({ "name": s.name, "rows": s.table.len() }))
                .collect::<Vec<_>>(),
        });

        let (content, sample_rows) = if job.rules.flatten_sheets {
            let mut table = flatten(&sheets);
            if job.rules.add_timestamp {
                table.push_constant_column(PROCESSED_AT_COLUMN, &job.processed_at);
            }
            (table.to_csv(&job.target_path())?, table.records(job.sample_size))
        } else {
            let doc = sheets_document(&sheets, job);
            let sample: Vec<Value> = sheets
                .iter()
                .flat_map(|s| {
                    s.table.rows.iter().map(move |row| {
                        let mut record = row_to_record(&s.table.columns, row);
                        record[SOURCE_SHEET_COLUMN] = Value::String(s.name.clone());
                        record
                    })
                })
                .take(job.sample_size)
                .collect();
            (serde_json::to_vec_pretty(&doc)?, sample)
        };

        tracing::debug!(
            source = %job.source_path.display(),
            sheets = sheets.len(),
            record_count,
            "Excel transform complete"
        );

        Ok(TransformOutput {
            content,
            record_count,
            sample_rows,
            summary: Some(summary),
        })
    }
}

/// Open the workbook and read every sheet
fn read_sheets(job: &TransformJob<'_>) -> Result<Vec<Sheet>> {
    let mut workbook = open_workbook_auto(job.source_path)
        .map_err(|e| Error::malformed(job.source_path, format!("not a readable workbook: {e}")))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| Error::malformed(job.source_path, format!("sheet '{name}': {e}")))?;

        let mut rows = range.rows();
        let table = match rows.next() {
            Some(header) => {
                let columns = header
                    .iter()
                    .enumerate()
                    .map(|(i, cell)| match cell_text(cell) {
                        h if h.trim().is_empty() => format!("column_{i}"),
                        h => h,
                    })
                    .collect();
                let mut table = Table::with_columns(columns);
                table.rows = rows
                    .map(|row| row.iter().map(cell_text).collect())
                    .collect();
                table
            }
            None => Table::default(),
        };

        sheets.push(Sheet { name, table });
    }

    Ok(sheets)
}

/// Text form of a cell; date cells become ISO 8601
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) => s.clone(),
        Data::DateTime(dt) if !dt.is_duration() => dt
            .as_datetime()
            .map_or_else(|| cell.to_string(), format_datetime),
        other => other.to_string(),
    }
}

/// Date only at midnight, date and time otherwise
fn format_datetime(value: NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Stack sheets into one table over the union of their columns
pub fn flatten(sheets: &[Sheet]) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for sheet in sheets {
        for column in &sheet.table.columns {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
    }

    let mut table = Table::with_columns(columns.clone());
    table.columns.push(SOURCE_SHEET_COLUMN.to_string());

    for sheet in sheets {
        let positions: Vec<Option<usize>> = columns
            .iter()
            .map(|c| sheet.table.column_index(c))
            .collect();

        for row in &sheet.table.rows {
            let mut unified: Vec<String> = positions
                .iter()
                .map(|pos| pos.and_then(|i| row.get(i)).cloned().unwrap_or_default())
                .collect();
            unified.push(sheet.name.clone());
            table.rows.push(unified);
        }
    }

    table
}

/// JSON document keyed by sheet name
fn sheets_document(sheets: &[Sheet], job: &TransformJob<'_>) -> Value {
    let mut doc = Map::new();
    for sheet in sheets {
        let data: Vec<Value> = sheet.table.records(usize::MAX);
        doc.insert(
            sheet.name.clone(),
            json!({
                "data": data,
                "shape": [sheet.table.len(), sheet.table.columns.len()],
                "columns": sheet.table.columns,
            }),
        );
    }
    doc.insert(
        "metadata".to_string(),
        json!({
            "sheet_count": sheets.len(),
            "processed_at": job.processed_at,
            "source_file": job.source_file_name(),
        }),
    );
    Value::Object(doc)
}
