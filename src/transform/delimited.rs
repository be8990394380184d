//! CSV transformer
//!
//! Card masking, amount validation, timestamping and metadata columns over a
//! headed CSV table. Output is CSV again.

use super::table::Table;
use super::types::{TransformJob, TransformOutput, Transformer};
use crate::contract::FileFormat;
use crate::error::{Error, Result};
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use std::sync::LazyLock;

/// Any run of ASCII digits; length is checked in the replacer.
/// ASCII only, so byte length equals digit count.
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Card number lengths that get masked
const CARD_DIGITS: std::ops::RangeInclusive<usize> = 13..=19;

/// Column added by `add_timestamp`
pub const PROCESSED_AT_COLUMN: &str = "processed_at";

/// Transformer for comma separated sources
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTransformer;

impl Transformer for CsvTransformer {
    fn format(&self) -> FileFormat {
        FileFormat::Csv
    }

    fn transform(&self, job: &TransformJob<'_>) -> Result<TransformOutput> {
        let data = std::fs::read(job.source_path)?;
        let mut table = Table::from_csv(&data, job.source_path)?;
        let rows_read = table.len();
        let rules = job.rules;

        if rules.validate_headers {
            let missing: Vec<&str> = job
                .columns_expected
                .iter()
                .filter(|c| table.column_index(c).is_none())
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                return Err(Error::malformed(
                    job.source_path,
                    format!("missing expected columns: {}", missing.join(", ")),
                ));
            }
        }

        if rules.validate_amounts {
            if let Some(idx) = table.column_index(job.amount_field) {
                table
                    .rows
                    .retain(|row| row.get(idx).is_some_and(|v| is_valid_amount(v)));
            }
        }

        if rules.mask_card_numbers {
            for row in &mut table.rows {
                for cell in row.iter_mut() {
                    *cell = mask_card_numbers(cell);
                }
            }
        }

        if rules.add_timestamp {
            table.push_constant_column(PROCESSED_AT_COLUMN, &job.processed_at);
        }

        if rules.add_metadata {
            table.push_constant_column("file_source", &job.source_file_name());
            table.push_constant_column("processing_date", job.date_token.as_str());
        }

        let rows_dropped = rows_read - table.len();
        tracing::debug!(
            source = %job.source_path.display(),
            rows_read,
            rows_dropped,
            "CSV transform complete"
        );

        Ok(TransformOutput {
            content: table.to_csv(&job.target_path())?,
            record_count: table.len(),
            sample_rows: table.records(job.sample_size),
            summary: Some(json!({
                "rows_read": rows_read,
                "rows_dropped": rows_dropped,
                "columns": table.columns,
            })),
        })
    }
}

/// Mask every 13-19 digit run down to its first and last four digits
pub fn mask_card_numbers(value: &str) -> String {
    DIGIT_RUN
        .replace_all(value, |caps: &Captures<'_>| {
            let run = &caps[0];
            if CARD_DIGITS.contains(&run.len()) {
                format!("{}****{}", &run[..4], &run[run.len() - 4..])
            } else {
                run.to_string()
            }
        })
        .into_owned()
}

/// True when the value parses as a non-negative decimal
pub fn is_valid_amount(value: &str) -> bool {
    Decimal::from_str(value.trim()).is_ok_and(|amount| amount >= Decimal::ZERO)
}
