//! Format transform module
//!
//! Supports: CSV, TXT, PDF, Excel
//!
//! # Overview
//!
//! A transform reads a resolved source file, applies the contract's
//! processing rules and produces the bytes of the target file. The
//! dispatcher picks the transformer from the closed `FileFormat` enum, then
//! writes the target atomically. A transform that fails writes nothing.

mod delimited;
mod dispatch;
mod pdf;
mod spreadsheet;
mod table;
mod text;
mod types;

pub use delimited::{is_valid_amount, mask_card_numbers, CsvTransformer, PROCESSED_AT_COLUMN};
pub use dispatch::{dispatch, dispatch_tag, transformer_for};
pub use pdf::{count_pages, join_pages, PdfTransformer, PAGE_BREAK};
pub use spreadsheet::{flatten, ExcelTransformer, Sheet, SOURCE_SHEET_COLUMN};
pub use table::{cell_value, Table};
pub use text::{report_body_lines, TextStats, TextTransformer, REPORT_SEPARATOR};
pub use types::{
    kilobytes, now_iso8601, TransformJob, TransformOutput, TransformResult, Transformer,
    DEFAULT_SAMPLE_SIZE,
};
