//! Transform types and traits
//!
//! Defines the transformer abstraction shared by the four format strategies.

use crate::contract::{Contract, FileFormat, ProcessingRules};
use crate::error::Result;
use crate::template::{self, DateToken};
use chrono::{Local, SecondsFormat};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default number of rows echoed back in responses
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Everything a transformer needs for one run
#[derive(Debug, Clone)]
pub struct TransformJob<'a> {
    /// Resolved source file
    pub source_path: &'a Path,
    /// Directory target files are written to
    pub target_dir: &'a Path,
    /// Target file name template with a `{date}` placeholder
    pub target_pattern: &'a str,
    /// Date token for the run
    pub date_token: &'a DateToken,
    /// Rule toggles, passed through untouched
    pub rules: &'a ProcessingRules,
    /// Columns a tabular source must carry when `validate_headers` is set
    pub columns_expected: &'a [String],
    /// Column checked by `validate_amounts`
    pub amount_field: &'a str,
    /// ISO 8601 timestamp stamped onto output
    pub processed_at: String,
    /// Maximum sample rows returned
    pub sample_size: usize,
}

impl<'a> TransformJob<'a> {
    /// Build a job for a contract's source file
    pub fn new(
        contract: &'a Contract,
        source_path: &'a Path,
        target_dir: &'a Path,
        date_token: &'a DateToken,
    ) -> Self {
        Self {
            source_path,
            target_dir,
            target_pattern: &contract.target_pattern,
            date_token,
            rules: &contract.processing_rules,
            columns_expected: &contract.columns_expected,
            amount_field: &contract.amount_field,
            processed_at: now_iso8601(),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    /// Override the processing timestamp
    #[must_use]
    pub fn with_processed_at(mut self, processed_at: impl Into<String>) -> Self {
        self.processed_at = processed_at.into();
        self
    }

    /// Override the sample size
    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Concrete target path for this run
    pub fn target_path(&self) -> PathBuf {
        self.target_dir
            .join(template::render(self.target_pattern, self.date_token))
    }

    /// Source file name, for metadata columns
    pub fn source_file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Current local time in ISO 8601 form
pub fn now_iso8601() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// What a transformer produced, before anything touches the target
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    /// Bytes to write to the target file
    pub content: Vec<u8>,
    /// Rows, lines or pages, depending on format
    pub record_count: usize,
    /// Preview of the output
    pub sample_rows: Vec<Value>,
    /// Format-specific extra facts (word counts, sheet counts, ...)
    pub summary: Option<Value>,
}

/// Result of a completed transform
#[derive(Debug, Clone, Serialize)]
pub struct TransformResult {
    /// Rows, lines or pages actually written
    pub record_count: usize,
    /// Preview of the output, capped at the job's sample size
    pub sample_rows: Vec<Value>,
    /// Where the target file was written
    pub output_path: PathBuf,
    /// Source format
    pub format: FileFormat,
    /// Size of the written target in kilobytes, two decimals
    pub size_in_kilobytes: f64,
    /// Format-specific extra facts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
}

/// Convert a byte count to kilobytes rounded to two decimals
pub fn kilobytes(bytes: u64) -> f64 {
    (bytes as f64 / 1024.0 * 100.0).round() / 100.0
}

/// A format-specific transform strategy
pub trait Transformer: Send + Sync {
    /// Format handled by this transformer
    fn format(&self) -> FileFormat;

    /// Read the source, apply rules and return the target bytes.
    ///
    /// Implementations must not write anything; the dispatcher owns the
    /// target file so a failed transform leaves it untouched.
    fn transform(&self, job: &TransformJob<'_>) -> Result<TransformOutput>;
}
