//! Contract types
//!
//! Declarative contract definitions for YAML parsing, and the validated
//! `Contract` the rest of the service works with.

use crate::error::{Error, Result};
use crate::template::{self, DateToken};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// File Format
// ============================================================================

/// Declared format of a contract's source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Comma separated values
    Csv,
    /// Plain UTF-8 text
    Txt,
    /// PDF document, text extraction only
    Pdf,
    /// Excel workbook (xlsx, xlsm, xls, ods)
    Excel,
}

impl FileFormat {
    /// Every supported format
    pub const ALL: [FileFormat; 4] = [Self::Csv, Self::Txt, Self::Pdf, Self::Excel];

    /// Canonical tag used in contracts
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Pdf => "pdf",
            Self::Excel => "excel",
        }
    }
}

impl FromStr for FileFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "txt" | "text" => Ok(Self::Txt),
            "pdf" => Ok(Self::Pdf),
            "excel" | "xlsx" | "xls" => Ok(Self::Excel),
            _ => Err(Error::unsupported_format(s)),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Processing Rules
// ============================================================================

/// Per-contract transformation toggles.
///
/// The flag set is closed: unknown keys in a contract file are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingRules {
    /// CSV: mask 13-19 digit runs down to first and last four digits
    pub mask_card_numbers: bool,
    /// CSV: drop rows whose amount is not a non-negative decimal
    pub validate_amounts: bool,
    /// CSV/Excel: append a `processed_at` column
    pub add_timestamp: bool,
    /// CSV: append `file_source` and `processing_date` columns
    pub add_metadata: bool,
    /// CSV: require every expected column to be present
    pub validate_headers: bool,
    /// TXT: write a JSON document instead of text
    pub convert_to_json: bool,
    /// TXT: include a summary object in the JSON document
    pub add_summary: bool,
    /// TXT: write one structured entry per line
    pub parse_lines: bool,
    /// PDF: extract page text
    pub extract_text: bool,
    /// PDF: report word/character/line counts
    pub create_summary: bool,
    /// Excel: concatenate all sheets into one CSV table
    pub flatten_sheets: bool,
}

// ============================================================================
// Contract Definition
// ============================================================================

/// Top-level contracts file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsFile {
    /// Contract definitions, in display order
    pub contracts: Vec<ContractDefinition>,
}

/// A contract as written in YAML, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContractDefinition {
    /// Endpoint name
    pub name: String,
    /// Source file name template
    pub file_pattern: String,
    /// Target file name template
    pub target_pattern: String,
    /// Format tag
    pub format: String,
    /// Human readable description
    #[serde(default)]
    pub description: String,
    /// Columns a CSV source is expected to carry
    #[serde(default)]
    pub columns_expected: Vec<String>,
    /// Column checked by `validate_amounts`
    #[serde(default = "default_amount_field")]
    pub amount_field: String,
    /// Transformation toggles
    #[serde(default)]
    pub processing_rules: ProcessingRules,
}

fn default_amount_field() -> String {
    "amount".to_string()
}

// ============================================================================
// Contract
// ============================================================================

/// Validated, immutable contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contract {
    pub name: String,
    pub file_pattern: String,
    pub target_pattern: String,
    pub format: FileFormat,
    pub description: String,
    pub columns_expected: Vec<String>,
    pub amount_field: String,
    pub processing_rules: ProcessingRules,
}

impl Contract {
    /// Source file name for a date
    pub fn source_file_name(&self, token: &DateToken) -> String {
        template::render(&self.file_pattern, token)
    }

    /// Target file name for a date
    pub fn target_file_name(&self, token: &DateToken) -> String {
        template::render(&self.target_pattern, token)
    }
}

impl TryFrom<ContractDefinition> for Contract {
    type Error = Error;

    fn try_from(def: ContractDefinition) -> Result<Self> {
        if def.name.trim().is_empty() {
            return Err(Error::config("Contract name cannot be empty"));
        }

        template::validate_pattern(&def.file_pattern)
            .map_err(|e| Error::config(format!("Contract '{}': {e}", def.name)))?;
        template::validate_pattern(&def.target_pattern)
            .map_err(|e| Error::config(format!("Contract '{}': {e}", def.name)))?;

        let format = def.format.parse::<FileFormat>()?;

        Ok(Self {
            name: def.name,
            file_pattern: def.file_pattern,
            target_pattern: def.target_pattern,
            format,
            description: def.description,
            columns_expected: def.columns_expected,
            amount_field: def.amount_field,
            processing_rules: def.processing_rules,
        })
    }
}
