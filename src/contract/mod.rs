//! Contract module
//!
//! A contract ties an endpoint name to a source file pattern, a target file
//! pattern, a declared format and a set of processing rules.
//!
//! # Overview
//!
//! The contract module provides:
//! - `Contract` - Validated, immutable contract record
//! - `ProcessingRules` - Closed set of per-format toggles
//! - `FileFormat` - The four supported source formats
//! - `ContractRegistry` - Read-only lookup table loaded from YAML

mod registry;
mod types;

pub use registry::ContractRegistry;
pub use types::{Contract, ContractDefinition, ContractsFile, FileFormat, ProcessingRules};

#[cfg(test)]
mod tests;
