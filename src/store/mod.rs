//! Store module
//!
//! Handles the flat-file directories of System A (sources) and System B
//! (targets).
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Writing target files atomically (temp file, then rename)
//! - Reading target files back into structured JSON for downloads
//! - Listing directory contents for status reports

mod reader;
mod writer;

pub use reader::{content_type_for, list_files, read_back, FileEntry, TargetDocument};
pub use writer::write_atomic;

#[cfg(test)]
mod tests;
