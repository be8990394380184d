//! Engine types
//!
//! Documents returned by the exchange engine. All of them serialize
//! straight into HTTP response bodies.

use crate::contract::Contract;
use crate::config::ServiceConfig;
use crate::store::FileEntry;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Response document for a download
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadDocument {
    pub status: &'static str,
    pub endpoint: String,
    pub description: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size_kb: f64,
    pub downloaded_at: String,
    /// Rows, lines or pages found in the target file
    pub record_count: usize,
    /// Target decoded as `{format: "csv"|"json"|"text", ...}`
    pub content: Value,
    /// Where the raw target can be fetched
    pub download_url: String,
}

/// Raw bytes of a source or target file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub file_name: String,
    pub path: PathBuf,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Liveness document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: String,
    pub system_a_accessible: bool,
    pub system_b_accessible: bool,
    pub today_date: String,
    pub contracts_loaded: usize,
}

/// The registry as served to callers
#[derive(Debug, Clone, Serialize)]
pub struct ContractsDocument {
    pub contracts: BTreeMap<String, Contract>,
    pub base_config: ServiceConfig,
    pub today_date: String,
    pub usage: BTreeMap<&'static str, &'static str>,
}

/// Files present in one system directory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryListing {
    pub path: String,
    pub file_count: usize,
    pub files: Vec<FileEntry>,
}

/// Expected files of one contract for a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractStatus {
    pub input_expected: String,
    pub output_pattern: String,
    pub input_exists: bool,
    pub output_exists: bool,
}

/// Snapshot of both directories and every contract's files
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStatus {
    pub today_date: String,
    pub system_a: DirectoryListing,
    pub system_b: DirectoryListing,
    pub contracts_status: BTreeMap<String, ContractStatus>,
}
