//! Result assembler
//!
//! Packages a transform result together with contract metadata into the
//! document returned to callers of an upload.

use crate::contract::{Contract, FileFormat};
use crate::resolve::ResolvedFile;
use crate::transform::TransformResult;
use serde::Serialize;
use serde_json::Value;

/// Response document for a completed upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReport {
    pub status: &'static str,
    pub endpoint: String,
    pub description: String,
    pub source_file: String,
    pub target_file: String,
    pub target_path: String,
    pub record_count: usize,
    pub format: FileFormat,
    pub processed_at: String,
    pub file_size_kb: f64,
    pub sample_data: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
}

/// Build the upload response. Pure: reads nothing, writes nothing.
pub fn assemble(
    contract: &Contract,
    resolved: &ResolvedFile,
    result: TransformResult,
    processed_at: impl Into<String>,
    sample_size: usize,
) -> UploadReport {
    let target_file = result
        .output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut sample_data = result.sample_rows;
    sample_data.truncate(sample_size);

    UploadReport {
        status: "success",
        endpoint: contract.name.clone(),
        description: contract.description.clone(),
        source_file: resolved.file_name(),
        target_file,
        target_path: result.output_path.display().to_string(),
        record_count: result.record_count,
        format: result.format,
        processed_at: processed_at.into(),
        file_size_kb: result.size_in_kilobytes,
        sample_data,
        summary: result.summary,
    }
}
