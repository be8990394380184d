//! Exchange engine module
//!
//! Runs the resolve, dispatch, transform and assemble pipeline for a named
//! endpoint, and reads results back for downloads.
//!
//! # Overview
//!
//! The engine module provides:
//! - `ExchangeEngine` - Owns the contract registry and service config
//! - Response documents for downloads, status and health checks
//!
//! Every operation is synchronous and touches the filesystem; async callers
//! run them on a blocking thread.

mod types;

pub use types::{
    ContractStatus, ContractsDocument, DirectoryListing, DownloadDocument, FilePayload,
    HealthReport, SystemStatus,
};

use crate::config::ServiceConfig;
use crate::contract::{Contract, ContractRegistry, FileFormat};
use crate::demo::{self, DemoReport};
use crate::error::{Error, Result};
use crate::report::{self, UploadReport};
use crate::resolve;
use crate::store;
use crate::template::DateToken;
use crate::transform::{self, now_iso8601, TransformJob};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Service name reported by the overview and health documents
pub const SERVICE_NAME: &str = "Banking File Exchange API";

/// File exchange engine shared by the CLI and the HTTP server
#[derive(Debug, Clone)]
pub struct ExchangeEngine {
    /// Read-only contract table
    registry: Arc<ContractRegistry>,
    /// Directory and sampling settings
    config: Arc<ServiceConfig>,
}

impl ExchangeEngine {
    /// Create an engine over an already loaded registry
    pub fn new(registry: Arc<ContractRegistry>, config: ServiceConfig) -> Self {
        Self {
            registry,
            config: Arc::new(config),
        }
    }

    /// Load the registry named by the config (or the built-in set)
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        let registry = ContractRegistry::load(config.contracts_file.as_deref())?;
        info!(
            contracts = registry.len(),
            source = %config.source_dir.display(),
            target = %config.target_dir.display(),
            "Loaded contracts"
        );
        Ok(Self::new(Arc::new(registry), config))
    }

    /// Get the contract registry
    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    /// Get the service config
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Create both system directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config.source_dir)?;
        std::fs::create_dir_all(&self.config.target_dir)?;
        Ok(())
    }

    // ========================================================================
    // Upload / Download
    // ========================================================================

    /// Transform the endpoint's source file for a date into system B
    pub fn upload(&self, endpoint: &str, date: Option<&str>) -> Result<UploadReport> {
        let contract = self.registry.lookup(endpoint)?;
        let token = DateToken::from_option(date)?;
        self.upload_contract(contract, &token)
    }

    fn upload_contract(&self, contract: &Contract, token: &DateToken) -> Result<UploadReport> {
        let start = Instant::now();
        let resolved = resolve::resolve(contract, token, &self.config.source_dir)?;

        let processed_at = now_iso8601();
        let job = TransformJob::new(contract, &resolved.path, &self.config.target_dir, token)
            .with_processed_at(processed_at.clone())
            .with_sample_size(self.config.sample_size);
        let result = transform::dispatch(contract.format, &job)?;

        info!(
            endpoint = %contract.name,
            date = %token,
            records = result.record_count,
            target = %result.output_path.display(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Upload processed"
        );

        Ok(report::assemble(
            contract,
            &resolved,
            result,
            processed_at,
            self.config.sample_size,
        ))
    }

    /// Read the endpoint's target file back, processing the source first
    /// when no target exists yet
    pub fn download(&self, endpoint: &str, date: Option<&str>) -> Result<DownloadDocument> {
        let contract = self.registry.lookup(endpoint)?;
        let token = DateToken::from_option(date)?;
        let file_name = contract.target_file_name(&token);
        let target = self.config.target_dir.join(&file_name);

        if !target.is_file() {
            warn!(
                endpoint = %contract.name,
                file = %file_name,
                "Target missing, processing source first"
            );
            self.upload_contract(contract, &token)?;
        }

        let document = store::read_back(&target, contract.format)?;
        let file_path = std::path::absolute(&target).unwrap_or(target);

        info!(
            endpoint = %contract.name,
            date = %token,
            records = document.record_count,
            "Download served"
        );

        Ok(DownloadDocument {
            status: "success",
            endpoint: contract.name.clone(),
            description: contract.description.clone(),
            file_name,
            file_path: file_path.display().to_string(),
            file_size_kb: document.file_size_kb,
            downloaded_at: now_iso8601(),
            record_count: document.record_count,
            content: document.content,
            download_url: format!("/api/v1/download/{}/file?date={token}", contract.name),
        })
    }

    /// Raw bytes of the endpoint's target file
    pub fn target_file(&self, endpoint: &str, date: Option<&str>) -> Result<FilePayload> {
        let contract = self.registry.lookup(endpoint)?;
        let token = DateToken::from_option(date)?;
        let file_name = contract.target_file_name(&token);
        let path = self.config.target_dir.join(&file_name);

        if !path.is_file() {
            return Err(Error::TargetNotFound { file_name });
        }
        read_payload(file_name, &path)
    }

    /// Raw bytes of the endpoint's source file, unmodified
    pub fn source_file(&self, endpoint: &str, date: Option<&str>) -> Result<FilePayload> {
        let contract = self.registry.lookup(endpoint)?;
        let token = DateToken::from_option(date)?;
        let resolved = resolve::resolve(contract, &token, &self.config.source_dir)?;
        read_payload(resolved.file_name(), &resolved.path)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Liveness document
    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "healthy",
            timestamp: now_iso8601(),
            system_a_accessible: self.config.source_dir.is_dir(),
            system_b_accessible: self.config.target_dir.is_dir(),
            today_date: DateToken::today().to_string(),
            contracts_loaded: self.registry.len(),
        }
    }

    /// The full registry with usage hints
    pub fn contracts(&self) -> ContractsDocument {
        ContractsDocument {
            contracts: self
                .registry
                .iter()
                .map(|c| (c.name.clone(), c.clone()))
                .collect(),
            base_config: (*self.config).clone(),
            today_date: DateToken::today().to_string(),
            usage: BTreeMap::from([
                (
                    "upload",
                    "POST /api/v1/upload/{endpoint} - Process file from System A",
                ),
                (
                    "download",
                    "GET /api/v1/download/{endpoint} - Read processed file from System B",
                ),
            ]),
        }
    }

    /// Service overview served at the root path
    pub fn overview(&self) -> Value {
        let names = self.registry.names();
        json!({
            "service": SERVICE_NAME,
            "version": crate::VERSION,
            "description": "File transfer between System A and System B with predefined contracts",
            "configuration": self.config.as_ref(),
            "available_endpoints": {
                "upload": names.iter().map(|n| format!("/api/v1/upload/{n}")).collect::<Vec<_>>(),
                "download": names.iter().map(|n| format!("/api/v1/download/{n}")).collect::<Vec<_>>(),
                "contracts": "/api/v1/contracts",
                "status": "/api/v1/system/status",
                "health": "/health",
                "demo": "/api/v1/demo/setup",
            },
            "supported_formats": FileFormat::ALL,
            "date_pattern": "Files carry the date as DDMMYY",
            "example_today": DateToken::today(),
        })
    }

    /// Files in both directories and the expected files of every contract
    pub fn status(&self, date: Option<&str>) -> Result<SystemStatus> {
        let token = DateToken::from_option(date)?;

        let contracts_status = self
            .registry
            .iter()
            .map(|contract| {
                let source = resolve::probe(contract, &token, &self.config.source_dir);
                let (output_pattern, target) =
                    resolve::expected_path(&contract.target_pattern, &token, &self.config.target_dir);
                let status = ContractStatus {
                    input_expected: source.file_name(),
                    output_pattern,
                    input_exists: source.exists,
                    output_exists: target.is_file(),
                };
                (contract.name.clone(), status)
            })
            .collect();

        Ok(SystemStatus {
            today_date: token.to_string(),
            system_a: listing(&self.config.source_dir)?,
            system_b: listing(&self.config.target_dir)?,
            contracts_status,
        })
    }

    /// Write a sample source file for every contract
    pub fn demo_setup(&self, date: Option<&str>) -> Result<DemoReport> {
        let token = DateToken::from_option(date)?;
        self.ensure_directories()?;
        demo::setup(&self.registry, &self.config.source_dir, &token)
    }
}

fn read_payload(file_name: String, path: &Path) -> Result<FilePayload> {
    let bytes = std::fs::read(path)?;
    Ok(FilePayload {
        content_type: store::content_type_for(path),
        file_name,
        path: path.to_path_buf(),
        bytes,
    })
}

fn listing(dir: &Path) -> Result<DirectoryListing> {
    let files = store::list_files(dir)?;
    Ok(DirectoryListing {
        path: dir.display().to_string(),
        file_count: files.len(),
        files,
    })
}
