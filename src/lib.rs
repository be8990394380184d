// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # filebridge
//!
//! A file exchange service that stands in for manual banking file
//! transfers. Each named endpoint (a *contract*) picks up a dated file from
//! system A, transforms it according to its format and rules, and writes
//! the result to system B.
//!
//! ## Features
//!
//! - **Contracts**: YAML-defined endpoints with `{date}` file patterns
//! - **Four formats**: CSV, TXT, PDF text extraction and Excel workbooks
//! - **Rules**: card masking, amount validation, timestamps, JSON conversion
//! - **HTTP API**: upload, download, raw file streaming and status
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use filebridge::{config::ServiceConfig, engine::ExchangeEngine, Result};
//!
//! fn main() -> Result<()> {
//!     let engine = ExchangeEngine::from_config(ServiceConfig::default())?;
//!
//!     // Transform today's debit card file from system A into system B
//!     let report = engine.upload("debitcardtxn", None)?;
//!     println!("{} records written to {}", report.record_count, report.target_file);
//!
//!     // Read it back as structured JSON
//!     let doc = engine.download("debitcardtxn", None)?;
//!     println!("{}", doc.content);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │             HTTP server / CLI  (ExchangeEngine)              │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ endpoint + date
//! ┌───────────┬──────────────────┴──┬───────────────┬───────────┐
//! │ Registry  │ Resolver            │ Dispatcher    │ Assembler │
//! ├───────────┼─────────────────────┼───────────────┼───────────┤
//! │ contracts │ {date} → DDMMYY     │ CSV  TXT      │ upload    │
//! │ rules     │ system A lookup     │ PDF  Excel    │ report    │
//! └───────────┴─────────────────────┴───────┬───────┴───────────┘
//!                                           │ atomic write
//!                                       system B
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Date tokens and `{date}` pattern rendering
pub mod template;

/// Contracts and the contract registry
pub mod contract;

/// Built-in contract definitions
pub mod builtin;

/// Date-pattern file resolution
pub mod resolve;

/// Format transformers and the dispatcher
pub mod transform;

/// Target file writing, read-back and listing
pub mod store;

/// Upload response assembly
pub mod report;

/// Upload/download orchestration
pub mod engine;

/// Demo source file generation
pub mod demo;

/// Service configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

// Re-export commonly used types
pub use contract::{Contract, ContractRegistry, FileFormat, ProcessingRules};
pub use engine::ExchangeEngine;
pub use template::DateToken;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
