//! CLI module
//!
//! Command-line interface for the file exchange service.
//!
//! # Commands
//!
//! - `serve` - Start HTTP server mode
//! - `upload` - Process an endpoint's source file
//! - `download` - Read back an endpoint's processed file
//! - `status` - Show directory contents and expected files
//! - `contracts` - List loaded contracts
//! - `demo` - Create sample source files
//! - `validate` - Check a contracts file

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{router, serve, serve_with_listener};
