//! CLI commands and argument parsing

use crate::config::ConfigOverrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Banking file exchange service CLI
#[derive(Parser, Debug)]
#[command(name = "filebridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Service configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Contracts file (YAML); the built-in contracts are used when omitted
    #[arg(short, long, global = true)]
    pub contracts: Option<PathBuf>,

    /// Directory holding source files (system A)
    #[arg(long, global = true)]
    pub source_dir: Option<PathBuf>,

    /// Directory target files are written to (system B)
    #[arg(long, global = true)]
    pub target_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Config values given on the command line
    pub fn overrides(&self) -> ConfigOverrides {
        let (host, port) = match &self.command {
            Commands::Serve { host, port } => (host.clone(), *port),
            _ => (None, None),
        };

        ConfigOverrides {
            source_dir: self.source_dir.clone(),
            target_dir: self.target_dir.clone(),
            contracts_file: self.contracts.clone(),
            host,
            port,
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,
    },

    /// Process an endpoint's source file into system B
    Upload {
        /// Endpoint (contract) name
        endpoint: String,

        /// Date as DDMMYY, YYYY-MM-DD or "today"
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Read an endpoint's processed file, processing it first if needed
    Download {
        /// Endpoint (contract) name
        endpoint: String,

        /// Date as DDMMYY, YYYY-MM-DD or "today"
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show files in both systems and each contract's expected files
    Status {
        /// Date as DDMMYY, YYYY-MM-DD or "today"
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List loaded contracts
    Contracts,

    /// Write sample source files for every contract
    Demo {
        /// Date as DDMMYY, YYYY-MM-DD or "today"
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Validate the contracts file
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON, one document per line
    Json,
    /// Indented JSON
    Pretty,
}
