//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ServiceConfig;
use crate::engine::ExchangeEngine;
use crate::error::Result;
use serde::Serialize;
use serde_json::json;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let engine = ExchangeEngine::from_config(config)?;

        match &self.cli.command {
            Commands::Serve { .. } => {
                engine.ensure_directories()?;
                let addr = engine.config().bind_addr()?;
                crate::cli::serve(engine, addr).await
            }
            Commands::Upload { endpoint, date } => {
                self.output(&engine.upload(endpoint, date.as_deref())?)
            }
            Commands::Download { endpoint, date } => {
                self.output(&engine.download(endpoint, date.as_deref())?)
            }
            Commands::Status { date } => self.output(&engine.status(date.as_deref())?),
            Commands::Contracts => self.output(&engine.contracts()),
            Commands::Demo { date } => self.output(&engine.demo_setup(date.as_deref())?),
            Commands::Validate => self.validate(&engine),
        }
    }

    /// Config file values with command-line overrides applied
    fn load_config(&self) -> Result<ServiceConfig> {
        let config = ServiceConfig::load(self.cli.config.as_deref())?
            .with_overrides(&self.cli.overrides());
        config.validate()?;
        Ok(config)
    }

    /// Report on the contracts that were loaded; loading itself validates
    fn validate(&self, engine: &ExchangeEngine) -> Result<()> {
        let source = engine
            .config()
            .contracts_file
            .as_ref()
            .map_or_else(|| "built-in".to_string(), |p| p.display().to_string());

        self.output(&json!({
            "valid": true,
            "source": source,
            "contracts": engine.registry().names(),
            "message": format!(
                "{} contract(s) loaded from {source}",
                engine.registry().len()
            ),
        }))
    }

    /// Print a document in the selected format
    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}
