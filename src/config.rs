//! Service configuration
//!
//! Where the two systems' directories live, how the HTTP server binds, and
//! which contracts file to load. Values come from an optional YAML file and
//! are then overridden by command-line flags.

use crate::error::{Error, Result, ResultExt};
use crate::transform::DEFAULT_SAMPLE_SIZE;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// ============================================================================
// Service Config
// ============================================================================

/// Runtime configuration for the exchange service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Directory holding source files (system A)
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Directory target files are written to (system B)
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,

    /// Rows echoed back in upload responses
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Address the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Contracts YAML; the built-in set is used when absent
    #[serde(default)]
    pub contracts_file: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            target_dir: default_target_dir(),
            sample_size: default_sample_size(),
            host: default_host(),
            port: default_port(),
            contracts_file: None,
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("./system_a")
}

fn default_target_dir() -> PathBuf {
    PathBuf::from("./system_b")
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl ServiceConfig {
    /// Parse a YAML config document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&yaml)
    }

    /// Load from a file when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides on top of file values
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(dir) = &overrides.source_dir {
            self.source_dir.clone_from(dir);
        }
        if let Some(dir) = &overrides.target_dir {
            self.target_dir.clone_from(dir);
        }
        if let Some(file) = &overrides.contracts_file {
            self.contracts_file = Some(file.clone());
        }
        if let Some(host) = &overrides.host {
            self.host.clone_from(host);
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        self
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(Error::config("sample_size must be at least 1"));
        }
        if self.host.trim().is_empty() {
            return Err(Error::config("host must not be empty"));
        }
        Ok(())
    }

    /// Socket address for the HTTP server
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::config(format!("Invalid bind address {}:{}: {e}", self.host, self.port)))
    }
}

/// Values supplied on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_dir: Option<PathBuf>,
    pub target_dir: Option<PathBuf>,
    pub contracts_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.source_dir, PathBuf::from("./system_a"));
        assert_eq!(config.target_dir, PathBuf::from("./system_b"));
        assert_eq!(config.sample_size, 5);
        assert_eq!(config.port, 5000);
        assert!(config.contracts_file.is_none());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let config = ServiceConfig::from_yaml_str(
            r#"
source_dir: /srv/in
port: 8080
"#,
        )
        .unwrap();

        assert_eq!(config.source_dir, PathBuf::from("/srv/in"));
        assert_eq!(config.target_dir, PathBuf::from("./system_b"));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ServiceConfig::from_yaml_str("source_directory: /tmp\n").is_err());
    }

    #[test]
    fn test_zero_sample_size_rejected() {
        let err = ServiceConfig::from_yaml_str("sample_size: 0\n").unwrap_err();
        assert!(err.to_string().contains("sample_size"));
    }

    #[test]
    fn test_overrides_win() {
        let overrides = ConfigOverrides {
            target_dir: Some(PathBuf::from("/out")),
            port: Some(9000),
            ..Default::default()
        };
        let config = ServiceConfig::default().with_overrides(&overrides);

        assert_eq!(config.target_dir, PathBuf::from("/out"));
        assert_eq!(config.source_dir, PathBuf::from("./system_a"));
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_bind_addr() {
        let config = ServiceConfig {
            host: "127.0.0.1".to_string(),
            port: 5001,
            ..Default::default()
        };
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:5001");

        let bad = ServiceConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(bad.bind_addr().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("service.yaml");
        std::fs::write(&path, "sample_size: 3\nhost: 127.0.0.1\n").unwrap();

        let config = ServiceConfig::load(Some(&path)).unwrap();
        assert_eq!(config.sample_size, 3);
        assert_eq!(config.host, "127.0.0.1");

        assert!(ServiceConfig::from_file(&dir.path().join("missing.yaml")).is_err());
    }
}
