//! Built-in contract definitions embedded in the binary
//!
//! The default contract set ships inside the executable so the service runs
//! without any configuration files. `--contracts <file>` replaces it.

/// YAML for the six demonstration banking contracts
pub const BANKING_CONTRACTS: &str = include_str!("../contracts/banking.yaml");
