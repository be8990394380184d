//! Contract registry
//!
//! Read-only table of contracts, built once at startup and shared behind an
//! `Arc`. Lookups never mutate it, so no synchronisation is needed.

use super::types::{Contract, ContractDefinition, ContractsFile};
use crate::builtin;
use crate::error::{Error, Result, ResultExt};
use std::collections::HashMap;
use std::path::Path;

/// Immutable collection of contracts keyed by endpoint name
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    /// Contracts in declaration order
    contracts: Vec<Contract>,
    /// Name to position in `contracts`
    index: HashMap<String, usize>,
}

impl ContractRegistry {
    /// Build a registry from validated contracts
    pub fn new(contracts: Vec<Contract>) -> Result<Self> {
        let mut index = HashMap::with_capacity(contracts.len());
        for (i, contract) in contracts.iter().enumerate() {
            if index.insert(contract.name.clone(), i).is_some() {
                return Err(Error::config(format!(
                    "Duplicate contract name: {}",
                    contract.name
                )));
            }
        }

        Ok(Self { contracts, index })
    }

    /// The contracts shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(builtin::BANKING_CONTRACTS)
    }

    /// Parse and validate a contracts YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: ContractsFile = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse contracts YAML: {e}")))?;

        if file.contracts.is_empty() {
            return Err(Error::config("Contracts file must define at least one contract"));
        }

        let contracts = file
            .contracts
            .into_iter()
            .map(Contract::try_from)
            .collect::<Result<Vec<_>>>()?;

        Self::new(contracts)
    }

    /// Load contracts from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read contracts file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Load from a file when given, otherwise the built-in set
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Self::builtin(),
        }
    }

    /// Find a contract by endpoint name
    pub fn lookup(&self, name: &str) -> Result<&Contract> {
        self.get(name)
            .ok_or_else(|| Error::contract_not_found(name, self.names()))
    }

    /// Find a contract by endpoint name, if present
    pub fn get(&self, name: &str) -> Option<&Contract> {
        self.index.get(name).map(|&i| &self.contracts[i])
    }

    /// Endpoint names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.contracts.iter().map(|c| c.name.clone()).collect()
    }

    /// Iterate contracts in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.iter()
    }

    /// Number of contracts
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// True when no contracts are loaded
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl TryFrom<Vec<ContractDefinition>> for ContractRegistry {
    type Error = Error;

    fn try_from(defs: Vec<ContractDefinition>) -> Result<Self> {
        let contracts = defs
            .into_iter()
            .map(Contract::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(contracts)
    }
}
