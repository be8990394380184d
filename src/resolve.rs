//! Date-pattern file resolver
//!
//! Turns a contract pattern and a date token into a concrete path under a
//! root directory. Matching is exact: no subdirectories, no fuzzy names.

use crate::contract::Contract;
use crate::error::{Error, Result};
use crate::template::{self, DateToken};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A source file located for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFile {
    /// Contract the file belongs to
    pub contract_name: String,
    /// `DDMMYY` token substituted into the pattern
    pub date_token: DateToken,
    /// Absolute (or root-relative) path of the file
    pub path: PathBuf,
    /// Whether the file exists
    pub exists: bool,
}

impl ResolvedFile {
    /// File name component of the path
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Locate a contract's source file for a date, failing when absent
pub fn resolve(contract: &Contract, token: &DateToken, root: &Path) -> Result<ResolvedFile> {
    let path = resolve_pattern(&contract.file_pattern, token, root)?;
    tracing::debug!(
        contract = %contract.name,
        date = %token,
        path = %path.display(),
        "Resolved source file"
    );

    Ok(ResolvedFile {
        contract_name: contract.name.clone(),
        date_token: token.clone(),
        path,
        exists: true,
    })
}

/// Substitute the token and check the file exists under `root`
pub fn resolve_pattern(pattern: &str, token: &DateToken, root: &Path) -> Result<PathBuf> {
    let (file_name, path) = expected_path(pattern, token, root);
    if path.is_file() {
        Ok(absolute(path))
    } else {
        Err(Error::file_not_found(file_name, token.as_str()))
    }
}

/// Where a pattern points for a date, without touching the filesystem
pub fn expected_path(pattern: &str, token: &DateToken, root: &Path) -> (String, PathBuf) {
    let file_name = template::render(pattern, token);
    let path = root.join(&file_name);
    (file_name, path)
}

/// Probe a pattern without failing; used for status reports
pub fn probe(contract: &Contract, token: &DateToken, root: &Path) -> ResolvedFile {
    let (_, path) = expected_path(&contract.file_pattern, token, root);
    let exists = path.is_file();
    ResolvedFile {
        contract_name: contract.name.clone(),
        date_token: token.clone(),
        path,
        exists,
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractRegistry;

    fn token() -> DateToken {
        DateToken::parse("080725").unwrap()
    }

    #[test]
    fn test_resolve_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ebbs_report_080725.txt"), "hello").unwrap();

        let registry = ContractRegistry::builtin().unwrap();
        let contract = registry.lookup("ebbsreport").unwrap();

        let resolved = resolve(contract, &token(), dir.path()).unwrap();
        assert!(resolved.exists);
        assert!(resolved.path.is_absolute());
        assert_eq!(resolved.contract_name, "ebbsreport");
        assert_eq!(resolved.date_token.as_str(), "080725");
        assert_eq!(resolved.file_name(), "ebbs_report_080725.txt");
    }

    #[test]
    fn test_missing_file_reports_expected_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ContractRegistry::builtin().unwrap();
        let contract = registry.lookup("debitcardtxn").unwrap();

        let err = resolve(contract, &token(), dir.path()).unwrap_err();
        match err {
            Error::FileNotFound {
                expected_pattern,
                date,
            } => {
                assert_eq!(expected_pattern, "debitcard_input_080725.csv");
                assert_eq!(date, "080725");
            }
            other => panic!("Expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_other_dates_do_not_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("csv_input_070725.csv"), "a\n1\n").unwrap();

        let result = resolve_pattern("csv_input_{date}.csv", &token(), dir.path());
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_subdirectories_are_not_searched() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("csv_input_080725.csv"), "a\n1\n").unwrap();

        let result = resolve_pattern("csv_input_{date}.csv", &token(), dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_directory_with_matching_name_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("csv_input_080725.csv")).unwrap();

        let result = resolve_pattern("csv_input_{date}.csv", &token(), dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_probe_reports_absence() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ContractRegistry::builtin().unwrap();
        let contract = registry.lookup("pdftest").unwrap();

        let probed = probe(contract, &token(), dir.path());
        assert!(!probed.exists);
        assert_eq!(probed.file_name(), "test_document_080725.pdf");
    }
}
