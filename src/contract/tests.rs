//! Tests for contract module

use super::*;
use crate::error::Error;
use crate::template::DateToken;

// ============================================================================
// Built-in Registry Tests
// ============================================================================

#[test]
fn test_builtin_registry_loads() {
    let registry = ContractRegistry::builtin().unwrap();
    assert_eq!(registry.len(), 6);

    let card = registry.lookup("debitcardtxn").unwrap();
    assert_eq!(card.format, FileFormat::Csv);
    assert_eq!(card.file_pattern, "debitcard_input_{date}.csv");
    assert_eq!(card.target_pattern, "debitcard_processed_{date}.csv");
    assert_eq!(card.amount_field, "amount");
    assert!(card.processing_rules.mask_card_numbers);
    assert!(card.processing_rules.validate_amounts);
    assert!(card.processing_rules.add_timestamp);
    assert!(!card.processing_rules.convert_to_json);
}

#[test]
fn test_builtin_formats() {
    let registry = ContractRegistry::builtin().unwrap();
    assert_eq!(registry.lookup("ebbsreport").unwrap().format, FileFormat::Txt);
    assert_eq!(registry.lookup("pdftest").unwrap().format, FileFormat::Pdf);
    assert_eq!(registry.lookup("exceltest").unwrap().format, FileFormat::Excel);
    assert_eq!(registry.lookup("txttest").unwrap().format, FileFormat::Txt);
}

#[test]
fn test_lookup_unknown_lists_available() {
    let registry = ContractRegistry::builtin().unwrap();
    let err = registry.lookup("wiretransfer").unwrap_err();

    match err {
        Error::ContractNotFound { name, available } => {
            assert_eq!(name, "wiretransfer");
            assert!(available.contains(&"debitcardtxn".to_string()));
            assert_eq!(available.len(), 6);
        }
        other => panic!("Expected ContractNotFound, got {other:?}"),
    }
}

#[test]
fn test_file_names_for_date() {
    let registry = ContractRegistry::builtin().unwrap();
    let contract = registry.lookup("exceltest").unwrap();
    let token = DateToken::parse("010125").unwrap();

    assert_eq!(contract.source_file_name(&token), "excel_input_010125.xlsx");
    assert_eq!(contract.target_file_name(&token), "excel_output_010125.csv");
}

// ============================================================================
// YAML Loading Tests
// ============================================================================

#[test]
fn test_load_minimal_contract() {
    let yaml = r#"
contracts:
  - name: settlements
    file_pattern: "settle_{date}.csv"
    target_pattern: "settle_out_{date}.csv"
    format: csv
"#;

    let registry = ContractRegistry::from_yaml_str(yaml).unwrap();
    let contract = registry.lookup("settlements").unwrap();
    assert_eq!(contract.description, "");
    assert_eq!(contract.amount_field, "amount");
    assert_eq!(contract.processing_rules, ProcessingRules::default());
}

#[test]
fn test_custom_amount_field() {
    let yaml = r#"
contracts:
  - name: settlements
    file_pattern: "settle_{date}.csv"
    target_pattern: "settle_out_{date}.csv"
    format: csv
    amount_field: net_value
    processing_rules:
      validate_amounts: true
"#;

    let registry = ContractRegistry::from_yaml_str(yaml).unwrap();
    let contract = registry.lookup("settlements").unwrap();
    assert_eq!(contract.amount_field, "net_value");
    assert!(contract.processing_rules.validate_amounts);
}

#[test]
fn test_unknown_format_rejected() {
    let yaml = r#"
contracts:
  - name: docs
    file_pattern: "doc_{date}.docx"
    target_pattern: "doc_{date}.txt"
    format: docx
"#;

    let err = ContractRegistry::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { ref format } if format == "docx"));
}

#[test]
fn test_unknown_rule_rejected() {
    let yaml = r#"
contracts:
  - name: cards
    file_pattern: "cards_{date}.csv"
    target_pattern: "cards_out_{date}.csv"
    format: csv
    processing_rules:
      encrypt_everything: true
"#;

    let err = ContractRegistry::from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("encrypt_everything"));
}

#[test]
fn test_pattern_without_placeholder_rejected() {
    let yaml = r#"
contracts:
  - name: cards
    file_pattern: "cards.csv"
    target_pattern: "cards_out_{date}.csv"
    format: csv
"#;

    let err = ContractRegistry::from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("exactly one {date}"));
}

#[test]
fn test_duplicate_names_rejected() {
    let yaml = r#"
contracts:
  - name: cards
    file_pattern: "cards_{date}.csv"
    target_pattern: "cards_out_{date}.csv"
    format: csv
  - name: cards
    file_pattern: "cards2_{date}.csv"
    target_pattern: "cards2_out_{date}.csv"
    format: csv
"#;

    let err = ContractRegistry::from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("Duplicate contract name"));
}

#[test]
fn test_empty_contracts_rejected() {
    let err = ContractRegistry::from_yaml_str("contracts: []").unwrap_err();
    assert!(err.to_string().contains("at least one contract"));
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contracts.yaml");
    std::fs::write(&path, crate::builtin::BANKING_CONTRACTS).unwrap();

    let registry = ContractRegistry::load(Some(&path)).unwrap();
    assert_eq!(registry.len(), 6);

    let missing = ContractRegistry::from_file(dir.path().join("missing.yaml"));
    assert!(missing.is_err());
}

// ============================================================================
// Format Tests
// ============================================================================

#[test]
fn test_format_aliases() {
    assert_eq!("CSV".parse::<FileFormat>().unwrap(), FileFormat::Csv);
    assert_eq!("text".parse::<FileFormat>().unwrap(), FileFormat::Txt);
    assert_eq!("xlsx".parse::<FileFormat>().unwrap(), FileFormat::Excel);
    assert_eq!(FileFormat::Excel.to_string(), "excel");
}

#[test]
fn test_contract_serializes_rules_as_mapping() {
    let registry = ContractRegistry::builtin().unwrap();
    let value = serde_json::to_value(registry.lookup("pdftest").unwrap()).unwrap();
    assert_eq!(value["format"], "pdf");
    assert_eq!(value["processing_rules"]["extract_text"], true);
    assert_eq!(value["processing_rules"]["mask_card_numbers"], false);
}
