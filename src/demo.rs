//! Demo setup
//!
//! Populates the source directory with a sample input for every contract,
//! shaped after the contract's format and rules, so each endpoint can be
//! exercised straight away.

use crate::contract::{Contract, ContractRegistry, FileFormat};
use crate::error::Result;
use crate::store;
use crate::template::DateToken;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use rust_xlsxwriter::Workbook;
use serde::Serialize;
use std::path::Path;

/// Outcome of a demo setup run
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub status: &'static str,
    pub today_date: String,
    pub created_files: Vec<String>,
    pub system_a_path: String,
    pub next_steps: Vec<String>,
    pub test_download: Vec<String>,
}

const CARD_ROWS: &[&[&str]] = &[
    &["card_number", "amount", "merchant", "timestamp"],
    &["1234567890123456", "150.50", "Amazon", "2025-07-08T10:30:00"],
    &["2345678901234567", "250.75", "Walmart", "2025-07-08T11:45:00"],
    &["3456789012345678", "89.99", "Starbucks", "2025-07-08T12:15:00"],
];

const GENERIC_ROWS: &[&[&str]] = &[
    &["id", "name", "value", "category"],
    &["1", "Alice", "100", "A"],
    &["2", "Bob", "200", "B"],
    &["3", "Charlie", "150", "A"],
    &["4", "Diana", "300", "C"],
    &["5", "Eve", "175", "B"],
];

const EBBS_REPORT: &str = "EBBS Report Summary
Transaction Count: 1,250
Total Amount: $125,750.50
Failed Transactions: 5
Success Rate: 99.6%
Report Generated: 2025-07-08T10:00:00";

const TEXT_INPUT: &str = "Line 1: Important banking data
Line 2: Customer ID 12345
Line 3: Balance: $50,000
Line 4: Account Type: Premium
Line 5: Last Activity: 2025-07-08";

/// Write a sample source file for every contract
pub fn setup(registry: &ContractRegistry, source_dir: &Path, token: &DateToken) -> Result<DemoReport> {
    let mut created_files = Vec::with_capacity(registry.len());

    for contract in registry.iter() {
        let file_name = contract.source_file_name(token);
        let content = sample_content(contract)?;
        store::write_atomic(&source_dir.join(&file_name), &content)?;
        tracing::info!(contract = %contract.name, file = %file_name, "Created demo file");
        created_files.push(file_name);
    }

    Ok(DemoReport {
        status: "demo_files_created",
        today_date: token.to_string(),
        created_files,
        system_a_path: source_dir.display().to_string(),
        next_steps: registry
            .iter()
            .map(|c| format!("POST /api/v1/upload/{}", c.name))
            .collect(),
        test_download: registry
            .iter()
            .map(|c| format!("GET /api/v1/download/{}", c.name))
            .collect(),
    })
}

/// Sample bytes matching a contract's format
fn sample_content(contract: &Contract) -> Result<Vec<u8>> {
    match contract.format {
        FileFormat::Csv => {
            let wants_cards = contract.processing_rules.mask_card_numbers
                || contract.columns_expected.iter().any(|c| c == "card_number");
            Ok(csv_bytes(if wants_cards { CARD_ROWS } else { GENERIC_ROWS }))
        }
        FileFormat::Txt => {
            let text = if contract.processing_rules.convert_to_json {
                EBBS_REPORT
            } else {
                TEXT_INPUT
            };
            Ok(text.as_bytes().to_vec())
        }
        FileFormat::Excel => {
            let q2: [&[&str]; 3] = [GENERIC_ROWS[0], GENERIC_ROWS[4], GENERIC_ROWS[5]];
            build_workbook(&[("Q1", &GENERIC_ROWS[..4]), ("Q2", &q2[..])])
        }
        FileFormat::Pdf => build_pdf(&[
            "Quarterly Statement\nAccount: 12345\nBalance: 50,000.00",
            "Transactions\nDeposit 1,000.00\nWithdrawal 250.00",
        ]),
    }
}

fn csv_bytes(rows: &[&[&str]]) -> Vec<u8> {
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out.into_bytes()
}

/// Build an xlsx workbook; numeric-looking cells are written as numbers
pub fn build_workbook(sheets: &[(&str, &[&[&str]])]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).map_err(anyhow::Error::from)?;

        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell.parse::<f64>() {
                    Ok(n) => {
                        worksheet.write_number(r, c, n).map_err(anyhow::Error::from)?;
                    }
                    Err(_) => {
                        worksheet.write_string(r, c, *cell).map_err(anyhow::Error::from)?;
                    }
                }
            }
        }
    }

    Ok(workbook.save_to_buffer().map_err(anyhow::Error::from)?)
}

/// Build a PDF with one page per entry; lines are split on `\n`
pub fn build_pdf(pages: &[&str]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for text in pages {
        let mut operations = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let y = 720 - 16 * i as i64;
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), y.into()]),
                Operation::new("Tj", vec![Object::string_literal(line)]),
                Operation::new("ET", vec![]),
            ]);
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().map_err(anyhow::Error::from)?,
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(anyhow::Error::from)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractRegistry;

    #[test]
    fn test_setup_writes_one_file_per_contract() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ContractRegistry::builtin().unwrap();
        let token = DateToken::parse("080725").unwrap();

        let report = setup(&registry, dir.path(), &token).unwrap();
        assert_eq!(report.created_files.len(), 6);
        assert!(report
            .created_files
            .contains(&"debitcard_input_080725.csv".to_string()));

        for file in &report.created_files {
            assert!(dir.path().join(file).is_file(), "missing {file}");
        }

        let cards = std::fs::read_to_string(dir.path().join("debitcard_input_080725.csv")).unwrap();
        assert!(cards.starts_with("card_number,amount,merchant,timestamp\n"));
    }

    #[test]
    fn test_build_pdf_has_pages() {
        let bytes = build_pdf(&["one", "two", "three"]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }
}
