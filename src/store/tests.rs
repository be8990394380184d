//! Tests for store module

use super::*;
use crate::contract::FileFormat;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;
use tempfile::tempdir;

// ============================================================================
// Writer Tests
// ============================================================================

#[test]
fn test_write_atomic_creates_file_and_directory() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("system_b").join("out.csv");

    let written = write_atomic(&target, b"a,b\n1,2\n").unwrap();
    assert_eq!(written, 8);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "a,b\n1,2\n");
}

#[test]
fn test_write_atomic_replaces_and_leaves_no_temp_files() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("out.txt");

    write_atomic(&target, b"first").unwrap();
    write_atomic(&target, b"second").unwrap();

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["out.txt".to_string()]);
}

#[test]
fn test_write_atomic_into_file_path_fails() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = write_atomic(&blocker.join("out.csv"), b"x").unwrap_err();
    assert!(matches!(err, crate::Error::WriteFailure { .. }));
}

// ============================================================================
// Reader Tests
// ============================================================================

#[test]
fn test_read_back_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");
    std::fs::write(&path, "card_number,amount\n1234****3456,150.50\n").unwrap();

    let doc = read_back(&path, FileFormat::Csv).unwrap();
    assert_eq!(doc.record_count, 1);
    assert_eq!(
        doc.content,
        json!({
            "format": "csv",
            "records": [{"card_number": "1234****3456", "amount": 150.5}],
            "shape": [1, 2],
            "columns": ["card_number", "amount"],
        })
    );
}

#[test]
fn test_read_back_json_in_txt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ebbs_processed_080725.txt");
    std::fs::write(&path, r#"{"line_count": 6, "lines": []}"#).unwrap();

    let doc = read_back(&path, FileFormat::Txt).unwrap();
    assert_eq!(doc.record_count, 6);
    assert_eq!(doc.content["format"], "json");
    assert_eq!(doc.content["data"]["line_count"], 6);
}

#[test]
fn test_read_back_parsed_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("text_processed_080725.json");
    std::fs::write(
        &path,
        r#"{"parsed_lines": [{"line_number": 1}, {"line_number": 2}], "metadata": {}}"#,
    )
    .unwrap();

    assert_eq!(read_back(&path, FileFormat::Txt).unwrap().record_count, 2);
}

#[test]
fn test_read_back_sheet_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sheets.json");
    std::fs::write(
        &path,
        r#"{"Q1": {"shape": [2, 3]}, "Q2": {"shape": [4, 3]}, "metadata": {"sheet_count": 2}}"#,
    )
    .unwrap();

    assert_eq!(read_back(&path, FileFormat::Excel).unwrap().record_count, 6);
}

#[test]
fn test_read_back_pdf_text_counts_pages() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pdf_extracted_080725.txt");
    std::fs::write(&path, "page one\n\u{c}page two\n\u{c}").unwrap();

    let doc = read_back(&path, FileFormat::Pdf).unwrap();
    assert_eq!(doc.record_count, 2);
    assert_eq!(doc.content["format"], "text");
}

#[test]
fn test_read_back_missing_file() {
    let dir = tempdir().unwrap();
    assert!(read_back(&dir.path().join("nope.csv"), FileFormat::Csv).is_err());
}

// ============================================================================
// Listing Tests
// ============================================================================

#[test]
fn test_list_files_sorted_and_skips_hidden() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("b.csv"), "x").unwrap();
    std::fs::write(dir.path().join("a.txt"), vec![b'x'; 2048]).unwrap();
    std::fs::write(dir.path().join(".a.txt.1.0.tmp"), "x").unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();

    let files = list_files(dir.path()).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.csv"]);
    assert_eq!(files[0].size_kb, 2.0);
    assert!(files[0].modified.is_some());
}

#[test]
fn test_list_missing_directory_is_empty() {
    let dir = tempdir().unwrap();
    assert!(list_files(&dir.path().join("absent")).unwrap().is_empty());
}

#[test]
fn test_content_types() {
    assert_eq!(content_type_for(Path::new("a.csv")), "text/csv; charset=utf-8");
    assert_eq!(content_type_for(Path::new("a.PDF")), "application/pdf");
    assert_eq!(content_type_for(Path::new("a.bin")), "application/octet-stream");
}
