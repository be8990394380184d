//! In-memory table shared by the CSV and Excel transformers

use crate::error::{Error, Result};
use serde_json::{Map, Number, Value};
use std::path::Path;

/// Column names plus string cells, one row per record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given header
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Parse CSV text with a header row
    pub fn from_csv(data: &[u8], source: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let columns = reader
            .headers()
            .map_err(|e| Error::malformed(source, e.to_string()))?
            .iter()
            .map(ToString::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::malformed(source, e.to_string()))?;
            rows.push(record.iter().map(ToString::to_string).collect());
        }

        Ok(Self { columns, rows })
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a column holding the same value on every row
    pub fn push_constant_column(&mut self, name: &str, value: &str) {
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(value.to_string());
        }
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `limit` rows as JSON objects
    pub fn records(&self, limit: usize) -> Vec<Value> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| row_to_record(&self.columns, row))
            .collect()
    }

    /// Serialize the table as CSV with a header row
    pub fn to_csv(&self, target: &Path) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        let write_err = |e: csv::Error| Error::write_failure(target, e.to_string());

        if !self.columns.is_empty() {
            writer.write_record(&self.columns).map_err(write_err)?;
        }
        for row in &self.rows {
            writer.write_record(row).map_err(write_err)?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::write_failure(target, e.to_string()))
    }
}

/// Zip a header and a row into a JSON object
pub fn row_to_record(columns: &[String], row: &[String]) -> Value {
    let mut obj = Map::new();
    for (i, column) in columns.iter().enumerate() {
        let cell = row.get(i).map_or("", String::as_str);
        obj.insert(column.clone(), cell_value(cell));
    }
    Value::Object(obj)
}

/// Convert a text cell into the closest JSON value.
///
/// Digit strings longer than 15 characters or with a leading zero stay
/// strings so account and card numbers keep every digit.
pub fn cell_value(value: &str) -> Value {
    if value.is_empty() {
        return Value::Null;
    }

    let digits = value.trim_start_matches('-');
    let zero_padded = digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.");
    let keeps_text = digits.len() > 15 || zero_padded;

    if !keeps_text {
        if let Ok(n) = value.parse::<i64>() {
            return Value::Number(n.into());
        }

        if let Ok(n) = value.parse::<f64>() {
            if let Some(num) = Number::from_f64(n) {
                return Value::Number(num);
            }
        }
    }

    match value {
        "true" | "True" | "TRUE" => Value::Bool(true),
        "false" | "False" | "FALSE" => Value::Bool(false),
        _ => Value::String(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value("42"), json!(42));
        assert_eq!(cell_value("150.50"), json!(150.5));
        assert_eq!(cell_value("-3"), json!(-3));
        assert_eq!(cell_value("0.75"), json!(0.75));
        assert_eq!(cell_value("TRUE"), json!(true));
        assert_eq!(cell_value(""), Value::Null);
        assert_eq!(cell_value("Amazon"), json!("Amazon"));
        assert_eq!(cell_value("1234****3456"), json!("1234****3456"));
    }

    #[test]
    fn test_long_and_zero_padded_numbers_stay_text() {
        assert_eq!(cell_value("1234567890123456"), json!("1234567890123456"));
        assert_eq!(cell_value("00123"), json!("00123"));
        assert_eq!(cell_value("0"), json!(0));
    }

    #[test]
    fn test_csv_round_trip_through_table() {
        let source = Path::new("in.csv");
        let table = Table::from_csv(b"a,b\n1,x\n2,y\n", source).unwrap();
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.len(), 2);

        let bytes = table.to_csv(Path::new("out.csv")).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a,b\n1,x\n2,y\n");
    }

    #[test]
    fn test_ragged_csv_is_malformed() {
        let err = Table::from_csv(b"a,b\n1,2,3\n", Path::new("in.csv")).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn test_constant_column() {
        let mut table = Table::with_columns(vec!["a".into()]);
        table.rows.push(vec!["1".into()]);
        table.push_constant_column("source_sheet", "Q1");
        assert_eq!(table.records(5), vec![json!({"a": 1, "source_sheet": "Q1"})]);
    }
}
