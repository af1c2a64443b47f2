/*!
# Balance File I/O

Readers and writers for the on-disk forms of a balance set.
*/

use crate::{
    errors::{BalanceError, BalanceResult},
    schemas::{BalanceCsvRow, BalanceInput, BalanceRecord, BALANCE_CSV_HEADERS},
};
use csv::{Reader, Writer};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// ================================================================================================
// JSON
// ================================================================================================

/// Read a JSON balance file in either shape.
///
/// A top-level array is the record list, a top-level object the legacy map.
pub fn read_balance_json<P: AsRef<Path>>(path: P) -> BalanceResult<BalanceInput> {
    let file = File::open(path)?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    balance_input_from_json(value)
}

pub fn balance_input_from_json(value: Value) -> BalanceResult<BalanceInput> {
    match value {
        Value::Array(_) => Ok(BalanceInput::List(serde_json::from_value(value)?)),
        Value::Object(_) => Ok(BalanceInput::Map(serde_json::from_value(value)?)),
        other => Err(BalanceError::SchemaValidation(format!(
            "balance JSON must be an object or an array, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ================================================================================================
// CSV
// ================================================================================================

/// Read and validate a balances CSV file
pub fn read_balance_csv<P: AsRef<Path>>(path: P) -> BalanceResult<Vec<BalanceRecord>> {
    let file = File::open(path)?;
    let mut rdr = Reader::from_reader(file);

    let headers = rdr.headers()?;
    validate_headers(headers.iter(), BALANCE_CSV_HEADERS, "balances.csv")?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let row: BalanceCsvRow = result?;
        records.push(BalanceRecord::from(row));
    }

    if records.is_empty() {
        return Err(BalanceError::SchemaValidation(
            "Balances CSV file is empty".to_string(),
        ));
    }

    Ok(records)
}

/// Write a balances CSV file (the csv crate writes the header row)
pub fn write_balance_csv<P: AsRef<Path>>(path: P, records: &[BalanceRecord]) -> BalanceResult<()> {
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    for record in records {
        wtr.serialize(BalanceCsvRow::from(record))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Pick the reader by file extension: `.csv` for the record list, anything
/// else is read as JSON.
pub fn read_balance_file<P: AsRef<Path>>(path: P) -> BalanceResult<BalanceInput> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        read_balance_csv(path).map(BalanceInput::List)
    } else {
        read_balance_json(path)
    }
}

fn validate_headers<'a, I>(actual: I, expected: &[&str], file_type: &str) -> BalanceResult<()>
where
    I: Iterator<Item = &'a str>,
{
    let actual_headers: Vec<&str> = actual.collect();

    if actual_headers.len() != expected.len() {
        return Err(BalanceError::SchemaValidation(format!(
            "{}: expected {} headers, found {}",
            file_type,
            expected.len(),
            actual_headers.len()
        )));
    }

    for (i, (actual, expected)) in actual_headers.iter().zip(expected.iter()).enumerate() {
        if actual != expected {
            return Err(BalanceError::SchemaValidation(format!(
                "{}: header {} should be '{}', found '{}'",
                file_type,
                i + 1,
                expected,
                actual
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::RawAmount;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn records() -> Vec<BalanceRecord> {
        vec![
            BalanceRecord {
                address: "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string(),
                earnings: RawAmount::new("100"),
                reasons: "user".to_string(),
            },
            BalanceRecord {
                address: "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359".to_string(),
                earnings: RawAmount::new("250000000000000000000000"),
                reasons: String::new(),
            },
        ]
    }

    #[test]
    fn test_write_and_read_balance_csv() {
        let temp_file = NamedTempFile::new().unwrap();
        write_balance_csv(temp_file.path(), &records()).unwrap();
        let read = read_balance_csv(temp_file.path()).unwrap();
        assert_eq!(read, records());
    }

    #[test]
    fn test_csv_header_mismatch() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "account,earnings,reasons").unwrap();
        writeln!(temp_file, "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed,1,").unwrap();

        let err = read_balance_csv(temp_file.path()).unwrap_err();
        assert!(err
            .to_string()
            .contains("header 1 should be 'address', found 'account'"));
    }

    #[test]
    fn test_empty_csv_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "address,earnings,reasons").unwrap();
        assert!(matches!(
            read_balance_csv(temp_file.path()),
            Err(BalanceError::SchemaValidation(_))
        ));
    }

    #[test]
    fn test_json_shape_detection() {
        let list = serde_json::json!([
            {"address": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", "earnings": "5", "reasons": "lp"}
        ]);
        assert!(matches!(
            balance_input_from_json(list).unwrap(),
            BalanceInput::List(records) if records.len() == 1
        ));

        let map = serde_json::json!({"0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed": 5});
        assert!(matches!(
            balance_input_from_json(map).unwrap(),
            BalanceInput::Map(map) if map.len() == 1
        ));

        assert!(matches!(
            balance_input_from_json(serde_json::json!("nope")),
            Err(BalanceError::SchemaValidation(_))
        ));
    }

    #[test]
    fn test_read_balance_file_by_extension() {
        let temp_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write_balance_csv(temp_file.path(), &records()).unwrap();
        assert!(matches!(
            read_balance_file(temp_file.path()).unwrap(),
            BalanceInput::List(_)
        ));

        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json_file, r#"{{"0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed": "7"}}"#).unwrap();
        assert!(matches!(
            read_balance_file(json_file.path()).unwrap(),
            BalanceInput::Map(_)
        ));
    }
}
