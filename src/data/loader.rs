use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{DatasetProfile, Row, Table, Value};

// ---------------------------------------------------------------------------
// Netflix profile: fixed candidate paths, first existing wins
// ---------------------------------------------------------------------------

/// Candidate locations for the Kaggle Netflix export, tried in order.
pub const NETFLIX_CANDIDATE_PATHS: &[&str] = &[
    "netflix_titles.csv",
    "data/netflix_titles.csv",
    "../netflix_titles.csv",
];

/// Load the Netflix catalog from the first candidate path that exists.
///
/// Returns the raw (uncleaned) table together with a short description of
/// where it came from. A missing file is a `NotFound` with remediation
/// steps, not a crash.
pub fn load_netflix() -> Result<(Table, String, DatasetProfile), DataError> {
    let found = NETFLIX_CANDIDATE_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists());

    let Some(path) = found else {
        return Err(DataError::NotFound(format!(
            "Netflix dataset not found. Download netflix_titles.csv from \
             https://www.kaggle.com/datasets/shivamb/netflix-shows and place \
             it at one of: {}",
            NETFLIX_CANDIDATE_PATHS.join(", ")
        )));
    };

    let table = read_csv_path(&path)?;
    let description = format!(
        "{} dataset loaded from {}",
        DatasetProfile::Netflix.label(),
        path.display()
    );
    Ok((table, description, DatasetProfile::Netflix))
}

// ---------------------------------------------------------------------------
// Generic profile: uploaded byte stream, dispatch by extension
// ---------------------------------------------------------------------------

/// Parse an uploaded file as a generic table. Dispatch by extension:
/// * `.csv` (or no extension) – delimited text with a header row
/// * `.json` – records-oriented array `[{"col": val, ...}, ...]`
pub fn load_generic(name: &str, bytes: &[u8]) -> Result<(Table, String, DatasetProfile), DataError> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => read_csv_bytes(name, bytes)?,
        "json" => read_json_bytes(name, bytes)?,
        other => {
            return Err(DataError::ParseError {
                name: name.to_string(),
                reason: format!("unsupported file extension .{other}"),
            })
        }
    };

    let description = format!(
        "Custom dataset '{}' with {} records and {} columns",
        name,
        table.len(),
        table.columns.len()
    );
    Ok((table, description, DatasetProfile::Generic))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn read_csv_path(path: &Path) -> Result<Table, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::ParseError {
        name: path.display().to_string(),
        reason: e.to_string(),
    })?;
    read_csv(&path.display().to_string(), file)
}

fn read_csv_bytes(name: &str, bytes: &[u8]) -> Result<Table, DataError> {
    read_csv(name, bytes)
}

fn read_csv<R: Read>(name: &str, input: R) -> Result<Table, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_error(name, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        return Err(DataError::ParseError {
            name: name.to_string(),
            reason: "no header row".into(),
        });
    }

    let mut rows: Vec<Row> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| parse_error(name, e))?;
        let mut row = Row::new();
        for (idx, col) in headers.iter().enumerate() {
            let cell = record.get(idx).unwrap_or("");
            row.insert(col.clone(), infer_value(cell));
        }
        rows.push(row);
    }

    Ok(Table::with_columns(headers, rows))
}

fn parse_error(name: &str, e: impl std::fmt::Display) -> DataError {
    DataError::ParseError {
        name: name.to_string(),
        reason: e.to_string(),
    }
}

/// Guess a cell's type from its text: Integer, then Float, else String.
/// Empty cells are Null, as are non-finite float markers ("NaN", "inf"),
/// which CSV exports use for missing data.
pub fn infer_value(s: &str) -> Value {
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return if f.is_finite() {
            Value::Float(f)
        } else {
            Value::Null
        };
    }
    Value::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON (records orientation, the default `df.to_json(orient='records')`)
// ---------------------------------------------------------------------------

fn read_json_bytes(name: &str, bytes: &[u8]) -> Result<Table, DataError> {
    let root: JsonValue =
        serde_json::from_slice(bytes).map_err(|e| parse_error(name, e))?;

    let records = root.as_array().ok_or_else(|| DataError::ParseError {
        name: name.to_string(),
        reason: "expected a top-level JSON array of objects".into(),
    })?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Row> = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DataError::ParseError {
            name: name.to_string(),
            reason: format!("record {i} is not a JSON object"),
        })?;

        let mut row: BTreeMap<String, Value> = BTreeMap::new();
        for (key, val) in obj {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
            row.insert(key.clone(), json_to_value(val));
        }
        rows.push(row);
    }

    Ok(Table::with_columns(columns, rows))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::String(b.to_string()),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_cell_types() {
        assert_eq!(infer_value(""), Value::Null);
        assert_eq!(infer_value("2021"), Value::Integer(2021));
        assert_eq!(infer_value("3.5"), Value::Float(3.5));
        assert_eq!(infer_value("Drama"), Value::String("Drama".into()));
    }

    #[test]
    fn non_finite_cells_are_null() {
        assert_eq!(infer_value("NaN"), Value::Null);
        assert_eq!(infer_value("nan"), Value::Null);
        assert_eq!(infer_value("inf"), Value::Null);
        assert_eq!(infer_value("-inf"), Value::Null);
    }

    #[test]
    fn parses_uploaded_csv() {
        let csv = b"type,title,release_year\nMovie,A,2020\nTV Show,B,\n";
        let (table, _, profile) = load_generic("upload.csv", csv).unwrap();
        assert_eq!(profile, DatasetProfile::Generic);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.columns,
            vec!["type".to_string(), "title".into(), "release_year".into()]
        );
        assert_eq!(table.rows[0]["release_year"], Value::Integer(2020));
        assert_eq!(table.rows[1]["release_year"], Value::Null);
    }

    #[test]
    fn parses_uploaded_json_records() {
        let json = br#"[{"name":"a","score":1},{"name":"b","score":2.5}]"#;
        let (table, _, _) = load_generic("upload.json", json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1]["score"], Value::Float(2.5));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = load_generic("bad.json", b"{not json").unwrap_err();
        assert!(matches!(err, DataError::ParseError { .. }));
    }

    #[test]
    fn unsupported_extension_is_a_parse_error() {
        let err = load_generic("data.parquet", b"").unwrap_err();
        assert!(matches!(err, DataError::ParseError { .. }));
    }
}
