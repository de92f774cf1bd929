use chrono::{Datelike, NaiveDate};

use super::model::{DatasetProfile, Table, Value};

// ---------------------------------------------------------------------------
// Cleaning: type coercion + required-field row drops
// ---------------------------------------------------------------------------

/// Row counts before and after cleaning. Part of the cleaning contract, not
/// just a log line: the UI reports "N titles (originally M records)".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub original_rows: usize,
    pub kept_rows: usize,
}

/// Column derived from `date_added` during Netflix cleaning.
pub const YEAR_ADDED: &str = "year_added";

/// Apply profile-specific cleaning rules.
///
/// Netflix profile:
/// * `date_added` is parsed into a calendar date; a derived `year_added`
///   integer column is appended. Unparseable cells become Null, never errors.
/// * `release_year` is coerced to an integer (invalid → Null).
/// * Rows missing either identity column (`type`, `title`) are dropped.
///
/// Generic profile: passthrough, counts unchanged.
pub fn clean(table: Table, profile: DatasetProfile) -> (Table, CleanReport) {
    match profile {
        DatasetProfile::Netflix => clean_netflix(table),
        DatasetProfile::Generic => {
            let n = table.len();
            (
                table,
                CleanReport {
                    original_rows: n,
                    kept_rows: n,
                },
            )
        }
    }
}

fn clean_netflix(table: Table) -> (Table, CleanReport) {
    let original_rows = table.len();
    let has_date_added = table.has_column("date_added");
    let has_release_year = table.has_column("release_year");

    let mut columns = table.columns.clone();
    if has_date_added && !columns.iter().any(|c| c == YEAR_ADDED) {
        columns.push(YEAR_ADDED.to_string());
    }

    let mut rows = Vec::with_capacity(table.rows.len());
    for mut row in table.rows {
        if has_date_added {
            let parsed = row.get("date_added").and_then(parse_added_date);
            match parsed {
                Some(d) => {
                    row.insert("date_added".into(), Value::Date(d));
                    row.insert(YEAR_ADDED.into(), Value::Integer(d.year() as i64));
                }
                None => {
                    row.insert("date_added".into(), Value::Null);
                    row.insert(YEAR_ADDED.into(), Value::Null);
                }
            }
        }
        if has_release_year {
            let coerced = row
                .get("release_year")
                .map(coerce_year)
                .unwrap_or(Value::Null);
            row.insert("release_year".into(), coerced);
        }

        // Required identity columns: drop the row when either is missing.
        let keep = !row.get("type").unwrap_or(&Value::Null).is_null()
            && !row.get("title").unwrap_or(&Value::Null).is_null();
        if keep {
            rows.push(row);
        }
    }

    let kept_rows = rows.len();
    (
        Table::with_columns(columns, rows),
        CleanReport {
            original_rows,
            kept_rows,
        },
    )
}

/// Parse the Kaggle `date_added` format ("September 25, 2021"), tolerating
/// padded whitespace. Already-parsed dates pass through.
fn parse_added_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%B %d, %Y").ok(),
        _ => None,
    }
}

/// Coerce a release-year cell to an integer; anything non-numeric is Null.
fn coerce_year(value: &Value) -> Value {
    match value {
        Value::Integer(i) => Value::Integer(*i),
        Value::Float(f) => Value::Integer(*f as i64),
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Null,
        },
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn netflix_columns() -> Vec<String> {
        ["type", "title", "release_year", "date_added"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn derives_year_added_and_nulls_bad_dates() {
        let t = Table::with_columns(
            netflix_columns(),
            vec![
                row(&[
                    ("type", Value::String("Movie".into())),
                    ("title", Value::String("A".into())),
                    ("date_added", Value::String(" September 25, 2021".into())),
                ]),
                row(&[
                    ("type", Value::String("Movie".into())),
                    ("title", Value::String("B".into())),
                    ("date_added", Value::String("not a date".into())),
                ]),
            ],
        );
        let (cleaned, report) = clean(t, DatasetProfile::Netflix);
        assert_eq!(report.kept_rows, 2);
        assert!(cleaned.has_column(YEAR_ADDED));
        assert_eq!(cleaned.rows[0][YEAR_ADDED], Value::Integer(2021));
        assert_eq!(
            cleaned.rows[0]["date_added"],
            Value::Date(NaiveDate::from_ymd_opt(2021, 9, 25).unwrap())
        );
        assert_eq!(cleaned.rows[1][YEAR_ADDED], Value::Null);
        assert_eq!(cleaned.rows[1]["date_added"], Value::Null);
    }

    #[test]
    fn coerces_release_year_and_drops_incomplete_rows() {
        let t = Table::with_columns(
            netflix_columns(),
            vec![
                row(&[
                    ("type", Value::String("Movie".into())),
                    ("title", Value::String("A".into())),
                    ("release_year", Value::String("2020".into())),
                ]),
                row(&[
                    ("type", Value::Null),
                    ("title", Value::String("orphan".into())),
                ]),
                row(&[
                    ("type", Value::String("TV Show".into())),
                    ("title", Value::String("B".into())),
                    ("release_year", Value::String("unknown".into())),
                ]),
            ],
        );
        let (cleaned, report) = clean(t, DatasetProfile::Netflix);
        assert_eq!(report.original_rows, 3);
        assert_eq!(report.kept_rows, 2);
        assert_eq!(cleaned.rows[0]["release_year"], Value::Integer(2020));
        assert_eq!(cleaned.rows[1]["release_year"], Value::Null);
    }

    #[test]
    fn generic_profile_is_a_passthrough() {
        let t = Table::with_columns(
            vec!["a".into()],
            vec![row(&[("a", Value::Integer(1))]), row(&[("a", Value::Null)])],
        );
        let (cleaned, report) = clean(t.clone(), DatasetProfile::Generic);
        assert_eq!(cleaned.len(), t.len());
        assert_eq!(report.original_rows, report.kept_rows);
    }
}
