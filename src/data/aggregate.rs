use std::borrow::Cow;
use std::collections::HashMap;

use super::model::{DatasetProfile, Table, Value};

// ---------------------------------------------------------------------------
// Value counting
// ---------------------------------------------------------------------------

/// Count occurrences of each non-null value in a column.
///
/// Sorted by descending count; ties keep first-seen order (stable sort), so
/// results are reproducible across runs.
pub fn count_by(table: &Table, column: &str) -> Vec<(Value, u64)> {
    let mut order: Vec<(Value, u64)> = Vec::new();
    let mut index: HashMap<Value, usize> = HashMap::new();

    for row in &table.rows {
        let val = row.get(column).unwrap_or(&Value::Null);
        if val.is_null() {
            continue;
        }
        match index.get(val) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(val.clone(), order.len());
                order.push((val.clone(), 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
}

/// Top-N most frequent values of a categorical column.
pub fn top_n(table: &Table, column: &str, n: usize) -> Vec<(Value, u64)> {
    let mut counts = count_by(table, column);
    counts.truncate(n);
    counts
}

/// Token frequency for a multi-value column (comma-separated lists such as
/// genres or countries). Each non-null cell is rendered to text and split on
/// `delimiter`, tokens are trimmed, empty tokens dropped, and every token
/// counts as one occurrence. Descending count, first-seen tie order; `cap`
/// truncates when given.
pub fn split_and_count(
    table: &Table,
    column: &str,
    delimiter: char,
    cap: Option<usize>,
) -> Vec<(String, u64)> {
    let mut order: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in &table.rows {
        let cell = row.get(column).unwrap_or(&Value::Null);
        if cell.is_null() {
            continue;
        }
        let text: Cow<'_, str> = match cell.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(cell.to_string()),
        };
        for token in text.split(delimiter) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match index.get(token) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(token.to_string(), order.len());
                    order.push((token.to_string(), 1));
                }
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    if let Some(cap) = cap {
        order.truncate(cap);
    }
    order
}

// ---------------------------------------------------------------------------
// Numeric describe
// ---------------------------------------------------------------------------

/// Describe-style summary for one numeric column. All statistics are None
/// when the column has no non-null values.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: u64,
    pub mean: Option<f64>,
    /// Sample standard deviation (n-1 denominator); None below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Compute count / mean / std / min / quartiles / max per column.
pub fn numeric_describe(table: &Table, columns: &[String]) -> Vec<ColumnSummary> {
    columns
        .iter()
        .map(|col| {
            let mut values: Vec<f64> = table
                .rows
                .iter()
                .filter_map(|row| row.get(col).and_then(Value::as_f64))
                .collect();
            values.sort_by(|a, b| a.total_cmp(b));
            summarize(col, &values)
        })
        .collect()
}

fn summarize(column: &str, sorted: &[f64]) -> ColumnSummary {
    let n = sorted.len();
    if n == 0 {
        return ColumnSummary {
            column: column.to_string(),
            count: 0,
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };
    }

    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n >= 2 {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        Some((ss / (n as f64 - 1.0)).sqrt())
    } else {
        None
    };

    ColumnSummary {
        column: column.to_string(),
        count: n as u64,
        mean: Some(mean),
        std,
        min: Some(sorted[0]),
        q25: Some(percentile(sorted, 0.25)),
        median: Some(percentile(sorted, 0.5)),
        q75: Some(percentile(sorted, 0.75)),
        max: Some(sorted[n - 1]),
    }
}

/// Linear-interpolation percentile over a sorted slice (the pandas default).
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

// ---------------------------------------------------------------------------
// Scalar metrics & categorical summaries
// ---------------------------------------------------------------------------

/// Headline metrics shown above the charts, in display order.
pub fn scalar_metrics(table: &Table, profile: DatasetProfile) -> Vec<(String, u64)> {
    match profile {
        DatasetProfile::Netflix => {
            let count_type = |wanted: &str| {
                table
                    .rows
                    .iter()
                    .filter(|row| {
                        row.get("type").and_then(Value::as_str) == Some(wanted)
                    })
                    .count() as u64
            };
            vec![
                ("Total Titles".to_string(), table.len() as u64),
                ("Movies".to_string(), count_type("Movie")),
                ("TV Shows".to_string(), count_type("TV Show")),
            ]
        }
        DatasetProfile::Generic => vec![
            ("Total Records".to_string(), table.len() as u64),
            ("Total Columns".to_string(), table.columns.len() as u64),
            (
                "Numeric Columns".to_string(),
                table.numeric_columns().len() as u64,
            ),
        ],
    }
}

/// Top-10 value counts for the first few categorical columns, used by the
/// summary section.
pub fn categorical_summaries(table: &Table, max_columns: usize) -> Vec<(String, Vec<(Value, u64)>)> {
    table
        .categorical_columns()
        .into_iter()
        .take(max_columns)
        .map(|col| {
            let counts = top_n(table, &col, 10);
            (col, counts)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn sample_table() -> Table {
        let mk = |ty: &str, title: &str, year: i64, rating: &str, genres: &str| -> Row {
            [
                ("type", Value::String(ty.into())),
                ("title", Value::String(title.into())),
                ("release_year", Value::Integer(year)),
                ("rating", Value::String(rating.into())),
                ("listed_in", Value::String(genres.into())),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
        };
        Table::with_columns(
            ["type", "title", "release_year", "rating", "listed_in"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![
                mk("Movie", "A", 2020, "PG", "Drama, Comedy"),
                mk("TV Show", "B", 2021, "TV-MA", "Drama"),
            ],
        )
    }

    #[test]
    fn count_by_sorts_descending_with_first_seen_ties() {
        let t = sample_table();
        let counts = count_by(&t, "type");
        assert_eq!(
            counts,
            vec![
                (Value::String("Movie".into()), 1),
                (Value::String("TV Show".into()), 1),
            ]
        );
    }

    #[test]
    fn count_by_skips_null_cells() {
        let t = Table::with_columns(
            vec!["c".into()],
            vec![
                [("c".to_string(), Value::String("x".into()))].into_iter().collect(),
                [("c".to_string(), Value::Null)].into_iter().collect(),
            ],
        );
        assert_eq!(count_by(&t, "c"), vec![(Value::String("x".into()), 1)]);
    }

    #[test]
    fn count_by_treats_nan_cells_as_missing() {
        use crate::data::loader::infer_value;
        let t = Table::with_columns(
            vec!["c".into()],
            ["x", "NaN", "NaN", "NaN"]
                .iter()
                .map(|s| [("c".to_string(), infer_value(s))].into_iter().collect())
                .collect(),
        );
        assert_eq!(count_by(&t, "c"), vec![(Value::String("x".into()), 1)]);
    }

    #[test]
    fn count_by_groups_equal_float_cells() {
        let t = Table::with_columns(
            vec!["c".into()],
            vec![
                [("c".to_string(), Value::Float(f64::NAN))].into_iter().collect(),
                [("c".to_string(), Value::Float(f64::NAN))].into_iter().collect(),
                [("c".to_string(), Value::Float(1.5))].into_iter().collect(),
            ],
        );
        let counts = count_by(&t, "c");
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].1, 2);
    }

    #[test]
    fn split_and_count_counts_token_occurrences() {
        let t = sample_table();
        let counts = split_and_count(&t, "listed_in", ',', Some(10));
        assert_eq!(
            counts,
            vec![("Drama".to_string(), 2), ("Comedy".to_string(), 1)]
        );
        // Sum of counts equals token occurrences, not row count.
        let total: u64 = counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn split_and_count_drops_empty_tokens() {
        let t = Table::with_columns(
            vec!["country".into()],
            vec![[(
                "country".to_string(),
                Value::String("Spain, , France,".into()),
            )]
            .into_iter()
            .collect()],
        );
        let counts = split_and_count(&t, "country", ',', None);
        assert_eq!(
            counts,
            vec![("Spain".to_string(), 1), ("France".to_string(), 1)]
        );
    }

    #[test]
    fn split_and_count_formats_non_string_cells() {
        let t = Table::with_columns(
            vec!["country".into()],
            vec![
                [("country".to_string(), Value::String("Spain".into()))]
                    .into_iter()
                    .collect(),
                [("country".to_string(), Value::Integer(2021))]
                    .into_iter()
                    .collect(),
            ],
        );
        let counts = split_and_count(&t, "country", ',', None);
        assert_eq!(
            counts,
            vec![("Spain".to_string(), 1), ("2021".to_string(), 1)]
        );
    }

    #[test]
    fn categorical_summaries_skip_date_columns() {
        let d = chrono::NaiveDate::from_ymd_opt(2021, 9, 25).unwrap();
        let t = Table::with_columns(
            vec!["date_added".into(), "rating".into()],
            vec![[
                ("date_added".to_string(), Value::Date(d)),
                ("rating".to_string(), Value::String("PG".into())),
            ]
            .into_iter()
            .collect()],
        );
        let summaries = categorical_summaries(&t, 3);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].0, "rating");
    }

    #[test]
    fn describe_matches_sample_statistics() {
        let t = Table::with_columns(
            vec!["v".into()],
            (1..=4)
                .map(|i| {
                    [("v".to_string(), Value::Integer(i))]
                        .into_iter()
                        .collect()
                })
                .collect(),
        );
        let summary = &numeric_describe(&t, &["v".to_string()])[0];
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, Some(2.5));
        // Sample std of 1..4 with n-1 denominator.
        let expected = (5.0f64 / 3.0).sqrt();
        assert!((summary.std.unwrap() - expected).abs() < 1e-12);
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.q25, Some(1.75));
        assert_eq!(summary.median, Some(2.5));
        assert_eq!(summary.q75, Some(3.25));
        assert_eq!(summary.max, Some(4.0));
    }

    #[test]
    fn describe_on_all_null_column_returns_null_stats() {
        let t = Table::with_columns(
            vec!["v".into()],
            vec![
                [("v".to_string(), Value::Null)].into_iter().collect(),
                [("v".to_string(), Value::Null)].into_iter().collect(),
            ],
        );
        let summary = &numeric_describe(&t, &["v".to_string()])[0];
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.std, None);
        assert_eq!(summary.min, None);
        assert_eq!(summary.max, None);
    }

    #[test]
    fn netflix_scalar_metrics() {
        let t = sample_table();
        let metrics = scalar_metrics(&t, DatasetProfile::Netflix);
        assert_eq!(
            metrics,
            vec![
                ("Total Titles".to_string(), 2),
                ("Movies".to_string(), 1),
                ("TV Shows".to_string(), 1),
            ]
        );
    }

    #[test]
    fn generic_scalar_metrics_count_numeric_columns() {
        let t = sample_table();
        let metrics = scalar_metrics(&t, DatasetProfile::Generic);
        assert_eq!(
            metrics,
            vec![
                ("Total Records".to_string(), 2),
                ("Total Columns".to_string(), 5),
                ("Numeric Columns".to_string(), 1),
            ]
        );
    }
}
