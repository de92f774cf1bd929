use std::collections::{BTreeMap, BTreeSet};

use super::model::{DatasetProfile, Table, Value};

// ---------------------------------------------------------------------------
// Filter predicates: per-column accepted values or inclusive numeric range
// ---------------------------------------------------------------------------

/// Constraint applied to a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Row kept iff its value is a member of the set. An empty set keeps
    /// nothing (not an error).
    OneOf(BTreeSet<Value>),
    /// Row kept iff `lo <= value <= hi` (inclusive). Null and non-numeric
    /// cells are excluded once a range targets the column.
    Range { lo: f64, hi: f64 },
}

/// Per-column constraints. Absent keys mean "no restriction on that column";
/// multiple entries compose by conjunction.
pub type FilterSpec = BTreeMap<String, ColumnFilter>;

/// Build the default spec for a profile: the full observed domain of every
/// filterable column, selected explicitly. Defaults must cover everything the
/// base table actually contains, so later narrowing starts from "all
/// selected" and the untouched default filters nothing out.
pub fn default_filter(table: &Table, profile: DatasetProfile) -> FilterSpec {
    let mut spec = FilterSpec::new();
    match profile {
        DatasetProfile::Netflix => {
            for col in ["type", "rating"] {
                if let Some(vals) = table.unique_values.get(col) {
                    spec.insert(col.to_string(), ColumnFilter::OneOf(vals.clone()));
                }
            }
            if let Some((lo, hi)) = table.numeric_bounds("release_year") {
                spec.insert("release_year".into(), ColumnFilter::Range { lo, hi });
            }
        }
        DatasetProfile::Generic => {
            // First categorical column, all values selected.
            if let Some(col) = table.categorical_columns().first() {
                if let Some(vals) = table.unique_values.get(col) {
                    spec.insert(col.clone(), ColumnFilter::OneOf(vals.clone()));
                }
            }
        }
    }
    spec
}

/// Apply every constraint in `spec` to `table`, producing a new table with
/// the surviving rows in their original order. Pure: the input is untouched.
///
/// A row passes a `OneOf` filter when:
/// * the selected set covers the column's full observed domain → passes
///   (no effective filter, Null-valued rows included)
/// * its value for that column is in the selected set → passes
/// * rows without the column behave as Null-valued
pub fn apply(table: &Table, spec: &FilterSpec) -> Table {
    let rows: Vec<_> = table
        .rows
        .iter()
        .filter(|row| {
            for (col, constraint) in spec {
                match constraint {
                    ColumnFilter::OneOf(selected) => {
                        if selected.is_empty() {
                            // Nothing selected for this column → hide everything
                            return false;
                        }
                        if let Some(all_vals) = table.unique_values.get(col) {
                            if all_vals.iter().all(|v| selected.contains(v)) {
                                continue; // full domain selected, no filtering needed
                            }
                        }
                        let val = row.get(col).unwrap_or(&Value::Null);
                        if !selected.contains(val) {
                            return false;
                        }
                    }
                    ColumnFilter::Range { lo, hi } => {
                        match row.get(col).and_then(Value::as_f64) {
                            Some(v) => {
                                if v < *lo || v > *hi {
                                    return false;
                                }
                            }
                            None => return false,
                        }
                    }
                }
            }
            true
        })
        .cloned()
        .collect();

    Table::with_columns(table.columns.clone(), rows)
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

    fn one_of(vals: &[&str]) -> ColumnFilter {
        ColumnFilter::OneOf(vals.iter().map(|v| Value::String(v.to_string())).collect())
    }

    #[test]
    fn default_filter_is_a_no_op() {
        let t = sample_table();
        let spec = default_filter(&t, DatasetProfile::Netflix);
        assert!(spec.contains_key("type"));
        assert!(spec.contains_key("rating"));
        assert!(spec.contains_key("release_year"));
        let filtered = apply(&t, &spec);
        assert_eq!(filtered.len(), t.len());
    }

    #[test]
    fn full_domain_selection_keeps_null_valued_rows() {
        let mut rows = sample_table().rows;
        rows[0].insert("rating".into(), Value::Null);
        let t = Table::with_columns(sample_table().columns, rows);

        let mut spec = default_filter(&t, DatasetProfile::Netflix);
        assert_eq!(apply(&t, &spec).len(), 2);

        // Dropping Null from the selection hides the Null-rated row.
        if let Some(ColumnFilter::OneOf(set)) = spec.get_mut("rating") {
            set.remove(&Value::Null);
        }
        let filtered = apply(&t, &spec);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows[0]["title"], Value::String("B".into()));
    }

    #[test]
    fn categorical_filter_keeps_members_only() {
        let t = sample_table();
        let mut spec = FilterSpec::new();
        spec.insert("type".into(), one_of(&["Movie"]));
        let filtered = apply(&t, &spec);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows[0]["title"], Value::String("A".into()));
    }

    #[test]
    fn range_filter_is_inclusive() {
        let t = sample_table();
        let mut spec = FilterSpec::new();
        spec.insert(
            "release_year".into(),
            ColumnFilter::Range { lo: 2021.0, hi: 2021.0 },
        );
        let filtered = apply(&t, &spec);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows[0]["title"], Value::String("B".into()));
    }

    #[test]
    fn range_filter_excludes_null_cells() {
        let mut t = sample_table();
        t.rows[0].insert("release_year".into(), Value::Null);
        let t = Table::with_columns(t.columns.clone(), t.rows);
        let mut spec = FilterSpec::new();
        spec.insert(
            "release_year".into(),
            ColumnFilter::Range { lo: 1900.0, hi: 2100.0 },
        );
        let filtered = apply(&t, &spec);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn empty_accepted_set_yields_empty_table() {
        let t = sample_table();
        let mut spec = FilterSpec::new();
        spec.insert("type".into(), ColumnFilter::OneOf(BTreeSet::new()));
        let filtered = apply(&t, &spec);
        assert!(filtered.is_empty());
    }

    #[test]
    fn filters_compose_by_conjunction() {
        let t = sample_table();
        let mut spec = FilterSpec::new();
        spec.insert("type".into(), one_of(&["Movie", "TV Show"]));
        spec.insert(
            "release_year".into(),
            ColumnFilter::Range { lo: 2020.0, hi: 2020.0 },
        );
        let filtered = apply(&t, &spec);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows[0]["title"], Value::String("A".into()));
    }

    #[test]
    fn apply_is_idempotent_and_never_duplicates_rows() {
        let t = sample_table();
        let mut spec = FilterSpec::new();
        spec.insert("rating".into(), one_of(&["PG"]));
        let once = apply(&t, &spec);
        let twice = apply(&once, &spec);
        assert_eq!(once.len(), twice.len());
        assert!(once.len() <= t.len());
        for (a, b) in once.rows.iter().zip(twice.rows.iter()) {
            assert_eq!(a, b);
        }
    }
}
