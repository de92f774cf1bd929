use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Value – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value. Using `BTreeMap` / `BTreeSet` downstream
/// so `Value` must be `Ord`.
#[derive(Debug, Clone)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Null,
}

// -- Manual Eq/Ord/Hash so we can put Value in BTreeSet and HashMap --

/// Equality must agree with `Ord` and `Hash`, so floats compare by total
/// order: NaN equals NaN, 0.0 and -0.0 are distinct.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                String(_) => 3,
                Date(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Date(d) => d.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Null => Ok(()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Date(d) => serializer.serialize_str(&d.to_string()),
            Value::Null => serializer.serialize_none(),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64` for range filters and stats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Row / Table – the in-memory dataset
// ---------------------------------------------------------------------------

/// One record: column_name → value.
pub type Row = BTreeMap<String, Value>;

/// Whether a column holds numbers or categories, decided from observed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-null cell is Integer or Float, and at least one is non-null.
    Numeric,
    /// At least one non-null cell, not all numeric and not all dates.
    Categorical,
    /// Every non-null cell is a Date, and at least one is non-null.
    Temporal,
    /// No non-null cells at all.
    Empty,
}

/// A loaded table with pre-computed column indices. Immutable once built;
/// cleaning and filtering produce new tables.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    /// All rows, in load order.
    pub rows: Vec<Row>,
    /// Column names in their original (header) order.
    pub columns: Vec<String>,
    /// For each column the sorted set of observed values (includes Null
    /// whenever a cell is missing or empty).
    #[serde(skip)]
    pub unique_values: BTreeMap<String, BTreeSet<Value>>,
}

impl Table {
    /// Build the unique-value index for a known column order.
    pub fn with_columns(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<Value>> = BTreeMap::new();
        for col in &columns {
            unique_values.insert(col.clone(), BTreeSet::new());
        }
        for row in &rows {
            for col in &columns {
                let val = row.get(col).cloned().unwrap_or(Value::Null);
                unique_values.entry(col.clone()).or_default().insert(val);
            }
        }
        Table {
            rows,
            columns,
            unique_values,
        }
    }

    /// Build a table deriving the column order from the rows (sorted names).
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut column_set: BTreeSet<String> = BTreeSet::new();
        for row in &rows {
            for col in row.keys() {
                column_set.insert(col.clone());
            }
        }
        Self::with_columns(column_set.into_iter().collect(), rows)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_kind(&self, name: &str) -> ColumnKind {
        let mut non_null = 0usize;
        let mut numeric = 0usize;
        let mut dates = 0usize;
        for row in &self.rows {
            match row.get(name) {
                None | Some(Value::Null) => {}
                Some(Value::Integer(_)) | Some(Value::Float(_)) => {
                    non_null += 1;
                    numeric += 1;
                }
                Some(Value::Date(_)) => {
                    non_null += 1;
                    dates += 1;
                }
                Some(_) => non_null += 1,
            }
        }
        if non_null == 0 {
            ColumnKind::Empty
        } else if numeric == non_null {
            ColumnKind::Numeric
        } else if dates == non_null {
            ColumnKind::Temporal
        } else {
            ColumnKind::Categorical
        }
    }

    /// Column names classified as numeric, in header order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| self.column_kind(c) == ColumnKind::Numeric)
            .cloned()
            .collect()
    }

    /// Column names classified as categorical, in header order. Date-typed
    /// columns are temporal, not categorical, and never appear here.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| self.column_kind(c) == ColumnKind::Categorical)
            .cloned()
            .collect()
    }

    /// Observed numeric min/max of a column, ignoring nulls.
    pub fn numeric_bounds(&self, name: &str) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for row in &self.rows {
            if let Some(v) = row.get(name).and_then(Value::as_f64) {
                bounds = Some(match bounds {
                    None => (v, v),
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                });
            }
        }
        bounds
    }
}

// ---------------------------------------------------------------------------
// DatasetProfile – which class of data is loaded
// ---------------------------------------------------------------------------

/// A named configuration of expected columns, cleaning rules and default
/// charts for one class of input data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DatasetProfile {
    Netflix,
    Generic,
}

impl DatasetProfile {
    /// Short key used in export file names.
    pub fn key(self) -> &'static str {
        match self {
            DatasetProfile::Netflix => "netflix",
            DatasetProfile::Generic => "generic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DatasetProfile::Netflix => "Netflix Movies & TV Shows",
            DatasetProfile::Generic => "Custom dataset",
        }
    }

    /// Columns this profile's cleaning and charts rely on. Anything else in
    /// the input is carried through untouched.
    pub fn expected_columns(self) -> &'static [&'static str] {
        match self {
            DatasetProfile::Netflix => &[
                "type",
                "title",
                "rating",
                "release_year",
                "date_added",
                "listed_in",
                "country",
            ],
            DatasetProfile::Generic => &[],
        }
    }
}
