use serde::Serialize;

use crate::data::aggregate::{count_by, split_and_count, top_n};
use crate::data::error::DataError;
use crate::data::model::{DatasetProfile, Row, Table, Value};

// ---------------------------------------------------------------------------
// ChartSpec – declarative, renderer-agnostic chart description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Bar,
    Histogram,
    Pie,
    Choropleth,
    Scatter,
    Table,
}

impl ChartKind {
    /// Tab label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Histogram => "Histogram",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Choropleth => "Map",
            ChartKind::Scatter => "Scatter",
            ChartKind::Table => "Data Table",
        }
    }
}

/// Column-to-visual-role mapping consumed by the renderer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Encoding {
    pub x: Option<String>,
    pub y: Option<String>,
    pub color: Option<String>,
}

/// Renderer styling hints that are part of the chart's meaning (bin count)
/// rather than its pixels.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StyleHints {
    pub bins: Option<usize>,
}

/// One chart to draw: a kind tag, a prepared result table and the encoding.
/// No chart performs filtering; the input table is already filtered.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub data: Table,
    pub encoding: Encoding,
    pub hints: StyleHints,
}

/// Result of building a chart. Missing prerequisites degrade to an
/// informational message instead of an error.
#[derive(Debug, Clone)]
pub enum ChartOutcome {
    Chart {
        spec: ChartSpec,
        /// Secondary table shown next to the chart (top-10 countries).
        companion: Option<Table>,
    },
    Unavailable(String),
}

impl DatasetProfile {
    /// The chart tabs offered for this profile, in display order.
    pub fn default_charts(self) -> &'static [ChartKind] {
        match self {
            DatasetProfile::Netflix => &[
                ChartKind::Bar,
                ChartKind::Histogram,
                ChartKind::Pie,
                ChartKind::Choropleth,
                ChartKind::Table,
            ],
            DatasetProfile::Generic => &[
                ChartKind::Scatter,
                ChartKind::Histogram,
                ChartKind::Pie,
                ChartKind::Table,
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the chart description for one tab. Pure; errors are recovered here
/// into `ChartOutcome::Unavailable`.
pub fn build(kind: ChartKind, table: &Table, profile: DatasetProfile) -> ChartOutcome {
    match build_inner(kind, table, profile) {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("chart {:?} unavailable: {e}", kind);
            ChartOutcome::Unavailable(e.to_string())
        }
    }
}

fn build_inner(
    kind: ChartKind,
    table: &Table,
    profile: DatasetProfile,
) -> Result<ChartOutcome, DataError> {
    use DatasetProfile::*;
    match (profile, kind) {
        (_, ChartKind::Table) => table_preview(table),
        (Netflix, ChartKind::Bar) => netflix_type_bar(table),
        (Netflix, ChartKind::Histogram) => netflix_year_histogram(table),
        (Netflix, ChartKind::Pie) => netflix_genre_pie(table),
        (Netflix, ChartKind::Choropleth) => netflix_country_map(table),
        (Generic, ChartKind::Bar) | (Generic, ChartKind::Scatter) => generic_scatter(table),
        (Generic, ChartKind::Histogram) => generic_histogram(table),
        (Generic, ChartKind::Pie) => generic_pie(table),
        (Generic, ChartKind::Choropleth) => Ok(ChartOutcome::Unavailable(
            "Map visualization is only available for the Netflix dataset".into(),
        )),
        (Netflix, ChartKind::Scatter) => Ok(ChartOutcome::Unavailable(
            "Scatter is only offered for custom datasets".into(),
        )),
    }
}

fn require_column(table: &Table, name: &str) -> Result<(), DataError> {
    if table.has_column(name) {
        Ok(())
    } else {
        Err(DataError::MissingColumn(name.to_string()))
    }
}

/// Turn (value, count) pairs into a two-column result table.
fn counts_table(label_col: &str, counts: Vec<(Value, u64)>) -> Table {
    let rows: Vec<Row> = counts
        .into_iter()
        .map(|(val, count)| {
            [
                (label_col.to_string(), val),
                ("count".to_string(), Value::Integer(count as i64)),
            ]
            .into_iter()
            .collect()
        })
        .collect();
    Table::with_columns(vec![label_col.to_string(), "count".to_string()], rows)
}

fn token_counts_table(label_col: &str, counts: Vec<(String, u64)>) -> Table {
    counts_table(
        label_col,
        counts
            .into_iter()
            .map(|(s, c)| (Value::String(s), c))
            .collect(),
    )
}

fn chart(spec: ChartSpec) -> Result<ChartOutcome, DataError> {
    Ok(ChartOutcome::Chart {
        spec,
        companion: None,
    })
}

// ---------------------------------------------------------------------------
// Netflix charts
// ---------------------------------------------------------------------------

fn netflix_type_bar(table: &Table) -> Result<ChartOutcome, DataError> {
    require_column(table, "type")?;
    let data = counts_table("type", count_by(table, "type"));
    chart(ChartSpec {
        kind: ChartKind::Bar,
        title: "Content Distribution: Movies vs TV Shows".into(),
        data,
        encoding: Encoding {
            x: Some("type".into()),
            y: Some("count".into()),
            color: Some("type".into()),
        },
        hints: StyleHints::default(),
    })
}

/// Number of fixed-width bins for the release-year histogram.
const HISTOGRAM_BINS: usize = 30;

fn netflix_year_histogram(table: &Table) -> Result<ChartOutcome, DataError> {
    require_column(table, "release_year")?;
    require_column(table, "type")?;

    let samples: Vec<(f64, String)> = table
        .rows
        .iter()
        .filter_map(|row| {
            let year = row.get("release_year").and_then(Value::as_f64)?;
            let ty = row.get("type").and_then(Value::as_str)?;
            Some((year, ty.to_string()))
        })
        .collect();
    if samples.is_empty() {
        return Err(DataError::InsufficientData(
            "no release years to plot".into(),
        ));
    }

    let data = binned_counts(&samples, HISTOGRAM_BINS);
    chart(ChartSpec {
        kind: ChartKind::Histogram,
        title: "Content Release Years Distribution".into(),
        data,
        encoding: Encoding {
            x: Some("bin_start".into()),
            y: Some("count".into()),
            color: Some("type".into()),
        },
        hints: StyleHints {
            bins: Some(HISTOGRAM_BINS),
        },
    })
}

/// Pre-bin labelled samples into fixed-width bins. Output columns:
/// bin_start, bin_end, type, count; one row per (bin, label) with a
/// non-zero count, in bin order.
fn binned_counts(samples: &[(f64, String)], bins: usize) -> Table {
    let min = samples.iter().map(|(v, _)| *v).fold(f64::INFINITY, f64::min);
    let max = samples
        .iter()
        .map(|(v, _)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    // Degenerate range: a single distinct value gets one unit-wide bin.
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };
    let bins = if max > min { bins } else { 1 };

    let mut labels: Vec<String> = Vec::new();
    for (_, label) in samples {
        if !labels.iter().any(|l| l == label) {
            labels.push(label.clone());
        }
    }

    let mut counts = vec![vec![0u64; labels.len()]; bins];
    for (v, label) in samples {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        let li = labels.iter().position(|l| l == label).unwrap_or(0);
        counts[idx][li] += 1;
    }

    let mut rows: Vec<Row> = Vec::new();
    for (bin, per_label) in counts.iter().enumerate() {
        let start = min + bin as f64 * width;
        for (li, &count) in per_label.iter().enumerate() {
            if count == 0 {
                continue;
            }
            rows.push(
                [
                    ("bin_start".to_string(), Value::Float(start)),
                    ("bin_end".to_string(), Value::Float(start + width)),
                    ("type".to_string(), Value::String(labels[li].clone())),
                    ("count".to_string(), Value::Integer(count as i64)),
                ]
                .into_iter()
                .collect(),
            );
        }
    }
    Table::with_columns(
        vec![
            "bin_start".into(),
            "bin_end".into(),
            "type".into(),
            "count".into(),
        ],
        rows,
    )
}

fn netflix_genre_pie(table: &Table) -> Result<ChartOutcome, DataError> {
    require_column(table, "listed_in")?;
    let counts = split_and_count(table, "listed_in", ',', Some(10));
    if counts.is_empty() {
        return Err(DataError::InsufficientData("no genres to plot".into()));
    }
    chart(ChartSpec {
        kind: ChartKind::Pie,
        title: "Top 10 Genres Distribution".into(),
        data: token_counts_table("genre", counts),
        encoding: Encoding {
            x: Some("genre".into()),
            y: Some("count".into()),
            color: Some("genre".into()),
        },
        hints: StyleHints::default(),
    })
}

fn netflix_country_map(table: &Table) -> Result<ChartOutcome, DataError> {
    require_column(table, "country")?;
    // Uncapped: the map needs every distinct country, sorted descending.
    let counts = split_and_count(table, "country", ',', None);
    if counts.is_empty() {
        return Err(DataError::InsufficientData("no countries to plot".into()));
    }
    let top10 = token_counts_table("country", counts.iter().take(10).cloned().collect());
    let spec = ChartSpec {
        kind: ChartKind::Choropleth,
        title: "Content Distribution by Country".into(),
        data: token_counts_table("country", counts),
        encoding: Encoding {
            x: Some("country".into()),
            y: Some("count".into()),
            color: Some("count".into()),
        },
        hints: StyleHints::default(),
    };
    Ok(ChartOutcome::Chart {
        spec,
        companion: Some(top10),
    })
}

// ---------------------------------------------------------------------------
// Generic charts
// ---------------------------------------------------------------------------

fn generic_scatter(table: &Table) -> Result<ChartOutcome, DataError> {
    let numeric = table.numeric_columns();
    if numeric.len() < 2 {
        return Err(DataError::InsufficientData(
            "Not enough numerical columns for visualization".into(),
        ));
    }
    let (xc, yc) = (numeric[0].clone(), numeric[1].clone());
    let rows: Vec<Row> = table
        .rows
        .iter()
        .filter_map(|row| {
            let x = row.get(&xc).and_then(Value::as_f64)?;
            let y = row.get(&yc).and_then(Value::as_f64)?;
            Some(
                [
                    (xc.clone(), Value::Float(x)),
                    (yc.clone(), Value::Float(y)),
                ]
                .into_iter()
                .collect(),
            )
        })
        .collect();
    let title = format!("{yc} vs {xc}");
    chart(ChartSpec {
        kind: ChartKind::Scatter,
        title,
        data: Table::with_columns(vec![xc.clone(), yc.clone()], rows),
        encoding: Encoding {
            x: Some(xc),
            y: Some(yc),
            color: None,
        },
        hints: StyleHints::default(),
    })
}

fn generic_histogram(table: &Table) -> Result<ChartOutcome, DataError> {
    let numeric = table.numeric_columns();
    let Some(col) = numeric.first() else {
        return Err(DataError::InsufficientData(
            "No numerical columns available for histogram".into(),
        ));
    };
    let samples: Vec<(f64, String)> = table
        .rows
        .iter()
        .filter_map(|row| row.get(col).and_then(Value::as_f64))
        .map(|v| (v, col.clone()))
        .collect();
    if samples.is_empty() {
        return Err(DataError::InsufficientData(format!(
            "no values in '{col}' to plot"
        )));
    }
    let title = format!("Distribution of {col}");
    chart(ChartSpec {
        kind: ChartKind::Histogram,
        title,
        data: binned_counts(&samples, HISTOGRAM_BINS),
        encoding: Encoding {
            x: Some("bin_start".into()),
            y: Some("count".into()),
            color: None,
        },
        hints: StyleHints {
            bins: Some(HISTOGRAM_BINS),
        },
    })
}

fn generic_pie(table: &Table) -> Result<ChartOutcome, DataError> {
    let categorical = table.categorical_columns();
    let Some(col) = categorical.first() else {
        return Err(DataError::InsufficientData(
            "No categorical columns available for pie chart".into(),
        ));
    };
    let counts = top_n(table, col, 10);
    let title = format!("Distribution of {col} (Top 10)");
    chart(ChartSpec {
        kind: ChartKind::Pie,
        title,
        data: counts_table(col, counts),
        encoding: Encoding {
            x: Some(col.clone()),
            y: Some("count".into()),
            color: Some(col.clone()),
        },
        hints: StyleHints::default(),
    })
}

// ---------------------------------------------------------------------------
// Table preview
// ---------------------------------------------------------------------------

/// Rows shown in the preview tab; the download still covers the full table.
const PREVIEW_ROWS: usize = 100;

fn table_preview(table: &Table) -> Result<ChartOutcome, DataError> {
    let rows: Vec<Row> = table.rows.iter().take(PREVIEW_ROWS).cloned().collect();
    chart(ChartSpec {
        kind: ChartKind::Table,
        title: "Filtered Data Preview".into(),
        data: Table::with_columns(table.columns.clone(), rows),
        encoding: Encoding::default(),
        hints: StyleHints::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn netflix_table() -> Table {
        let mk = |ty: &str, title: &str, year: i64, genres: &str, country: &str| -> Row {
            [
                ("type", Value::String(ty.into())),
                ("title", Value::String(title.into())),
                ("release_year", Value::Integer(year)),
                ("listed_in", Value::String(genres.into())),
                ("country", Value::String(country.into())),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
        };
        Table::with_columns(
            ["type", "title", "release_year", "listed_in", "country"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![
                mk("Movie", "A", 2020, "Drama, Comedy", "Spain, France"),
                mk("TV Show", "B", 2021, "Drama", "France"),
            ],
        )
    }

    #[test]
    fn bar_chart_counts_by_type() {
        let ChartOutcome::Chart { spec, .. } =
            build(ChartKind::Bar, &netflix_table(), DatasetProfile::Netflix)
        else {
            panic!("expected a chart");
        };
        assert_eq!(spec.kind, ChartKind::Bar);
        assert_eq!(spec.data.len(), 2);
        assert_eq!(spec.data.rows[0]["count"], Value::Integer(1));
        assert_eq!(spec.encoding.color.as_deref(), Some("type"));
    }

    #[test]
    fn histogram_is_prebinned_with_thirty_bins() {
        let ChartOutcome::Chart { spec, .. } = build(
            ChartKind::Histogram,
            &netflix_table(),
            DatasetProfile::Netflix,
        ) else {
            panic!("expected a chart");
        };
        assert_eq!(spec.hints.bins, Some(30));
        // Every (bin, type) row carries a positive count.
        for row in &spec.data.rows {
            assert!(matches!(row["count"], Value::Integer(c) if c > 0));
        }
        let total: i64 = spec
            .data
            .rows
            .iter()
            .map(|r| match r["count"] {
                Value::Integer(c) => c,
                _ => 0,
            })
            .sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn choropleth_is_uncapped_with_top_ten_companion() {
        let ChartOutcome::Chart { spec, companion } = build(
            ChartKind::Choropleth,
            &netflix_table(),
            DatasetProfile::Netflix,
        ) else {
            panic!("expected a chart");
        };
        // France appears twice (in both rows), Spain once; descending order.
        assert_eq!(spec.data.rows[0]["country"], Value::String("France".into()));
        assert_eq!(spec.data.rows[0]["count"], Value::Integer(2));
        assert_eq!(companion.unwrap().len(), 2);
    }

    #[test]
    fn missing_country_column_degrades_gracefully() {
        let t = Table::with_columns(
            vec!["type".into(), "title".into()],
            vec![[
                ("type".to_string(), Value::String("Movie".into())),
                ("title".to_string(), Value::String("A".into())),
            ]
            .into_iter()
            .collect()],
        );
        let outcome = build(ChartKind::Choropleth, &t, DatasetProfile::Netflix);
        assert!(matches!(outcome, ChartOutcome::Unavailable(_)));
    }

    #[test]
    fn generic_scatter_needs_two_numeric_columns() {
        let t = Table::with_columns(
            vec!["name".into(), "score".into()],
            vec![[
                ("name".to_string(), Value::String("a".into())),
                ("score".to_string(), Value::Integer(1)),
            ]
            .into_iter()
            .collect()],
        );
        let outcome = build(ChartKind::Scatter, &t, DatasetProfile::Generic);
        let ChartOutcome::Unavailable(msg) = outcome else {
            panic!("expected unavailable");
        };
        assert!(msg.contains("numerical columns"));
    }

    #[test]
    fn table_preview_caps_at_one_hundred_rows() {
        let rows: Vec<Row> = (0..150)
            .map(|i| {
                [("n".to_string(), Value::Integer(i))]
                    .into_iter()
                    .collect()
            })
            .collect();
        let t = Table::with_columns(vec!["n".into()], rows);
        let ChartOutcome::Chart { spec, .. } =
            build(ChartKind::Table, &t, DatasetProfile::Generic)
        else {
            panic!("expected a chart");
        };
        assert_eq!(spec.data.len(), 100);
    }
}
