use std::collections::BTreeSet;

use crate::chart::ChartKind;
use crate::data::clean::{clean, CleanReport};
use crate::data::filter::{apply, default_filter, ColumnFilter, FilterSpec};
use crate::data::model::{DatasetProfile, Table, Value};

// ---------------------------------------------------------------------------
// Session – the loaded dataset held for the app's lifetime
// ---------------------------------------------------------------------------

/// The immutable base dataset plus its provenance. Owned by the state and
/// passed by reference into each pipeline call.
pub struct Session {
    pub profile: DatasetProfile,
    /// Cleaned base table; every interaction recomputes from here.
    pub base: Table,
    pub description: String,
    pub report: CleanReport,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until the user loads or uploads a file).
    pub session: Option<Session>,

    /// Per-column filter constraints, rebuilt from widget interactions.
    pub filters: FilterSpec,

    /// Result of the last filter pass (recomputed on every filter change).
    pub filtered: Option<Table>,

    /// Selected chart tab.
    pub active_chart: ChartKind,

    /// Generic profile only: which categorical column the filter targets.
    pub filter_column: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: None,
            filters: FilterSpec::default(),
            filtered: None,
            active_chart: ChartKind::Table,
            filter_column: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded raw table: clean it, initialise default filters
    /// (full observed domain) and reset the tab selection.
    pub fn set_session(&mut self, raw: Table, description: String, profile: DatasetProfile) {
        let (base, report) = clean(raw, profile);
        log::info!(
            "loaded {} ({} of {} rows kept after cleaning)",
            profile.key(),
            report.kept_rows,
            report.original_rows
        );

        for col in profile.expected_columns() {
            if !base.has_column(col) {
                log::warn!("expected column '{col}' is missing; dependent features disabled");
            }
        }

        self.filters = default_filter(&base, profile);
        self.filter_column = match profile {
            DatasetProfile::Generic => base.categorical_columns().first().cloned(),
            DatasetProfile::Netflix => None,
        };
        self.active_chart = profile.default_charts()[0];
        self.filtered = Some(base.clone());
        self.session = Some(Session {
            profile,
            base,
            description,
            report,
        });
        self.status_message = None;
    }

    /// Recompute the filtered table after a filter change.
    pub fn refilter(&mut self) {
        if let Some(session) = &self.session {
            self.filtered = Some(apply(&session.base, &self.filters));
        }
    }

    /// Toggle a single value in a column's accepted set.
    pub fn toggle_filter_value(&mut self, column: &str, value: &Value) {
        let entry = self
            .filters
            .entry(column.to_string())
            .or_insert_with(|| ColumnFilter::OneOf(BTreeSet::new()));
        if let ColumnFilter::OneOf(selected) = entry {
            if selected.contains(value) {
                selected.remove(value);
            } else {
                selected.insert(value.clone());
            }
        }
        self.refilter();
    }

    /// Select the full observed domain of a column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(session) = &self.session {
            if let Some(all_vals) = session.base.unique_values.get(column) {
                self.filters
                    .insert(column.to_string(), ColumnFilter::OneOf(all_vals.clone()));
                self.refilter();
            }
        }
    }

    /// Deselect all values in a column (yields an empty result, by design of
    /// the filter semantics).
    pub fn select_none(&mut self, column: &str) {
        self.filters
            .insert(column.to_string(), ColumnFilter::OneOf(BTreeSet::new()));
        self.refilter();
    }

    /// Update the inclusive numeric range filter on a column.
    pub fn set_range(&mut self, column: &str, lo: f64, hi: f64) {
        self.filters
            .insert(column.to_string(), ColumnFilter::Range { lo, hi });
        self.refilter();
    }

    /// Current range filter bounds for a column, if one is active.
    pub fn range_of(&self, column: &str) -> Option<(f64, f64)> {
        match self.filters.get(column) {
            Some(ColumnFilter::Range { lo, hi }) => Some((*lo, *hi)),
            _ => None,
        }
    }

    /// Generic profile: retarget the categorical filter at another column,
    /// starting again from its full observed domain.
    pub fn set_filter_column(&mut self, column: String) {
        if let Some(old) = self.filter_column.take() {
            self.filters.remove(&old);
        }
        if let Some(session) = &self.session {
            if let Some(all_vals) = session.base.unique_values.get(&column) {
                self.filters
                    .insert(column.clone(), ColumnFilter::OneOf(all_vals.clone()));
            }
        }
        self.filter_column = Some(column);
        self.refilter();
    }
}
