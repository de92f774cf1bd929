use std::collections::BTreeSet;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::ColumnFilter;
use crate::data::loader;
use crate::data::model::{DatasetProfile, Value};
use crate::state::AppState;
use crate::ui::value_label;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Load Netflix dataset").clicked() {
                load_netflix(state);
                ui.close_menu();
            }
            if ui.button("Upload CSV / JSON…").clicked() {
                upload_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(session), Some(filtered)) = (&state.session, &state.filtered) {
            ui.label(format!(
                "{} records, {} after filters",
                session.base.len(),
                filtered.len()
            ));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

fn load_netflix(state: &mut AppState) {
    match loader::load_netflix() {
        Ok((table, description, profile)) => {
            state.set_session(table, description, profile);
        }
        Err(e) => {
            log::error!("failed to load Netflix dataset: {e}");
            state.status_message = Some(e.to_string());
        }
    }
}

/// Pick an uploaded file and parse it under the generic profile.
fn upload_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload tabular data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    let Some(path) = file else {
        return;
    };
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv")
        .to_string();

    let loaded = std::fs::read(&path)
        .with_context(|| format!("reading {}", path.display()))
        .map_err(|e| e.to_string())
        .and_then(|bytes| loader::load_generic(&name, &bytes).map_err(|e| e.to_string()));

    match loaded {
        Ok((table, description, profile)) => {
            log::info!("uploaded '{name}' with {} rows", table.len());
            state.set_session(table, description, profile);
        }
        Err(msg) => {
            log::error!("failed to load upload: {msg}");
            state.status_message = Some(msg);
        }
    }
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel for the loaded profile.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(session) = &state.session else {
        ui.label("No dataset loaded.");
        return;
    };

    let profile = session.profile;
    ui.label(RichText::new(&session.description).small());
    ui.label(
        RichText::new(format!(
            "{} titles (originally {} records)",
            session.report.kept_rows, session.report.original_rows
        ))
        .small(),
    );
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match profile {
            DatasetProfile::Netflix => netflix_filters(ui, state),
            DatasetProfile::Generic => generic_filters(ui, state),
        });
}

fn netflix_filters(ui: &mut Ui, state: &mut AppState) {
    for col in ["type", "rating"] {
        category_filter(ui, state, col);
    }
    year_range_filter(ui, state, "release_year");
}

fn generic_filters(ui: &mut Ui, state: &mut AppState) {
    let Some(session) = &state.session else {
        return;
    };
    let categorical = session.base.categorical_columns();
    if categorical.is_empty() {
        ui.label("No categorical columns to filter.");
        return;
    }

    ui.strong("Filter column");
    let current = state.filter_column.clone().unwrap_or_default();
    let mut chosen: Option<String> = None;
    egui::ComboBox::from_id_salt("filter_column")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &categorical {
                if ui.selectable_label(current == *col, col).clicked() {
                    chosen = Some(col.clone());
                }
            }
        });
    if let Some(col) = chosen {
        state.set_filter_column(col);
    }
    ui.separator();

    if let Some(col) = state.filter_column.clone() {
        category_filter(ui, state, &col);
    }
}

/// Checkbox set over a column's observed values, with All/None shortcuts
/// (collapsible, selected/total count in the header).
fn category_filter(ui: &mut Ui, state: &mut AppState, col: &str) {
    let Some(session) = &state.session else {
        return;
    };
    let Some(all_values) = session.base.unique_values.get(col).cloned() else {
        return;
    };

    let selected: BTreeSet<Value> = match state.filters.get(col) {
        Some(ColumnFilter::OneOf(set)) => set.clone(),
        _ => all_values.clone(),
    };

    let header_text = format!("{col}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(col)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(col);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(col);
                }
            });

            let mut toggled: Vec<Value> = Vec::new();
            for val in &all_values {
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, value_label(val)).changed() {
                    toggled.push(val.clone());
                }
            }
            for val in toggled {
                state.toggle_filter_value(col, &val);
            }
        });
}

/// Inclusive numeric range over a column, bounded by the base table's
/// observed min/max.
fn year_range_filter(ui: &mut Ui, state: &mut AppState, col: &str) {
    let Some(session) = &state.session else {
        return;
    };
    let Some((min, max)) = session.base.numeric_bounds(col) else {
        return;
    };
    let (min, max) = (min as i64, max as i64);

    let (cur_lo, cur_hi) = state
        .range_of(col)
        .map(|(lo, hi)| (lo as i64, hi as i64))
        .unwrap_or((min, max));

    ui.strong(format!("{col} range"));
    let mut lo = cur_lo;
    let mut hi = cur_hi;
    let lo_changed = ui
        .add(egui::Slider::new(&mut lo, min..=max).text("from"))
        .changed();
    let hi_changed = ui
        .add(egui::Slider::new(&mut hi, min..=max).text("to"))
        .changed();

    if lo_changed || hi_changed {
        if lo > hi {
            if lo_changed {
                hi = lo;
            } else {
                lo = hi;
            }
        }
        state.set_range(col, lo as f64, hi as f64);
    }
}
