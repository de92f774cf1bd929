use eframe::egui::{self, Color32, Pos2, RichText, ScrollArea, Sense, Shape, Stroke, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::chart::{self, ChartKind, ChartOutcome, ChartSpec};
use crate::color::{ColorMap, ACCENT};
use crate::data::model::{DatasetProfile, Table, Value};
use crate::data::{aggregate, export};
use crate::state::AppState;
use crate::ui::value_label;

// ---------------------------------------------------------------------------
// Central panel: metrics, chart tabs, summary
// ---------------------------------------------------------------------------

/// Render the central panel: headline metrics, the chart tab bar, the active
/// chart and the summary statistics section.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(profile) = state.session.as_ref().map(|s| s.profile) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a dataset to begin exploring  (File → Load / Upload…)");
        });
        return;
    };

    // Tab bar first; it only touches `active_chart`.
    ui.horizontal(|ui: &mut Ui| {
        for &kind in profile.default_charts() {
            if ui
                .selectable_label(state.active_chart == kind, kind.label())
                .clicked()
            {
                state.active_chart = kind;
            }
        }
    });
    ui.separator();

    let active = state.active_chart;
    let status = {
        let Some(filtered) = &state.filtered else {
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| {
                metrics_row(ui, filtered, profile);
                ui.separator();

                let status = match chart::build(active, filtered, profile) {
                    ChartOutcome::Chart { spec, companion } => {
                        render_chart(ui, &spec, companion.as_ref(), filtered, profile)
                    }
                    ChartOutcome::Unavailable(msg) => {
                        ui.label(RichText::new(msg).color(Color32::LIGHT_BLUE));
                        None
                    }
                };

                ui.separator();
                summary_section(ui, filtered);
                status
            })
            .inner
    };

    if let Some(msg) = status {
        state.status_message = Some(msg);
    }
}

fn metrics_row(ui: &mut Ui, filtered: &Table, profile: DatasetProfile) {
    let metrics = aggregate::scalar_metrics(filtered, profile);
    ui.columns(metrics.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(metrics) {
            col.vertical_centered(|ui: &mut Ui| {
                ui.label(label);
                ui.label(RichText::new(value.to_string()).size(24.0).strong().color(ACCENT));
            });
        }
    });
}

fn render_chart(
    ui: &mut Ui,
    spec: &ChartSpec,
    companion: Option<&Table>,
    filtered: &Table,
    profile: DatasetProfile,
) -> Option<String> {
    ui.strong(&spec.title);
    match spec.kind {
        ChartKind::Bar => {
            bar_chart(ui, spec);
            None
        }
        ChartKind::Histogram => {
            histogram(ui, spec);
            None
        }
        ChartKind::Pie => {
            pie_chart(ui, spec);
            None
        }
        ChartKind::Choropleth => {
            choropleth(ui, spec, companion);
            None
        }
        ChartKind::Scatter => {
            scatter(ui, spec);
            None
        }
        ChartKind::Table => data_table(ui, spec, filtered, profile),
    }
}

// ---------------------------------------------------------------------------
// Bar / histogram / scatter (egui_plot)
// ---------------------------------------------------------------------------

fn categories(spec: &ChartSpec) -> Vec<String> {
    let Some(label_col) = spec.encoding.x.as_deref() else {
        return Vec::new();
    };
    spec.data
        .rows
        .iter()
        .map(|row| value_label(row.get(label_col).unwrap_or(&Value::Null)))
        .collect()
}

fn bar_chart(ui: &mut Ui, spec: &ChartSpec) {
    let labels = categories(spec);
    let colors = ColorMap::new(&labels);

    Plot::new(spec.title.clone())
        .legend(Legend::default())
        .height(360.0)
        .show_x(false)
        .show(ui, |plot_ui| {
            for (i, (row, label)) in spec.data.rows.iter().zip(&labels).enumerate() {
                let count = row.get("count").and_then(Value::as_f64).unwrap_or(0.0);
                let bar = Bar::new(i as f64, count).width(0.6);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(label)
                        .color(colors.color_for(label)),
                );
            }
        });
}

fn histogram(ui: &mut Ui, spec: &ChartSpec) {
    // Stacked bars, one series per content type, pre-binned by the builder.
    let mut labels: Vec<String> = Vec::new();
    for row in &spec.data.rows {
        let label = value_label(row.get("type").unwrap_or(&Value::Null));
        if !labels.iter().any(|l| l == &label) {
            labels.push(label);
        }
    }
    let colors = ColorMap::new(&labels);

    let mut series: Vec<Vec<Bar>> = vec![Vec::new(); labels.len()];
    let mut offsets: std::collections::BTreeMap<u64, f64> = std::collections::BTreeMap::new();

    for row in &spec.data.rows {
        let start = row.get("bin_start").and_then(Value::as_f64).unwrap_or(0.0);
        let end = row.get("bin_end").and_then(Value::as_f64).unwrap_or(start + 1.0);
        let count = row.get("count").and_then(Value::as_f64).unwrap_or(0.0);
        let label = value_label(row.get("type").unwrap_or(&Value::Null));
        let li = labels.iter().position(|l| l == &label).unwrap_or(0);

        let center = (start + end) / 2.0;
        let offset = offsets.entry(center.to_bits()).or_insert(0.0);
        let bar = Bar::new(center, count)
            .width((end - start) * 0.95)
            .base_offset(*offset);
        *offset += count;
        series[li].push(bar);
    }

    Plot::new(spec.title.clone())
        .legend(Legend::default())
        .height(360.0)
        .show(ui, |plot_ui| {
            for (li, bars) in series.into_iter().enumerate() {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(&labels[li])
                        .color(colors.color_for(&labels[li])),
                );
            }
        });
}

fn scatter(ui: &mut Ui, spec: &ChartSpec) {
    let (Some(xc), Some(yc)) = (spec.encoding.x.as_deref(), spec.encoding.y.as_deref()) else {
        return;
    };
    let points: PlotPoints = spec
        .data
        .rows
        .iter()
        .filter_map(|row| {
            let x = row.get(xc).and_then(Value::as_f64)?;
            let y = row.get(yc).and_then(Value::as_f64)?;
            Some([x, y])
        })
        .collect();

    Plot::new(spec.title.clone())
        .x_axis_label(xc.to_string())
        .y_axis_label(yc.to_string())
        .height(360.0)
        .show(ui, |plot_ui| {
            plot_ui.points(Points::new(points).radius(2.5).color(ACCENT));
        });
}

// ---------------------------------------------------------------------------
// Pie (painter)
// ---------------------------------------------------------------------------

fn pie_chart(ui: &mut Ui, spec: &ChartSpec) {
    let labels = categories(spec);
    let counts: Vec<f64> = spec
        .data
        .rows
        .iter()
        .map(|row| row.get("count").and_then(Value::as_f64).unwrap_or(0.0))
        .collect();
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return;
    }
    let colors = ColorMap::new(&labels);

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) =
            ui.allocate_painter(Vec2::new(320.0, 320.0), Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.45;

        let mut angle = -std::f64::consts::FRAC_PI_2;
        for (label, &count) in labels.iter().zip(&counts) {
            let sweep = count / total * std::f64::consts::TAU;
            let steps = ((sweep / 0.05).ceil() as usize).max(2);
            let mut points = vec![center];
            for s in 0..=steps {
                let a = angle + sweep * s as f64 / steps as f64;
                points.push(Pos2::new(
                    center.x + radius * a.cos() as f32,
                    center.y + radius * a.sin() as f32,
                ));
            }
            painter.add(Shape::convex_polygon(
                points,
                colors.color_for(label),
                Stroke::NONE,
            ));
            angle += sweep;
        }

        // Legend with percentages.
        ui.vertical(|ui: &mut Ui| {
            for (label, &count) in labels.iter().zip(&counts) {
                let pct = count / total * 100.0;
                ui.label(
                    RichText::new(format!("{label}  ({count:.0}, {pct:.1}%)"))
                        .color(colors.color_for(label)),
                );
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Choropleth fallback
// ---------------------------------------------------------------------------

/// egui has no map widget, so the choropleth spec degrades to a ranked
/// country bar chart plus the top-10 companion table.
fn choropleth(ui: &mut Ui, spec: &ChartSpec, companion: Option<&Table>) {
    let top: Vec<(String, f64)> = spec
        .data
        .rows
        .iter()
        .take(20)
        .map(|row| {
            (
                value_label(row.get("country").unwrap_or(&Value::Null)),
                row.get("count").and_then(Value::as_f64).unwrap_or(0.0),
            )
        })
        .collect();

    Plot::new(spec.title.clone())
        .height(320.0)
        .show_x(false)
        .show(ui, |plot_ui| {
            let bars: Vec<Bar> = top
                .iter()
                .enumerate()
                .map(|(i, (name, count))| {
                    Bar::new(i as f64, *count).width(0.6).name(name.clone())
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).color(ACCENT));
        });

    if let Some(top10) = companion {
        ui.add_space(8.0);
        ui.strong("Top 10 Countries by Content Count");
        value_grid(ui, "top_countries", top10);
    }
}

/// Small two-column grid for companion tables.
fn value_grid(ui: &mut Ui, id: &str, table: &Table) {
    egui::Grid::new(id).striped(true).show(ui, |ui: &mut Ui| {
        for col in &table.columns {
            ui.strong(col);
        }
        ui.end_row();
        for row in &table.rows {
            for col in &table.columns {
                ui.label(value_label(row.get(col).unwrap_or(&Value::Null)));
            }
            ui.end_row();
        }
    });
}

// ---------------------------------------------------------------------------
// Data table + export
// ---------------------------------------------------------------------------

fn data_table(
    ui: &mut Ui,
    spec: &ChartSpec,
    filtered: &Table,
    profile: DatasetProfile,
) -> Option<String> {
    let mut status = None;
    if ui.button("⬇ Download filtered data as CSV").clicked() {
        status = Some(download_filtered(filtered, profile));
    }
    ui.add_space(4.0);

    let columns = &spec.data.columns;
    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().resizable(true).at_least(60.0), columns.len())
        .header(20.0, |mut header| {
            for col in columns {
                header.col(|ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, spec.data.len(), |mut row| {
                let i = row.index();
                for col in columns {
                    row.col(|ui| {
                        ui.label(value_label(spec.data.rows[i].get(col).unwrap_or(&Value::Null)));
                    });
                }
            });
        });

    status
}

/// Serialize the full filtered table (not just the preview) and save it
/// where the user picks. Returns the status line for the top bar.
fn download_filtered(filtered: &Table, profile: DatasetProfile) -> String {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(export::export_file_name(profile))
        .save_file()
    else {
        return "Download cancelled".to_string();
    };

    let written = export::to_csv(filtered).and_then(|csv| {
        std::fs::write(&path, csv).map_err(anyhow::Error::from)
    });
    match written {
        Ok(()) => {
            log::info!("exported {} rows to {}", filtered.len(), path.display());
            format!("Saved {} rows to {}", filtered.len(), path.display())
        }
        Err(e) => {
            log::error!("export failed: {e:#}");
            format!("Export failed: {e:#}")
        }
    }
}

// ---------------------------------------------------------------------------
// Summary statistics section
// ---------------------------------------------------------------------------

fn summary_section(ui: &mut Ui, filtered: &Table) {
    egui::CollapsingHeader::new(RichText::new("Summary Statistics").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            numerical_summary(ui, filtered);
            ui.add_space(8.0);
            categorical_summary(ui, filtered);
        });
}

fn fmt_stat(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "–".to_string(),
    }
}

fn numerical_summary(ui: &mut Ui, filtered: &Table) {
    ui.strong("Numerical Summary");
    let numeric = filtered.numeric_columns();
    if numeric.is_empty() {
        ui.label("No numerical columns available");
        return;
    }
    let summaries = aggregate::numeric_describe(filtered, &numeric);

    egui::Grid::new("numeric_summary")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for head in ["column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
                ui.strong(head);
            }
            ui.end_row();
            for s in &summaries {
                ui.label(&s.column);
                ui.label(s.count.to_string());
                ui.label(fmt_stat(s.mean));
                ui.label(fmt_stat(s.std));
                ui.label(fmt_stat(s.min));
                ui.label(fmt_stat(s.q25));
                ui.label(fmt_stat(s.median));
                ui.label(fmt_stat(s.q75));
                ui.label(fmt_stat(s.max));
                ui.end_row();
            }
        });
}

fn categorical_summary(ui: &mut Ui, filtered: &Table) {
    ui.strong("Categorical Summary");
    let summaries = aggregate::categorical_summaries(filtered, 3);
    if summaries.is_empty() {
        ui.label("No categorical columns available");
        return;
    }
    for (col, counts) in summaries {
        ui.label(RichText::new(&col).underline());
        egui::Grid::new(format!("cat_summary_{col}"))
            .striped(true)
            .show(ui, |ui: &mut Ui| {
                for (val, count) in &counts {
                    ui.label(value_label(val));
                    ui.label(count.to_string());
                    ui.end_row();
                }
            });
    }
}
