use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};

use crate::color::{CategoryColors, SequentialScale};
use crate::data::model::Gender;
use crate::state::DashboardState;

const CHART_HEIGHT: f32 = 320.0;
const SCATTER_BANDS: usize = 10;

fn no_match_note(ui: &mut Ui) {
    ui.label("No customers match the current selection.");
}

/// Axis labels for categories placed at integer positions `0..labels.len()`.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

/// Vertical bar per category, coloured by `fill`.
fn category_bars(
    ui: &mut Ui,
    id: &str,
    rows: Vec<(String, usize)>,
    y_label: &str,
    fill: impl Fn(&str) -> Color32,
) {
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::new(i as f64, *count as f64)
                .name(label)
                .fill(fill(label.as_str()))
                .width(0.7)
        })
        .collect();
    let labels = rows.into_iter().map(|(label, _)| label).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_formatter(category_axis(labels))
        .y_axis_label(y_label)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
}

// ---------------------------------------------------------------------------
// Whole-dataset charts
// ---------------------------------------------------------------------------

pub fn profession_bar(ui: &mut Ui, state: &DashboardState, colors: &CategoryColors) {
    ui.heading("Customer Professions Frequency");

    let table = &state.charts().professions;
    if table.is_empty() {
        no_match_note(ui);
        return;
    }
    let rows = table
        .rows()
        .iter()
        .map(|r| (r.key.clone(), r.count))
        .collect();
    category_bars(ui, "profession_bar", rows, "Customer Count", |p| {
        colors.color_for(p)
    });
}

/// Province bubbles at (longitude, latitude), sized and coloured by total.
pub fn province_map(ui: &mut Ui, state: &DashboardState) {
    ui.heading("Customer Count across Indonesia");

    let points = &state.charts().province_map;
    if points.is_empty() {
        no_match_note(ui);
        return;
    }
    let scale = SequentialScale::spanning(points.iter().map(|p| p.total as f64));
    let max_total = points.iter().map(|p| p.total).max().unwrap_or(1).max(1) as f32;

    Plot::new("province_map")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for p in points {
                let radius = 3.0 + 17.0 * (p.total as f32 / max_total).sqrt();
                let name = format!(
                    "{}: {} customers (Male {}, Female {})",
                    p.province, p.total, p.male, p.female
                );
                plot_ui.points(
                    Points::new(vec![[p.longitude, p.latitude]])
                        .radius(radius)
                        .color(scale.color_for(p.total as f64))
                        .name(name),
                );
            }
        });
}

/// Spending score (x) against annual income (y), coloured by spending score.
///
/// Points are grouped into a few colour bands so each band is one plot item.
pub fn income_scatter(ui: &mut Ui, state: &DashboardState) {
    ui.heading("Customer Income & Spending Score Correlation");

    let points = &state.charts().income_spending;
    if points.is_empty() {
        no_match_note(ui);
        return;
    }
    let scale = SequentialScale::spanning(points.iter().map(|p| p.spending_score));
    let mut bands: Vec<Vec<[f64; 2]>> = vec![Vec::new(); SCATTER_BANDS];
    for p in points {
        let band = (scale.fraction(p.spending_score) * SCATTER_BANDS as f64) as usize;
        bands[band.min(SCATTER_BANDS - 1)].push([p.spending_score, p.annual_income]);
    }

    Plot::new("income_scatter")
        .height(CHART_HEIGHT)
        .x_axis_label("Spending Score")
        .y_axis_label("Customer Income")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, band) in bands.into_iter().enumerate() {
                if band.is_empty() {
                    continue;
                }
                let color = SequentialScale::color_at((i as f64 + 0.5) / SCATTER_BANDS as f64);
                plot_ui.points(Points::new(PlotPoints::from(band)).radius(2.0).color(color));
            }
        });
}

pub fn income_histogram(ui: &mut Ui, state: &DashboardState) {
    ui.heading("Customer Income Histogram");

    let bins = &state.charts().income_histogram;
    if bins.is_empty() {
        no_match_note(ui);
        return;
    }
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width().max(1.0))
                .name(format!("{:.0} to {:.0}", b.lower, b.upper))
        })
        .collect();

    Plot::new("income_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Customer Income")
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
}

// ---------------------------------------------------------------------------
// Control-driven charts
// ---------------------------------------------------------------------------

pub fn generation_bar(ui: &mut Ui, state: &DashboardState) {
    ui.heading(format!(
        "Customer Count per Generation in {} Profession.",
        state.controls().selected_profession()
    ));

    let table = &state.charts().generations;
    if table.is_empty() {
        no_match_note(ui);
        return;
    }
    let rows = table
        .rows()
        .iter()
        .map(|r| (r.key.clone(), r.count))
        .collect();
    category_bars(ui, "generation_bar", rows, "Employee Count", |_| {
        Color32::LIGHT_BLUE
    });
}

/// Horizontal grouped bars: one row per profession, one bar per gender.
///
/// Professions are ordered by their first appearance in the count-sorted
/// table, so the smallest groups sit at the bottom.
pub fn gender_profession_bar(ui: &mut Ui, state: &DashboardState, colors: &CategoryColors) {
    ui.heading(format!(
        "Gender per Profession, Age {}",
        state.controls().age_range()
    ));

    let table = &state.charts().gender_by_profession;
    if table.is_empty() {
        no_match_note(ui);
        return;
    }

    let mut order: Vec<String> = Vec::new();
    for row in table.rows() {
        if !order.contains(&row.key.profession) {
            order.push(row.key.profession.clone());
        }
    }

    let charts: Vec<BarChart> = Gender::ALL
        .iter()
        .map(|gender| {
            let offset = match gender {
                Gender::Female => -0.2,
                Gender::Male => 0.2,
            };
            let bars = table
                .rows()
                .iter()
                .filter(|r| r.key.gender == *gender)
                .map(|r| {
                    let slot = order
                        .iter()
                        .position(|p| *p == r.key.profession)
                        .unwrap_or_default();
                    Bar::new(slot as f64 + offset, r.count as f64)
                        .width(0.4)
                        .name(format!("{} ({gender})", r.key.profession))
                })
                .collect();
            BarChart::new(bars)
                .horizontal()
                .name(gender.to_string())
                .color(colors.color_for(&gender.to_string()))
        })
        .collect();

    Plot::new("gender_profession_bar")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_formatter(category_axis(order))
        .x_axis_label("Customer Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}
