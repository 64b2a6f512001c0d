use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{
    Align, Align2, Color32, FontId, Layout, Painter, Pos2, RichText, Sense, Shape, Stroke, Ui,
    Vec2,
};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::color::generate_palette;
use crate::data::aggregate::SiteSuccess;
use crate::state::AppState;

const PIE_HEIGHT: f32 = 240.0;
const SCATTER_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Pie geometry
// ---------------------------------------------------------------------------

/// Start / end angle (radians, screen space) of each wedge, beginning at
/// twelve o'clock and running clockwise. Empty when the values sum to zero.
pub fn wedge_angles(values: &[u64]) -> Vec<(f32, f32)> {
    let total: u64 = values.iter().sum();
    if total == 0 {
        return Vec::new();
    }
    let mut start = -FRAC_PI_2;
    values
        .iter()
        .map(|&v| {
            let sweep = v as f32 / total as f32 * TAU;
            let wedge = (start, start + sweep);
            start += sweep;
            wedge
        })
        .collect()
}

/// Fill one wedge. Split into quarter-turn pieces so every polygon is convex.
fn paint_wedge(painter: &Painter, center: Pos2, radius: f32, wedge: (f32, f32), color: Color32) {
    let sweep = wedge.1 - wedge.0;
    if sweep <= 0.0 {
        return;
    }
    let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
    let piece = sweep / pieces as f32;
    let steps = 16;

    for k in 0..pieces {
        let a0 = wedge.0 + piece * k as f32;
        let mut points = Vec::with_capacity(steps + 2);
        points.push(center);
        for i in 0..=steps {
            let a = a0 + piece * i as f32 / steps as f32;
            points.push(center + radius * Vec2::angled(a));
        }
        painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
    }
}

// ---------------------------------------------------------------------------
// Success pie chart
// ---------------------------------------------------------------------------

const NO_LAUNCHES: &str = "No launches match the current filters.";
const NO_SUCCESSES: &str = "No successful launches";

/// Text drawn over the pie when there is nothing to fill it with. Sites with
/// zero successes still get legend rows, so only an aggregate without any
/// entries counts as "no launches".
pub fn pie_note(agg: &SiteSuccess) -> Option<&'static str> {
    if agg.is_empty() {
        Some(NO_LAUNCHES)
    } else if agg.total() == 0 {
        Some(NO_SUCCESSES)
    } else {
        None
    }
}

fn share_percent(value: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        value as f64 / total as f64 * 100.0
    }
}

/// Proportion chart of the site-success aggregate with a value legend.
pub fn success_pie_chart(ui: &mut Ui, state: &AppState) {
    let agg = &state.site_success;
    ui.label(RichText::new(agg.title()).strong().size(16.0));

    if agg.is_empty() {
        ui.allocate_ui(Vec2::new(ui.available_width(), PIE_HEIGHT), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(NO_LAUNCHES);
            });
        });
        return;
    }

    let slices = agg.slices();
    let values: Vec<u64> = slices.iter().map(|s| s.value).collect();
    let wedges = wedge_angles(&values);
    let colors = generate_palette(slices.len());
    let total = agg.total();

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(Vec2::splat(PIE_HEIGHT), Sense::hover());
        let center = response.rect.center();
        let radius = PIE_HEIGHT * 0.45;
        for (wedge, color) in wedges.iter().zip(&colors) {
            paint_wedge(&painter, center, radius, *wedge, *color);
        }
        painter.circle_stroke(center, radius, Stroke::new(1.0, Color32::from_gray(60)));
        if let Some(note) = pie_note(agg) {
            painter.text(
                center,
                Align2::CENTER_CENTER,
                note,
                FontId::proportional(14.0),
                ui.visuals().weak_text_color(),
            );
        }

        ui.add_space(16.0);
        ui.vertical(|ui: &mut Ui| {
            for (slice, color) in slices.iter().zip(&colors) {
                let pct = share_percent(slice.value, total);
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(*color));
                    ui.label(format!("{}: {} ({pct:.1}%)", slice.label, slice.value));
                });
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Payload vs. outcome scatter chart
// ---------------------------------------------------------------------------

/// Scatter of payload mass against launch outcome, one series per booster category.
pub fn payload_scatter_chart(ui: &mut Ui, state: &AppState) {
    ui.label(
        RichText::new("Correlation between Payload and Success")
            .strong()
            .size(16.0),
    );
    if state.scatter.is_empty() {
        ui.label("No launches in the selected payload range.");
    }

    let range = state.filters.payload_range;

    Plot::new("success_payload_scatter")
        .legend(Legend::default())
        .height(SCATTER_HEIGHT)
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("class")
        .include_x(range.lo())
        .include_x(range.hi())
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, xy) in state.scatter.by_category() {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(category))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let points: PlotPoints = xy.into_iter().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(category)
                        .color(color)
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Selected rows
// ---------------------------------------------------------------------------

/// Table of the launches behind the scatter chart.
pub fn selection_table(ui: &mut Ui, state: &AppState) {
    let points = &state.scatter.points;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(130.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Payload Mass (kg)");
            });
            header.col(|ui| {
                ui.strong("class");
            });
            header.col(|ui| {
                ui.strong("Booster Version Category");
            });
        })
        .body(|body| {
            body.rows(18.0, points.len(), |mut row| {
                let p = &points[row.index()];
                row.col(|ui| {
                    ui.label(format!("{:.1}", p.payload_mass));
                });
                row.col(|ui| {
                    ui.label(p.outcome.to_string());
                });
                row.col(|ui| {
                    let color = state
                        .color_map
                        .as_ref()
                        .map(|cm| cm.color_for(&p.booster_category))
                        .unwrap_or(Color32::LIGHT_BLUE);
                    ui.label(RichText::new(&p.booster_category).color(color));
                });
            });
        });
}
