use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::{PAYLOAD_SLIDER_MIN, PAYLOAD_SLIDER_STEP, SiteSelection};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let sites = match &state.dataset {
        Some(ds) => ds.sites.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Launch site dropdown ----
            ui.strong("Launch Site");
            let options: Vec<SiteSelection> = std::iter::once(SiteSelection::All)
                .chain(sites.into_iter().map(SiteSelection::Site))
                .collect();
            let current = state.filters.site.clone();
            egui::ComboBox::from_id_salt("site_dropdown")
                .selected_text(current.label())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for option in options {
                        let label = option.label().to_string();
                        if ui.selectable_label(current == option, label).clicked() {
                            state.set_site(option);
                        }
                    }
                });
            ui.separator();

            // ---- Payload range ----
            ui.strong("Payload range (Kg):");
            payload_sliders(ui, state);
            ui.add_space(4.0);
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
            ui.separator();

            // ---- Booster legend ----
            if let Some(cm) = &state.color_map {
                ui.strong(&cm.column);
                for (label, color) in cm.legend_entries() {
                    ui.label(RichText::new(format!("■ {label}")).color(color));
                }
            }
        });
}

/// Two sliders standing in for a range slider; they never cross.
fn payload_sliders(ui: &mut Ui, state: &mut AppState) {
    let mut lo = state.filters.payload_range.lo();
    let mut hi = state.filters.payload_range.hi();
    let max = state.slider_max;

    let lo_changed = ui
        .add(
            Slider::new(&mut lo, PAYLOAD_SLIDER_MIN..=max)
                .step_by(PAYLOAD_SLIDER_STEP)
                .text("min"),
        )
        .changed();
    let hi_changed = ui
        .add(
            Slider::new(&mut hi, PAYLOAD_SLIDER_MIN..=max)
                .step_by(PAYLOAD_SLIDER_STEP)
                .text("max"),
        )
        .changed();

    if lo_changed && lo > hi {
        hi = lo;
    }
    if hi_changed && hi < lo {
        lo = hi;
    }
    if lo_changed || hi_changed {
        if let Err(e) = state.set_payload_range(lo, hi) {
            log::warn!("Ignoring payload range: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export views…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} launches loaded, {} in payload selection",
                ds.len(),
                state.scatter.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.apply_load(crate::data::loader::load_file(&path));
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart data")
        .add_filter("JSON", &["json"])
        .set_file_name("launch_views.json")
        .save_file();

    if let Some(path) = file {
        match state.export_views(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export views: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
