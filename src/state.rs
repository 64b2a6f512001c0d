use std::path::Path;

use anyhow::Result;

use crate::color::ColorMap;
use crate::data::aggregate::{
    ScatterSelection, SiteSuccess, compute_scatter_selection, compute_site_success,
};
use crate::data::filter::{
    FilterError, FilterState, PAYLOAD_SLIDER_MAX, PayloadRange, SiteSelection,
    init_filter_state, payload_slider_max,
};
use crate::data::model::{COL_BOOSTER_CATEGORY, LaunchDataset};
use crate::export::ViewExport;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<LaunchDataset>,

    /// Site selector and payload range.
    pub filters: FilterState,

    /// Pie chart input, recomputed on every filter change.
    pub site_success: SiteSuccess,

    /// Scatter chart input, recomputed on every filter change.
    pub scatter: ScatterSelection,

    /// Upper end of the payload sliders.
    pub slider_max: f64,

    /// Booster category colours for the scatter chart.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filters: FilterState::default(),
            site_success: SiteSuccess::default(),
            scatter: ScatterSelection::default(),
            slider_max: PAYLOAD_SLIDER_MAX,
            color_map: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset, reset filters and colours.
    pub fn set_dataset(&mut self, dataset: LaunchDataset) {
        self.filters = init_filter_state(&dataset);
        self.slider_max = payload_slider_max(&dataset);
        self.color_map = Some(ColorMap::new(COL_BOOSTER_CATEGORY, &dataset.booster_categories));

        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    /// Apply the outcome of a file load. A failed load keeps whatever was
    /// already on screen and reports the error in the status bar.
    pub fn apply_load(&mut self, result: Result<LaunchDataset>) {
        match result {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} launches from sites {:?}",
                    dataset.len(),
                    dataset.sites
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Replace both filters at once (startup flags).
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.recompute();
    }

    /// Site dropdown changed.
    pub fn set_site(&mut self, site: SiteSelection) {
        if self.filters.site == site {
            return;
        }
        log::debug!("site filter -> {site}");
        self.filters.site = site;
        self.recompute();
    }

    /// Payload sliders changed. Inverted or non-finite input leaves the
    /// current range untouched.
    pub fn set_payload_range(&mut self, lo: f64, hi: f64) -> Result<(), FilterError> {
        let range = PayloadRange::new(lo, hi)?;
        if self.filters.payload_range != range {
            log::debug!("payload filter -> [{lo}, {hi}]");
            self.filters.payload_range = range;
            self.recompute();
        }
        Ok(())
    }

    /// Back to all sites and the full payload span.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters = init_filter_state(ds);
            self.recompute();
        }
    }

    /// Recompute both derived views from the full dataset.
    pub fn recompute(&mut self) {
        match &self.dataset {
            Some(ds) => {
                self.site_success = compute_site_success(ds, &self.filters.site);
                self.scatter =
                    compute_scatter_selection(ds, &self.filters.site, &self.filters.payload_range);
            }
            None => {
                self.site_success = SiteSuccess::default();
                self.scatter = ScatterSelection::default();
            }
        }
    }

    /// Write the views currently on screen as JSON.
    pub fn export_views(&self, path: &Path) -> Result<()> {
        ViewExport::new(&self.filters, &self.site_success, &self.scatter).write(path)
    }
}
