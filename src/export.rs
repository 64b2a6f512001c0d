use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::aggregate::{
    ScatterPoint, ScatterSelection, SiteSuccess, Slice, compute_scatter_selection,
    compute_site_success,
};
use crate::data::filter::FilterState;
use crate::data::model::LaunchDataset;

/// Both derived views for one filter state, as handed to a charting tool.
#[derive(Debug, Clone, Serialize)]
pub struct ViewExport {
    pub filters: FilterState,
    pub site_success: SiteSuccessTable,
    pub scatter: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteSuccessTable {
    pub title: String,
    pub slices: Vec<Slice>,
}

impl ViewExport {
    pub fn new(
        filters: &FilterState,
        site_success: &SiteSuccess,
        scatter: &ScatterSelection,
    ) -> Self {
        Self {
            filters: filters.clone(),
            site_success: SiteSuccessTable {
                title: site_success.title(),
                slices: site_success.slices(),
            },
            scatter: scatter.points.clone(),
        }
    }

    /// Recompute both views from scratch for `filters`.
    pub fn compute(dataset: &LaunchDataset, filters: &FilterState) -> Self {
        let site_success = compute_site_success(dataset, &filters.site);
        let scatter = compute_scatter_selection(dataset, &filters.site, &filters.payload_range);
        Self::new(filters, &site_success, &scatter)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialising views")
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("writing views to {}", path.display()))?;
        log::info!(
            "Exported {} pie slices and {} scatter rows to {}",
            self.site_success.slices.len(),
            self.scatter.len(),
            path.display()
        );
        Ok(())
    }
}
