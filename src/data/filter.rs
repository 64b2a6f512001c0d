use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use super::model::LaunchDataset;

/// Sentinel value selecting every launch site.
pub const ALL_SITES: &str = "ALL";

/// Lower bound and tick spacing of the payload sliders (kg).
pub const PAYLOAD_SLIDER_MIN: f64 = 0.0;
pub const PAYLOAD_SLIDER_MAX: f64 = 10_000.0;
pub const PAYLOAD_SLIDER_STEP: f64 = 1_000.0;

/// Rejected filter input. Raised at the UI / CLI boundary, never by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("payload range bounds must be finite, got [{lo}, {hi}]")]
    NonFiniteBound { lo: f64, hi: f64 },
    #[error("payload range is inverted: min {lo} is greater than max {hi}")]
    InvalidRange { lo: f64, hi: f64 },
}

// ---------------------------------------------------------------------------
// Site selector
// ---------------------------------------------------------------------------

/// Either every site or a single named one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Does a record launched from `site` pass this selector?
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(s) => s == site,
        }
    }

    /// Wire value: `ALL` or the site label.
    pub fn as_value(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(s) => s,
        }
    }

    /// Human label for the dropdown.
    pub fn label(&self) -> &str {
        match self {
            SiteSelection::All => "All Sites",
            SiteSelection::Site(s) => s,
        }
    }
}

impl From<&str> for SiteSelection {
    fn from(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_value())
    }
}

impl Serialize for SiteSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_value())
    }
}

// ---------------------------------------------------------------------------
// Payload range
// ---------------------------------------------------------------------------

/// Closed payload interval `[lo, hi]`; both ends finite and `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    lo: f64,
    hi: f64,
}

impl PayloadRange {
    pub fn new(lo: f64, hi: f64) -> Result<Self, FilterError> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(FilterError::NonFiniteBound { lo, hi });
        }
        if lo > hi {
            return Err(FilterError::InvalidRange { lo, hi });
        }
        Ok(PayloadRange { lo, hi })
    }

    /// The full payload span of a dataset, `[0, 0]` when it is empty.
    pub fn spanning(dataset: &LaunchDataset) -> Self {
        let (lo, hi) = dataset.payload_bounds.unwrap_or((0.0, 0.0));
        PayloadRange { lo, hi }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Inclusive at both ends.
    pub fn contains(&self, mass: f64) -> bool {
        mass >= self.lo && mass <= self.hi
    }
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// The pair of user-selected filters driving both charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterState {
    pub site: SiteSelection,
    pub payload_range: PayloadRange,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            site: SiteSelection::All,
            payload_range: PayloadRange { lo: 0.0, hi: 0.0 },
        }
    }
}

/// Initialise a [`FilterState`] that shows everything: all sites, full payload span.
pub fn init_filter_state(dataset: &LaunchDataset) -> FilterState {
    FilterState {
        site: SiteSelection::All,
        payload_range: PayloadRange::spanning(dataset),
    }
}

/// Upper end of the payload sliders: 10 000 kg, widened to the next whole
/// step when the dataset holds heavier payloads.
pub fn payload_slider_max(dataset: &LaunchDataset) -> f64 {
    match dataset.payload_bounds {
        Some((_, hi)) if hi > PAYLOAD_SLIDER_MAX => {
            (hi / PAYLOAD_SLIDER_STEP).ceil() * PAYLOAD_SLIDER_STEP
        }
        _ => PAYLOAD_SLIDER_MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LaunchRecord, Outcome};

    fn dataset(masses: &[f64]) -> LaunchDataset {
        LaunchDataset::from_records(
            masses
                .iter()
                .map(|&m| LaunchRecord {
                    launch_site: "CCAFS LC-40".to_string(),
                    payload_mass: m,
                    booster_category: "FT".to_string(),
                    outcome: Outcome::Success,
                })
                .collect(),
        )
    }

    #[test]
    fn range_rejects_inverted_and_non_finite_bounds() {
        assert_eq!(
            PayloadRange::new(5000.0, 1000.0),
            Err(FilterError::InvalidRange { lo: 5000.0, hi: 1000.0 })
        );
        assert!(matches!(
            PayloadRange::new(f64::NAN, 1000.0),
            Err(FilterError::NonFiniteBound { .. })
        ));
        assert!(matches!(
            PayloadRange::new(0.0, f64::INFINITY),
            Err(FilterError::NonFiniteBound { .. })
        ));
        assert!(PayloadRange::new(2500.0, 2500.0).is_ok());
    }

    #[test]
    fn range_is_closed_at_both_ends() {
        let r = PayloadRange::new(1000.0, 2000.0).unwrap();
        assert!(r.contains(1000.0));
        assert!(r.contains(2000.0));
        assert!(r.contains(1500.0));
        assert!(!r.contains(999.9));
        assert!(!r.contains(2000.1));
    }

    #[test]
    fn site_selection_parses_sentinel() {
        assert_eq!(SiteSelection::from("ALL"), SiteSelection::All);
        assert_eq!(
            SiteSelection::from("KSC LC-39A"),
            SiteSelection::Site("KSC LC-39A".to_string())
        );
        assert!(SiteSelection::All.matches("anything"));
        assert!(!SiteSelection::from("KSC LC-39A").matches("CCAFS LC-40"));
        assert_eq!(SiteSelection::All.label(), "All Sites");
        assert_eq!(SiteSelection::All.to_string(), "ALL");
    }

    #[test]
    fn initial_state_spans_the_dataset() {
        let state = init_filter_state(&dataset(&[0.0, 362.0, 9600.0]));
        assert_eq!(state.site, SiteSelection::All);
        assert_eq!(state.payload_range.lo(), 0.0);
        assert_eq!(state.payload_range.hi(), 9600.0);

        let empty = init_filter_state(&dataset(&[]));
        assert_eq!(empty.payload_range, PayloadRange::new(0.0, 0.0).unwrap());
    }

    #[test]
    fn slider_widens_for_heavy_payloads() {
        assert_eq!(payload_slider_max(&dataset(&[9600.0])), 10_000.0);
        assert_eq!(payload_slider_max(&dataset(&[15_600.0])), 16_000.0);
        assert_eq!(payload_slider_max(&dataset(&[])), 10_000.0);
    }
}
