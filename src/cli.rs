use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::data::filter::{ALL_SITES, FilterState, PayloadRange, SiteSelection};
use crate::data::model::LaunchDataset;

#[derive(Debug, Parser)]
#[command(name = "launch-dash")]
#[command(
    about = "Launch records dashboard: site success and payload/outcome charts",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Launch records file (.csv, .json or .parquet)
    #[arg(default_value = "spacex_launch_dash.csv")]
    pub dataset: PathBuf,

    /// Initial launch site, or ALL
    #[arg(long, default_value = ALL_SITES)]
    pub site: String,

    /// Initial lower payload bound in kg (defaults to the dataset minimum)
    #[arg(long)]
    pub payload_min: Option<f64>,

    /// Initial upper payload bound in kg (defaults to the dataset maximum)
    #[arg(long)]
    pub payload_max: Option<f64>,

    /// Write both chart views as JSON to this path and exit without a window
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    #[arg(long, default_value_t = 1200.0)]
    pub width: f32,

    #[arg(long, default_value_t = 800.0)]
    pub height: f32,
}

impl Cli {
    /// Filter state requested on the command line, validated against `dataset`.
    ///
    /// An unknown site is kept (it simply selects nothing) but logged.
    pub fn filter_state(&self, dataset: &LaunchDataset) -> Result<FilterState> {
        let site = SiteSelection::from(self.site.as_str());
        if let SiteSelection::Site(name) = &site {
            if !dataset.has_site(name) {
                log::warn!(
                    "Launch site '{name}' does not occur in the dataset; charts will be empty"
                );
            }
        }

        let span = PayloadRange::spanning(dataset);
        let lo = self.payload_min.unwrap_or(span.lo());
        let hi = self.payload_max.unwrap_or(span.hi());
        let payload_range = PayloadRange::new(lo, hi)?;

        Ok(FilterState {
            site,
            payload_range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LaunchRecord, Outcome};

    fn dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            LaunchRecord {
                launch_site: "KSC LC-39A".to_string(),
                payload_mass: 2490.0,
                booster_category: "FT".to_string(),
                outcome: Outcome::Success,
            },
            LaunchRecord {
                launch_site: "VAFB SLC-4E".to_string(),
                payload_mass: 9600.0,
                booster_category: "FT".to_string(),
                outcome: Outcome::Success,
            },
        ])
    }

    #[test]
    fn defaults_select_everything() {
        let cli = Cli::try_parse_from(["launch-dash"]).unwrap();
        assert_eq!(cli.dataset, PathBuf::from("spacex_launch_dash.csv"));
        assert!(cli.export.is_none());

        let filters = cli.filter_state(&dataset()).unwrap();
        assert_eq!(filters.site, SiteSelection::All);
        assert_eq!(filters.payload_range, PayloadRange::new(2490.0, 9600.0).unwrap());
    }

    #[test]
    fn explicit_filters_are_used() {
        let cli = Cli::try_parse_from([
            "launch-dash",
            "launches.parquet",
            "--site",
            "KSC LC-39A",
            "--payload-min",
            "1000",
            "--export",
            "out.json",
        ])
        .unwrap();
        assert_eq!(cli.export, Some(PathBuf::from("out.json")));

        let filters = cli.filter_state(&dataset()).unwrap();
        assert_eq!(filters.site, SiteSelection::Site("KSC LC-39A".to_string()));
        assert_eq!(filters.payload_range.lo(), 1000.0);
        assert_eq!(filters.payload_range.hi(), 9600.0);
    }

    #[test]
    fn inverted_payload_flags_are_rejected() {
        let cli = Cli::try_parse_from([
            "launch-dash",
            "--payload-min",
            "5000",
            "--payload-max",
            "100",
        ])
        .unwrap();
        let err = cli.filter_state(&dataset()).unwrap_err();
        assert!(err.to_string().contains("inverted"));
    }
}
