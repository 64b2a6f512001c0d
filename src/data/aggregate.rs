use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::{PayloadRange, SiteSelection};
use super::model::{LaunchDataset, Outcome};

// ---------------------------------------------------------------------------
// Site success aggregate (proportion chart)
// ---------------------------------------------------------------------------

/// Aggregate behind the proportion chart.
///
/// * `BySite` – every site with its total number of successes (sorted by site).
/// * `ByOutcome` – one site, number of launches per outcome class. Classes that
///   never occur at the site are left out.
///
/// An aggregate without entries means "nothing to draw", not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteSuccess {
    BySite(Vec<(String, u64)>),
    ByOutcome {
        site: String,
        counts: Vec<(Outcome, u64)>,
    },
}

impl Default for SiteSuccess {
    fn default() -> Self {
        SiteSuccess::BySite(Vec::new())
    }
}

/// One labelled wedge of the proportion chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: u64,
}

impl SiteSuccess {
    /// Flatten into (label, value) rows ready for drawing or export.
    pub fn slices(&self) -> Vec<Slice> {
        match self {
            SiteSuccess::BySite(entries) => entries
                .iter()
                .map(|(site, n)| Slice {
                    label: site.clone(),
                    value: *n,
                })
                .collect(),
            SiteSuccess::ByOutcome { counts, .. } => counts
                .iter()
                .map(|(outcome, n)| Slice {
                    label: outcome.to_string(),
                    value: *n,
                })
                .collect(),
        }
    }

    /// Value of the slice labelled `label` (a site, or "0" / "1").
    pub fn value(&self, label: &str) -> Option<u64> {
        self.slices()
            .into_iter()
            .find(|s| s.label == label)
            .map(|s| s.value)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SiteSuccess::BySite(entries) => entries.is_empty(),
            SiteSuccess::ByOutcome { counts, .. } => counts.is_empty(),
        }
    }

    pub fn total(&self) -> u64 {
        self.slices().iter().map(|s| s.value).sum()
    }

    pub fn title(&self) -> String {
        match self {
            SiteSuccess::BySite(_) => "Total Successful Launches by Launch Site".to_string(),
            SiteSuccess::ByOutcome { site, .. } => format!("Total Launch Outcomes for {site}"),
        }
    }
}

/// Aggregate launch outcomes for the proportion chart.
///
/// With [`SiteSelection::All`] the successes of each site are summed; with a
/// single site its launches are counted per outcome class. An unknown site
/// yields an empty aggregate.
pub fn compute_site_success(dataset: &LaunchDataset, site: &SiteSelection) -> SiteSuccess {
    match site {
        SiteSelection::All => {
            let mut per_site: BTreeMap<&str, u64> = BTreeMap::new();
            for rec in &dataset.records {
                *per_site.entry(rec.launch_site.as_str()).or_default() +=
                    u64::from(rec.outcome.class());
            }
            SiteSuccess::BySite(
                per_site
                    .into_iter()
                    .map(|(s, n)| (s.to_string(), n))
                    .collect(),
            )
        }
        SiteSelection::Site(name) => {
            let mut per_outcome: BTreeMap<Outcome, u64> = BTreeMap::new();
            for rec in dataset.records.iter().filter(|r| r.launch_site == *name) {
                *per_outcome.entry(rec.outcome).or_default() += 1;
            }
            SiteSuccess::ByOutcome {
                site: name.clone(),
                counts: per_outcome.into_iter().collect(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scatter selection (payload vs. outcome chart)
// ---------------------------------------------------------------------------

/// One selected launch: x = payload mass, y = outcome, colour = booster category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass: f64,
    #[serde(rename = "class")]
    pub outcome: Outcome,
    pub booster_category: String,
}

/// Launches passing both filters, in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterSelection {
    pub points: Vec<ScatterPoint>,
}

impl ScatterSelection {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Group `[payload, class]` pairs by booster category, one series per colour.
    pub fn by_category(&self) -> BTreeMap<&str, Vec<[f64; 2]>> {
        let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
        for p in &self.points {
            series
                .entry(p.booster_category.as_str())
                .or_default()
                .push([p.payload_mass, p.outcome.as_f64()]);
        }
        series
    }
}

/// Select launches whose payload lies in `range` (inclusive) and whose site
/// passes `site`.
pub fn compute_scatter_selection(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    range: &PayloadRange,
) -> ScatterSelection {
    let points = dataset
        .records
        .iter()
        .filter(|r| range.contains(r.payload_mass) && site.matches(&r.launch_site))
        .map(|r| ScatterPoint {
            payload_mass: r.payload_mass,
            outcome: r.outcome,
            booster_category: r.booster_category.clone(),
        })
        .collect();
    ScatterSelection { points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LaunchRecord;

    fn rec(site: &str, mass: f64, booster: &str, class: u8) -> LaunchRecord {
        LaunchRecord {
            launch_site: site.to_string(),
            payload_mass: mass,
            booster_category: booster.to_string(),
            outcome: if class == 1 {
                Outcome::Success
            } else {
                Outcome::Failure
            },
        }
    }

    fn three_rows() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            rec("SiteA", 500.0, "v1", 1),
            rec("SiteA", 1500.0, "v2", 0),
            rec("SiteB", 800.0, "v1", 1),
        ])
    }

    fn larger() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            rec("CCAFS LC-40", 0.0, "v1.0", 0),
            rec("CCAFS LC-40", 525.0, "v1.0", 0),
            rec("CCAFS LC-40", 2296.0, "v1.1", 1),
            rec("VAFB SLC-4E", 500.0, "v1.1", 0),
            rec("VAFB SLC-4E", 9600.0, "FT", 1),
            rec("KSC LC-39A", 2490.0, "FT", 1),
            rec("KSC LC-39A", 5300.0, "FT", 1),
            rec("KSC LC-39A", 3600.0, "B4", 0),
            rec("CCAFS SLC-40", 4707.0, "B5", 0),
            rec("CCAFS SLC-40", 2000.0, "B4", 0),
        ])
    }

    fn range(lo: f64, hi: f64) -> PayloadRange {
        PayloadRange::new(lo, hi).unwrap()
    }

    #[test]
    fn all_sites_sums_successes_per_site() {
        let agg = compute_site_success(&three_rows(), &SiteSelection::All);
        assert_eq!(
            agg,
            SiteSuccess::BySite(vec![("SiteA".to_string(), 1), ("SiteB".to_string(), 1)])
        );
        assert_eq!(agg.total(), 2);
        assert_eq!(agg.title(), "Total Successful Launches by Launch Site");
    }

    #[test]
    fn single_site_counts_each_outcome() {
        let agg = compute_site_success(&three_rows(), &SiteSelection::from("SiteA"));
        assert_eq!(agg.value("1"), Some(1));
        assert_eq!(agg.value("0"), Some(1));
        assert_eq!(agg.slices().len(), 2);
        assert_eq!(agg.title(), "Total Launch Outcomes for SiteA");
    }

    #[test]
    fn missing_outcome_class_is_omitted() {
        let agg = compute_site_success(&three_rows(), &SiteSelection::from("SiteB"));
        assert_eq!(agg.value("1"), Some(1));
        assert_eq!(agg.value("0"), None);
        assert_eq!(agg.slices().len(), 1);
    }

    #[test]
    fn site_without_successes_still_appears_under_all() {
        let agg = compute_site_success(&larger(), &SiteSelection::All);
        assert_eq!(agg.value("CCAFS SLC-40"), Some(0));
        let labels: Vec<String> = agg.slices().into_iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec!["CCAFS LC-40", "CCAFS SLC-40", "KSC LC-39A", "VAFB SLC-4E"]
        );
    }

    #[test]
    fn all_view_agrees_with_per_site_success_count() {
        let ds = larger();
        let all = compute_site_success(&ds, &SiteSelection::All);
        for site in &ds.sites {
            let per_site = compute_site_success(&ds, &SiteSelection::Site(site.clone()));
            if let Some(successes) = per_site.value("1") {
                assert_eq!(all.value(site), Some(successes), "site {site}");
            } else {
                assert_eq!(all.value(site), Some(0), "site {site}");
            }
        }
    }

    #[test]
    fn unknown_site_and_empty_dataset_give_empty_results() {
        let ds = three_rows();
        let unknown = SiteSelection::from("Nowhere");
        assert!(compute_site_success(&ds, &unknown).is_empty());
        assert!(compute_scatter_selection(&ds, &unknown, &range(0.0, 10_000.0)).is_empty());

        let empty = LaunchDataset::default();
        assert!(compute_site_success(&empty, &SiteSelection::All).is_empty());
        assert!(
            compute_scatter_selection(&empty, &SiteSelection::All, &range(0.0, 1.0)).is_empty()
        );
    }

    #[test]
    fn scatter_excludes_out_of_range_rows() {
        let sel =
            compute_scatter_selection(&three_rows(), &SiteSelection::All, &range(0.0, 1000.0));
        let masses: Vec<f64> = sel.points.iter().map(|p| p.payload_mass).collect();
        assert_eq!(masses, vec![500.0, 800.0]);
        assert!(sel.points.iter().all(|p| p.outcome == Outcome::Success));
        assert!(sel.points.iter().all(|p| p.booster_category == "v1"));
    }

    #[test]
    fn scatter_includes_both_boundaries() {
        let sel =
            compute_scatter_selection(&three_rows(), &SiteSelection::All, &range(500.0, 1500.0));
        assert_eq!(sel.len(), 3);

        let point =
            compute_scatter_selection(&three_rows(), &SiteSelection::All, &range(800.0, 800.0));
        assert_eq!(point.len(), 1);
        assert_eq!(point.points[0].payload_mass, 800.0);
    }

    #[test]
    fn scatter_is_sound_and_complete() {
        let ds = larger();
        let sites = [
            "ALL",
            "CCAFS LC-40",
            "VAFB SLC-4E",
            "KSC LC-39A",
            "CCAFS SLC-40",
            "Nowhere",
        ];
        let bounds = [(0.0, 10_000.0), (500.0, 2490.0), (3000.0, 3000.0), (0.0, 0.0)];

        for site in sites {
            for (lo, hi) in bounds {
                let sel =
                    compute_scatter_selection(&ds, &SiteSelection::from(site), &range(lo, hi));
                let expected: Vec<&LaunchRecord> = ds
                    .records
                    .iter()
                    .filter(|rec| rec.payload_mass >= lo && rec.payload_mass <= hi)
                    .filter(|rec| site == "ALL" || rec.launch_site == site)
                    .collect();

                assert_eq!(sel.len(), expected.len(), "site {site}, range [{lo}, {hi}]");
                for (p, rec) in sel.points.iter().zip(expected) {
                    assert!(p.payload_mass >= lo && p.payload_mass <= hi);
                    assert_eq!(p.payload_mass, rec.payload_mass);
                    assert_eq!(p.outcome, rec.outcome);
                    assert_eq!(p.booster_category, rec.booster_category);
                }
            }
        }
    }

    #[test]
    fn scatter_restricts_to_selected_site() {
        let ds = larger();
        let sel = compute_scatter_selection(
            &ds,
            &SiteSelection::from("KSC LC-39A"),
            &range(0.0, 10_000.0),
        );
        assert_eq!(sel.len(), 3);
        let series = sel.by_category();
        assert_eq!(series["FT"], vec![[2490.0, 1.0], [5300.0, 1.0]]);
        assert_eq!(series["B4"], vec![[3600.0, 0.0]]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let ds = larger();
        let site = SiteSelection::from("CCAFS LC-40");
        let r = range(0.0, 5000.0);
        assert_eq!(
            compute_site_success(&ds, &site),
            compute_site_success(&ds, &site)
        );
        assert_eq!(
            compute_scatter_selection(&ds, &site, &r),
            compute_scatter_selection(&ds, &site, &r)
        );
    }
}
