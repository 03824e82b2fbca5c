//! Aggregation Views Module
//! Pure groupings over a filtered view, each producing a small derived table.

use crate::data::{CanonicalTable, Quarter};
use crate::stats::StatsCalculator;
use crate::views::filter::{FilteredView, YearSelection};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Default length of the top-N views.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ManufacturerCount {
    pub manufacturer: String,
    pub crashes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub crashes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryFatalities {
    pub country: String,
    pub fatalities: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterCount {
    pub quarter: Quarter,
    pub crashes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AboardFatalityPoint {
    pub aboard: f64,
    pub fatalities: f64,
}

/// Which derived table a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    TopManufacturers,
    YearlyTrend,
    TopFatalityCountries,
    CrashesByQuarter,
    AboardVsFatalities,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewKind::TopManufacturers => "Top aircraft manufacturers",
            ViewKind::YearlyTrend => "Yearly crash trend",
            ViewKind::TopFatalityCountries => "Top fatality countries",
            ViewKind::CrashesByQuarter => "Crashes by quarter",
            ViewKind::AboardVsFatalities => "Aboard vs fatalities",
        };
        f.write_str(name)
    }
}

/// A view came out empty. Not fatal; the dashboard shows a placeholder instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{view} has no data for {selection}")]
pub struct EmptyDatasetWarning {
    pub view: ViewKind,
    pub selection: YearSelection,
}

/// Stable descending sort on `value`, then keep the first `n`.
/// Ties keep the order the groups had going in.
fn top_n_by<T>(mut rows: Vec<T>, n: usize, value: impl Fn(&T) -> f64) -> Vec<T> {
    rows.sort_by(|a, b| {
        value(b)
            .partial_cmp(&value(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(n);
    rows
}

pub struct Aggregations;

impl Aggregations {
    /// Crash count per manufacturer, highest first. Rows without a manufacturer are skipped.
    pub fn top_manufacturers(view: &FilteredView<'_>, n: usize) -> Vec<ManufacturerCount> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<ManufacturerCount> = Vec::new();

        for record in view.rows() {
            let Some(manufacturer) = record.aircraft_manufacturer.as_deref() else {
                continue;
            };
            match index.get(manufacturer) {
                Some(&i) => groups[i].crashes += 1,
                None => {
                    index.insert(manufacturer, groups.len());
                    groups.push(ManufacturerCount {
                        manufacturer: manufacturer.to_string(),
                        crashes: 1,
                    });
                }
            }
        }

        top_n_by(groups, n, |g| g.crashes as f64)
    }

    /// Crash count per year, ascending by year.
    pub fn yearly_trend(view: &FilteredView<'_>) -> Vec<YearCount> {
        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        for record in view.rows() {
            *counts.entry(record.year).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(year, crashes)| YearCount { year, crashes })
            .collect()
    }

    /// Summed air fatalities per country, highest first.
    /// Groups are keyed alphabetically before ranking, so ties fall back to name order.
    pub fn top_fatality_countries(view: &FilteredView<'_>, n: usize) -> Vec<CountryFatalities> {
        let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
        for record in view.rows() {
            let total = sums.entry(record.country_region.as_str()).or_insert(0.0);
            if let Some(f) = record.fatalities_air {
                *total += f;
            }
        }

        let groups: Vec<CountryFatalities> = sums
            .into_iter()
            .map(|(country, fatalities)| CountryFatalities {
                country: country.to_string(),
                fatalities,
            })
            .collect();
        top_n_by(groups, n, |g| g.fatalities)
    }

    /// Crash count per observed quarter in natural order; missing quarters are left out.
    pub fn crashes_by_quarter(view: &FilteredView<'_>) -> Vec<QuarterCount> {
        Quarter::DOMAIN
            .into_iter()
            .map(|quarter| QuarterCount {
                quarter,
                crashes: view.rows().iter().filter(|r| r.quarter == quarter).count(),
            })
            .filter(|q| q.crashes > 0)
            .collect()
    }

    /// `(aboard, fatalities)` pairs in row order; rows missing either value are skipped.
    pub fn aboard_vs_fatalities(view: &FilteredView<'_>) -> Vec<AboardFatalityPoint> {
        view.rows()
            .iter()
            .filter_map(|r| match (r.aboard, r.fatalities_air) {
                (Some(aboard), Some(fatalities)) => Some(AboardFatalityPoint { aboard, fatalities }),
                _ => None,
            })
            .collect()
    }

    pub fn correlation(points: &[AboardFatalityPoint]) -> Option<f64> {
        let xs: Vec<f64> = points.iter().map(|p| p.aboard).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.fatalities).collect();
        StatsCalculator::pearson(&xs, &ys)
    }
}

/// Every derived table the dashboard draws for one year selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSet {
    pub selection: YearSelection,
    pub top_manufacturers: Vec<ManufacturerCount>,
    pub yearly_trend: Vec<YearCount>,
    pub top_fatality_countries: Vec<CountryFatalities>,
    pub crashes_by_quarter: Vec<QuarterCount>,
    pub aboard_vs_fatalities: Vec<AboardFatalityPoint>,
    pub aboard_fatality_correlation: Option<f64>,
}

impl ViewSet {
    /// Manufacturer and country rankings follow the selection; the trend,
    /// quarter and scatter views always cover the whole table.
    pub fn compute(table: &CanonicalTable, selection: YearSelection, top_n: usize) -> Self {
        let filtered = FilteredView::new(table, selection);
        let full = FilteredView::all(table);
        if filtered.is_empty() {
            debug!(%selection, "No rows match the year selection");
        }

        let aboard_vs_fatalities = Aggregations::aboard_vs_fatalities(&full);
        let views = Self {
            selection,
            top_manufacturers: Aggregations::top_manufacturers(&filtered, top_n),
            yearly_trend: Aggregations::yearly_trend(&full),
            top_fatality_countries: Aggregations::top_fatality_countries(&filtered, top_n),
            crashes_by_quarter: Aggregations::crashes_by_quarter(&full),
            aboard_fatality_correlation: Aggregations::correlation(&aboard_vs_fatalities),
            aboard_vs_fatalities,
        };

        for warning in views.empty_warnings() {
            warn!(%warning, "Empty derived table");
        }
        views
    }

    pub fn empty_warnings(&self) -> Vec<EmptyDatasetWarning> {
        [
            (ViewKind::TopManufacturers, self.top_manufacturers.is_empty()),
            (ViewKind::YearlyTrend, self.yearly_trend.is_empty()),
            (ViewKind::TopFatalityCountries, self.top_fatality_countries.is_empty()),
            (ViewKind::CrashesByQuarter, self.crashes_by_quarter.is_empty()),
            (ViewKind::AboardVsFatalities, self.aboard_vs_fatalities.is_empty()),
        ]
        .into_iter()
        .filter(|(_, empty)| *empty)
        .map(|(view, _)| EmptyDatasetWarning {
            view,
            selection: self.selection,
        })
        .collect()
    }

    pub fn is_view_empty(&self, view: ViewKind) -> bool {
        self.empty_warnings().iter().any(|w| w.view == view)
    }
}
