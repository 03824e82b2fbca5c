//! Cleaning Pipeline Module
//! Turns raw records into the canonical table: placeholder substitution, imputation,
//! string canonicalization, categorical domains, IQR clipping and de-duplication.

use crate::data::record::{title_case, AccidentRecord, Month, Quarter, RawRecord, UNKNOWN};
use crate::stats::{ClipBounds, StatsCalculator};
use std::collections::HashSet;
use tracing::{debug, info};

/// Placeholder the source uses for an unknown country/region.
/// Matched after trimming, so `" - "` also becomes [`UNKNOWN`].
pub const COUNTRY_PLACEHOLDER: &str = "-";

/// What the pipeline did, for the dataset summary and for tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub duplicates_removed: usize,
    pub placeholders_replaced: usize,
    pub countries_imputed: usize,
    pub operators_imputed: usize,
    pub unrecognized_quarters: usize,
    pub unrecognized_months: usize,
    pub ground_bounds: Option<ClipBounds>,
    pub fatalities_bounds: Option<ClipBounds>,
    pub ground_clipped: usize,
    pub fatalities_clipped: usize,
}

/// The cleaned, de-duplicated dataset. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CanonicalTable {
    records: Vec<AccidentRecord>,
    report: CleaningReport,
}

impl CanonicalTable {
    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    pub fn report(&self) -> &CleaningReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn to_raw(&self) -> Vec<RawRecord> {
        self.records.iter().map(AccidentRecord::to_raw).collect()
    }
}

/// Missing when absent or blank after trimming.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string())
}

pub struct CleaningPipeline;

impl CleaningPipeline {
    /// Run every cleaning step in order and produce the canonical table.
    pub fn run(raw: Vec<RawRecord>) -> CanonicalTable {
        let mut report = CleaningReport {
            rows_in: raw.len(),
            ..Default::default()
        };

        let normalized: Vec<AccidentRecord> = raw
            .into_iter()
            .map(|r| Self::normalize(r, &mut report))
            .collect();
        let clipped = Self::clip_outliers(normalized, &mut report);
        let records = Self::deduplicate(clipped, &mut report);

        report.rows_out = records.len();
        info!(
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            duplicates_removed = report.duplicates_removed,
            ground_clipped = report.ground_clipped,
            fatalities_clipped = report.fatalities_clipped,
            "Cleaning pipeline finished"
        );

        CanonicalTable { records, report }
    }

    /// Steps 1-4 for a single row.
    fn normalize(raw: RawRecord, report: &mut CleaningReport) -> AccidentRecord {
        // 1. placeholder substitution
        let country = match raw.country_region {
            Some(c) if c.trim() == COUNTRY_PLACEHOLDER => {
                report.placeholders_replaced += 1;
                None
            }
            other => other,
        };

        // 2. imputation
        let country = non_blank(country).unwrap_or_else(|| {
            report.countries_imputed += 1;
            UNKNOWN.to_string()
        });
        let operator = non_blank(raw.operator).unwrap_or_else(|| {
            report.operators_imputed += 1;
            UNKNOWN.to_string()
        });

        // 3. canonicalization
        let country_region = title_case(country.trim());
        let operator = operator.trim().to_string();
        let aircraft_manufacturer = trimmed(raw.aircraft_manufacturer).map(|m| title_case(&m));

        // 4. categorical domains
        let quarter = Quarter::parse(raw.quarter.as_deref());
        if quarter.is_missing() && raw.quarter.is_some() {
            report.unrecognized_quarters += 1;
        }
        let month = Month::parse(raw.month.as_deref());
        if month.is_missing() && raw.month.is_some() {
            report.unrecognized_months += 1;
        }

        AccidentRecord {
            country_region,
            operator,
            aircraft_manufacturer,
            aircraft: trimmed(raw.aircraft),
            location: trimmed(raw.location),
            quarter,
            month,
            year: raw.year,
            ground: raw.ground,
            fatalities_air: raw.fatalities_air,
            aboard: raw.aboard,
        }
    }

    /// Step 5. Bounds come from the full pre-clip column, then every value is clamped.
    fn clip_outliers(
        mut records: Vec<AccidentRecord>,
        report: &mut CleaningReport,
    ) -> Vec<AccidentRecord> {
        let ground: Vec<f64> = records.iter().filter_map(|r| r.ground).collect();
        let fatalities: Vec<f64> = records.iter().filter_map(|r| r.fatalities_air).collect();
        report.ground_bounds = StatsCalculator::clip_bounds(&ground);
        report.fatalities_bounds = StatsCalculator::clip_bounds(&fatalities);
        debug!(
            ground = ?report.ground_bounds,
            fatalities = ?report.fatalities_bounds,
            "Outlier bounds computed"
        );

        for record in &mut records {
            if let (Some(bounds), Some(v)) = (report.ground_bounds, record.ground) {
                if !bounds.contains(v) {
                    record.ground = Some(bounds.clamp(v));
                    report.ground_clipped += 1;
                }
            }
            if let (Some(bounds), Some(v)) = (report.fatalities_bounds, record.fatalities_air) {
                if !bounds.contains(v) {
                    record.fatalities_air = Some(bounds.clamp(v));
                    report.fatalities_clipped += 1;
                }
            }
        }

        records
    }

    /// Step 6. Keeps the first occurrence of each exact duplicate.
    fn deduplicate(
        records: Vec<AccidentRecord>,
        report: &mut CleaningReport,
    ) -> Vec<AccidentRecord> {
        let before = records.len();
        let mut seen = HashSet::with_capacity(before);
        let kept: Vec<AccidentRecord> = records
            .into_iter()
            .filter(|r| seen.insert(r.key()))
            .collect();
        report.duplicates_removed = before - kept.len();
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(country: Option<&str>, operator: Option<&str>, year: i32) -> RawRecord {
        RawRecord {
            country_region: country.map(str::to_string),
            operator: operator.map(str::to_string),
            aircraft_manufacturer: Some("Douglas".to_string()),
            aircraft: Some("DC-3".to_string()),
            location: Some("Nowhere".to_string()),
            quarter: Some("Qtr 1".to_string()),
            month: Some("January".to_string()),
            year,
            ground: Some(0.0),
            fatalities_air: Some(1.0),
            aboard: Some(2.0),
        }
    }

    fn sample() -> Vec<RawRecord> {
        let mut rows = Vec::new();
        for (i, g) in [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 100.0].into_iter().enumerate() {
            let mut r = raw(Some(" united kingdom "), Some(" BOAC "), 1950 + i as i32);
            r.ground = Some(g);
            r.fatalities_air = Some(10.0 * i as f64);
            r.quarter = Some(format!("Qtr {}", i % 5 + 1));
            r.month = Some(if i % 2 == 0 { "March" } else { "Marzo" }.to_string());
            rows.push(r);
        }
        rows.push(raw(Some("-"), None, 1999));
        rows.push(raw(None, Some("   "), 1998));
        rows.push(raw(Some("-"), None, 1999));
        rows
    }

    #[test]
    fn test_placeholder_country_becomes_unknown() {
        let table = CleaningPipeline::run(vec![raw(Some("-"), Some("KLM"), 1934)]);
        assert_eq!(table.records()[0].country_region, UNKNOWN);
        assert_eq!(table.report().placeholders_replaced, 1);
        assert_eq!(table.report().countries_imputed, 1);
    }

    #[test]
    fn test_padded_placeholder_becomes_unknown() {
        let table = CleaningPipeline::run(vec![raw(Some(" - "), Some("KLM"), 1934)]);
        assert_eq!(table.records()[0].country_region, UNKNOWN);
        assert_eq!(table.report().placeholders_replaced, 1);
    }

    #[test]
    fn test_sentinels_fill_every_row() {
        let table = CleaningPipeline::run(sample());
        for r in table.records() {
            assert!(!r.country_region.is_empty());
            assert!(!r.operator.is_empty());
        }
        assert_eq!(table.records()[0].country_region, "United Kingdom");
        assert_eq!(table.records()[0].operator, "BOAC");
        let last = table.records().last().unwrap();
        assert_eq!(last.country_region, UNKNOWN);
        assert_eq!(last.operator, UNKNOWN);
    }

    #[test]
    fn test_string_canonicalization() {
        let mut r = raw(Some("  SOUTH africa"), Some("  South African Airways "), 1987);
        r.aircraft_manufacturer = Some("  mcdonnell douglas ".to_string());
        r.aircraft = Some("  DC-10 ".to_string());
        r.location = Some(" Mauritius  ".to_string());
        let table = CleaningPipeline::run(vec![r]);
        let out = &table.records()[0];
        assert_eq!(out.country_region, "South Africa");
        assert_eq!(out.operator, "South African Airways");
        assert_eq!(out.aircraft_manufacturer.as_deref(), Some("Mcdonnell Douglas"));
        assert_eq!(out.aircraft.as_deref(), Some("DC-10"));
        assert_eq!(out.location.as_deref(), Some("Mauritius"));
    }

    #[test]
    fn test_categorical_domains() {
        let table = CleaningPipeline::run(sample());
        for r in table.records() {
            assert!(r.quarter.is_missing() || Quarter::DOMAIN.contains(&r.quarter));
            assert!(r.month.is_missing() || Month::DOMAIN.contains(&r.month));
        }
        // "Qtr 5" shows up for i == 4, "Marzo" for odd i
        assert_eq!(table.records()[4].quarter, Quarter::Missing);
        assert_eq!(table.records()[1].month, Month::Missing);
        assert_eq!(table.records()[0].month, Month::March);
        assert_eq!(table.report().unrecognized_quarters, 1);
        assert_eq!(table.report().unrecognized_months, 4);
    }

    #[test]
    fn test_ground_outlier_clipped() {
        let rows: Vec<RawRecord> = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 100.0]
            .into_iter()
            .enumerate()
            .map(|(i, g)| {
                let mut r = raw(Some("France"), Some("Air France"), 1960 + i as i32);
                r.ground = Some(g);
                r
            })
            .collect();

        let table = CleaningPipeline::run(rows);
        let ground: Vec<f64> = table.records().iter().filter_map(|r| r.ground).collect();
        assert_eq!(ground, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 10.0]);

        let bounds = table.report().ground_bounds.unwrap();
        assert_eq!((bounds.q1, bounds.q3, bounds.iqr, bounds.upper), (0.0, 4.0, 4.0, 10.0));
        assert_eq!(table.report().ground_clipped, 1);
    }

    #[test]
    fn test_clip_bounds_hold_for_every_row() {
        let table = CleaningPipeline::run(sample());
        let report = table.report();
        let g = report.ground_bounds.unwrap();
        let f = report.fatalities_bounds.unwrap();
        for r in table.records() {
            if let Some(v) = r.ground {
                assert!(g.lower <= v && v <= g.upper);
            }
            if let Some(v) = r.fatalities_air {
                assert!(f.lower <= v && v <= f.upper);
            }
        }
    }

    #[test]
    fn test_missing_numbers_are_not_clipped_or_filled() {
        let mut a = raw(Some("Chile"), Some("LAN"), 1965);
        a.ground = None;
        a.fatalities_air = None;
        let table = CleaningPipeline::run(vec![a]);
        assert_eq!(table.records()[0].ground, None);
        assert_eq!(table.records()[0].fatalities_air, None);
    }

    #[test]
    fn test_exact_duplicates_collapse_to_first() {
        let a = raw(Some("Italy"), Some("Alitalia"), 1972);
        let mut b = a.clone();
        b.location = Some("Palermo".to_string());
        let table = CleaningPipeline::run(vec![a.clone(), b, a]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].location.as_deref(), Some("Nowhere"));
        assert_eq!(table.records()[1].location.as_deref(), Some("Palermo"));
        assert_eq!(table.report().duplicates_removed, 1);
    }

    #[test]
    fn test_rows_equal_after_normalization_are_duplicates() {
        let a = raw(Some("italy "), Some("Alitalia"), 1972);
        let b = raw(Some(" ITALY"), Some(" Alitalia"), 1972);
        let table = CleaningPipeline::run(vec![a, b]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.report().rows_in, 2);
        assert_eq!(table.report().rows_out, 1);
    }

    #[test]
    fn test_no_duplicates_remain() {
        let table = CleaningPipeline::run(sample());
        let keys: HashSet<_> = table.records().iter().map(|r| r.key()).collect();
        assert_eq!(keys.len(), table.len());
        assert!(table.len() <= table.report().rows_in);
        assert_eq!(table.report().duplicates_removed, 1);
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let once = CleaningPipeline::run(sample());
        let twice = CleaningPipeline::run(once.to_raw());
        assert_eq!(once.records(), twice.records());
        assert_eq!(twice.report().duplicates_removed, 0);
        assert_eq!(twice.report().ground_clipped, 0);
        assert_eq!(twice.report().countries_imputed, 0);
        assert_eq!(twice.report().operators_imputed, 0);
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let a = CleaningPipeline::run(sample());
        let b = CleaningPipeline::run(sample());
        assert_eq!(a.records(), b.records());
        assert_eq!(a.report(), b.report());
    }

    #[test]
    fn test_empty_input() {
        let table = CleaningPipeline::run(Vec::new());
        assert!(table.is_empty());
        assert!(table.report().ground_bounds.is_none());
        assert!(table.years().is_empty());
    }

    #[test]
    fn test_years_sorted_distinct() {
        let rows = vec![
            raw(Some("A"), None, 2003),
            raw(Some("B"), None, 2001),
            raw(Some("C"), None, 2003),
        ];
        let table = CleaningPipeline::run(rows);
        assert_eq!(table.years(), vec![2001, 2003]);
    }
}
