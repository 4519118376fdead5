//! Latest-value anomaly scoring.
//!
//! Each indicator is compared against its own trailing five-year history:
//! z-score of the most recent print plus its inclusive percentile rank.
//! The window anchors at the series' latest date, not the wall clock, so a
//! fixed snapshot always scores the same.

use crate::data::SeriesStore;
use crate::domain::{AnomalyScore, IndicatorSeries, Severity};
use crate::error::EngineError;
use crate::math;

/// Trailing baseline window in calendar days.
pub const BASELINE_DAYS: i64 = 365 * 5;

/// Score one indicator's latest value against its trailing baseline.
pub fn scan(series: &IndicatorSeries) -> Result<AnomalyScore, EngineError> {
    let latest = series.latest().ok_or(EngineError::InsufficientData {
        required: 2,
        actual: 0,
    })?;

    let population = series.trailing_values(BASELINE_DAYS);
    let mean = math::mean(&population)?;
    let stddev = math::population_stddev(&population)?;

    let z_score = math::z_score(latest.value, mean, stddev)
        .map_err(|_| EngineError::degenerate(&series.slug))?;
    let percentile = math::percentile_rank(latest.value, &population)?;

    Ok(AnomalyScore {
        slug: series.slug.clone(),
        z_score,
        percentile,
        severity: Severity::from_z(z_score),
    })
}

/// Scan every indicator in the store, most anomalous first.
///
/// Indicators that cannot be scored (too short, flat baseline) are omitted
/// rather than failing the whole scan.
pub fn heatmap<S: SeriesStore>(store: &S) -> Vec<AnomalyScore> {
    let mut items: Vec<AnomalyScore> = store
        .slugs()
        .iter()
        .filter_map(|slug| {
            let series = match store.series(slug) {
                Ok(s) => s,
                Err(e) => {
                    log::debug!("heatmap: skipping '{slug}': {e}");
                    return None;
                }
            };
            match scan(&series) {
                Ok(score) => Some(score),
                Err(e) => {
                    log::debug!("heatmap: skipping '{slug}': {e}");
                    None
                }
            }
        })
        .collect();

    items.sort_by(|a, b| b.z_score.abs().total_cmp(&a.z_score.abs()));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryStore;
    use crate::domain::DataPoint;
    use chrono::{Duration, NaiveDate};

    fn monthly(slug: &str, values: &[f64]) -> IndicatorSeries {
        let end = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let points = values
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &v)| DataPoint::new(end - Duration::days(30 * i as i64), v))
            .rev()
            .collect();
        IndicatorSeries::new(slug, points).unwrap()
    }

    #[test]
    fn scores_latest_value_against_trailing_window() {
        // Latest print of 20 against a baseline of mostly 10s.
        let s = monthly("cpi", &[10.0, 10.0, 10.0, 10.0, 20.0]);
        let score = scan(&s).unwrap();

        // mean = 12, population stddev = 4, so z = (20 - 12) / 4 = 2.
        assert!((score.z_score - 2.0).abs() < 1e-12);
        assert_eq!(score.severity, Severity::Extreme);
        // Every value is at or below 20.
        assert_eq!(score.percentile, 100.0);
    }

    #[test]
    fn observations_older_than_the_window_are_excluded() {
        let end = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut points = vec![
            // Far outside the 5y window; would dominate the stddev if counted.
            DataPoint::new(end - Duration::days(BASELINE_DAYS + 400), 1_000_000.0),
        ];
        points.extend([
            DataPoint::new(end - Duration::days(60), 10.0),
            DataPoint::new(end - Duration::days(30), 10.0),
            DataPoint::new(end, 20.0),
        ]);
        let s = IndicatorSeries::new("vix", points).unwrap();

        let score = scan(&s).unwrap();
        // Baseline is [10, 10, 20]: mean 40/3, stddev sqrt(200/9).
        let expected = (20.0 - 40.0 / 3.0) / (200.0_f64 / 9.0).sqrt();
        assert!((score.z_score - expected).abs() < 1e-12);
    }

    #[test]
    fn flat_series_reports_the_degenerate_slug() {
        let s = monthly("fed_funds", &[5.0, 5.0, 5.0, 5.0]);
        match scan(&s) {
            Err(EngineError::DegenerateSeries { slug }) => assert_eq!(slug, "fed_funds"),
            other => panic!("expected degenerate error, got {other:?}"),
        }
    }

    #[test]
    fn heatmap_sorts_by_magnitude_and_isolates_failures() {
        let mut store = MemoryStore::new();
        store.insert(monthly("mild", &[10.0, 12.0, 11.0, 10.5, 11.5]));
        store.insert(monthly("wild", &[10.0, 10.0, 10.0, 10.0, 20.0]));
        store.insert(monthly("flat", &[7.0, 7.0, 7.0, 7.0]));

        let items = heatmap(&store);
        let slugs: Vec<&str> = items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["wild", "mild"]);
        assert!(items[0].z_score.abs() >= items[1].z_score.abs());
    }
}
