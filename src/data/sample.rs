//! Deterministic synthetic dataset for demo mode and integration tests.
//!
//! The generator produces a plausible six-year macro snapshot with mixed
//! cadences: daily market series (equities, volatility, rates spread) and
//! monthly/quarterly macro prints (growth and inflation baskets). Everything
//! is derived from a caller-supplied seed, so two runs with the same seed
//! produce identical stores.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::store::MemoryStore;
use crate::domain::{DataPoint, IndicatorSeries};
use crate::error::AppError;

/// Fixed anchor so demo output is stable regardless of wall clock.
const ANCHOR: (i32, u32, u32) = (2025, 6, 30);
const YEARS: i64 = 6;

/// Generate the demo store.
pub fn generate_sample(seed: u64) -> Result<MemoryStore, AppError> {
    let end = NaiveDate::from_ymd_opt(ANCHOR.0, ANCHOR.1, ANCHOR.2)
        .ok_or_else(|| AppError::new(4, "Invalid demo anchor date."))?;
    let start = end - Duration::days(YEARS * 365);

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut store = MemoryStore::new();

    // Daily market series.
    store.insert(random_walk(
        "spx", start, end, 1, 3800.0, 0.55, 8.0, 100.0, &mut rng, &normal,
    )?);
    store.insert(mean_reverting(
        "vix", start, end, 1, 18.0, 0.05, 1.6, 10.0, &mut rng, &normal,
    )?);
    store.insert(mean_reverting(
        "yield_curve_10y_2y", start, end, 1, 0.4, 0.01, 0.05, f64::NEG_INFINITY, &mut rng, &normal,
    )?);
    store.insert(random_walk(
        "oil_wti", start, end, 1, 70.0, 0.0, 1.2, 20.0, &mut rng, &normal,
    )?);

    // Monthly macro prints.
    store.insert(mean_reverting(
        "industrial_prod", start, end, 30, 102.0, 0.02, 0.8, 0.0, &mut rng, &normal,
    )?);
    store.insert(mean_reverting(
        "retail_sales", start, end, 30, 620.0, 0.02, 6.0, 0.0, &mut rng, &normal,
    )?);
    store.insert(mean_reverting(
        "capacity_util", start, end, 30, 78.0, 0.05, 0.5, 0.0, &mut rng, &normal,
    )?);
    store.insert(mean_reverting(
        "cpi", start, end, 30, 3.0, 0.03, 0.25, 0.0, &mut rng, &normal,
    )?);
    store.insert(mean_reverting(
        "ppi", start, end, 30, 2.5, 0.03, 0.35, -5.0, &mut rng, &normal,
    )?);
    store.insert(mean_reverting(
        "pce", start, end, 30, 2.8, 0.03, 0.2, 0.0, &mut rng, &normal,
    )?);
    store.insert(mean_reverting(
        "buffett_indicator", start, end, 30, 165.0, 0.02, 2.5, 80.0, &mut rng, &normal,
    )?);

    // Quarterly growth print.
    store.insert(mean_reverting(
        "gdp_growth", start, end, 91, 2.0, 0.1, 0.6, -10.0, &mut rng, &normal,
    )?);

    Ok(store)
}

/// Drifting random walk sampled every `step_days`.
#[allow(clippy::too_many_arguments)]
fn random_walk(
    slug: &str,
    start: NaiveDate,
    end: NaiveDate,
    step_days: i64,
    level: f64,
    drift: f64,
    sigma: f64,
    floor: f64,
    rng: &mut StdRng,
    normal: &Normal<f64>,
) -> Result<IndicatorSeries, AppError> {
    let mut points = Vec::new();
    let mut value = level;
    let mut date = start;
    while date <= end {
        value = (value + drift + sigma * normal.sample(rng)).max(floor);
        points.push(DataPoint::new(date, value));
        date += Duration::days(step_days);
    }
    IndicatorSeries::new(slug, points).map_err(AppError::from)
}

/// Ornstein-Uhlenbeck-style series pulled back toward `level`.
#[allow(clippy::too_many_arguments)]
fn mean_reverting(
    slug: &str,
    start: NaiveDate,
    end: NaiveDate,
    step_days: i64,
    level: f64,
    reversion: f64,
    sigma: f64,
    floor: f64,
    rng: &mut StdRng,
    normal: &Normal<f64>,
) -> Result<IndicatorSeries, AppError> {
    let mut points = Vec::new();
    let mut value = level;
    let mut date = start;
    while date <= end {
        value += reversion * (level - value) + sigma * normal.sample(rng);
        value = value.max(floor);
        points.push(DataPoint::new(date, value));
        date += Duration::days(step_days);
    }
    IndicatorSeries::new(slug, points).map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::store::SeriesStore;

    #[test]
    fn same_seed_same_store() {
        let a = generate_sample(42).unwrap();
        let b = generate_sample(42).unwrap();
        for slug in a.slugs() {
            assert_eq!(a.series(&slug).unwrap(), b.series(&slug).unwrap());
        }
    }

    #[test]
    fn covers_mixed_cadences() {
        let store = generate_sample(7).unwrap();
        let spx = store.series("spx").unwrap();
        let gdp = store.series("gdp_growth").unwrap();
        // Daily series has roughly 365 points per year, quarterly about 4.
        assert!(spx.len() > 2000);
        assert!(gdp.len() < 30);
        assert!(store.series("cpi").is_ok());
        assert!(store.series("vix").is_ok());
        assert!(store.series("buffett_indicator").is_ok());
    }
}
