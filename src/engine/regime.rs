//! Growth/inflation regime classification.
//!
//! Each basket member is normalized against its own trailing five-year
//! baseline, the basket composite is the mean of those z-scores, and the
//! (growth, inflation) pair maps onto one of four quadrants. Baselines are
//! computed once and reused at every trajectory checkpoint, so a move along
//! the path always reflects the data changing, not the yardstick.

use chrono::{Duration, NaiveDate};

use crate::data::SeriesStore;
use crate::domain::{IndicatorSeries, Regime, RegimePoint, RegimeResult};
use crate::engine::policy::RegimePolicy;
use crate::error::EngineError;
use crate::math;

/// Days between trajectory checkpoints.
const CHECKPOINT_STEP_DAYS: i64 = 30;

struct Baseline {
    mean: f64,
    stddev: f64,
    series: IndicatorSeries,
}

/// Classify the current regime and its recent trajectory.
///
/// `anchor` is the date of the newest observation across the store; the
/// trajectory walks backward from it in 30-day steps.
pub fn classify<S: SeriesStore>(
    store: &S,
    policy: &RegimePolicy,
    anchor: NaiveDate,
) -> Result<RegimeResult, EngineError> {
    let growth = baselines(store, &policy.growth, policy.baseline_days);
    let inflation = baselines(store, &policy.inflation, policy.baseline_days);

    let mut historical_path = Vec::with_capacity(policy.path_points);
    for i in (0..policy.path_points).rev() {
        let date = anchor - Duration::days(CHECKPOINT_STEP_DAYS * i as i64);
        historical_path.push(RegimePoint {
            date,
            growth_score: composite_at(&growth, date),
            inflation_score: composite_at(&inflation, date),
        });
    }

    // The newest checkpoint is the live score.
    let current = historical_path
        .last()
        .ok_or(EngineError::InvalidParameter(
            "regime policy requires at least one path point".to_string(),
        ))?;
    let regime = Regime::from_scores(current.growth_score, current.inflation_score);

    Ok(RegimeResult {
        regime,
        growth_score: current.growth_score,
        inflation_score: current.inflation_score,
        strategy: policy.strategy_for(regime),
        historical_path,
    })
}

/// Trailing-window mean and stddev per basket member.
///
/// Members that are absent, too short, or flat over the window are dropped
/// from the basket rather than failing the classification.
fn baselines<S: SeriesStore>(store: &S, slugs: &[String], window_days: i64) -> Vec<Baseline> {
    slugs
        .iter()
        .filter_map(|slug| {
            let series = match store.series(slug) {
                Ok(s) => s,
                Err(e) => {
                    log::debug!("regime: skipping basket member '{slug}': {e}");
                    return None;
                }
            };
            let values = series.trailing_values(window_days);
            let mean = math::mean(&values).ok()?;
            match math::population_stddev(&values) {
                Ok(stddev) if stddev > 0.0 => Some(Baseline { mean, stddev, series }),
                Ok(_) | Err(_) => {
                    log::debug!("regime: basket member '{slug}' has no usable baseline");
                    None
                }
            }
        })
        .collect()
}

/// Mean z-score of the basket as of `date`, using each member's value
/// at-or-before the date. An empty basket scores 0.0.
fn composite_at(basket: &[Baseline], date: NaiveDate) -> f64 {
    let scores: Vec<f64> = basket
        .iter()
        .filter_map(|b| {
            let point = b.series.latest_at(date)?;
            Some((point.value - b.mean) / b.stddev)
        })
        .collect();
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryStore;
    use crate::domain::DataPoint;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    /// Monthly series ending at the anchor, oldest value first.
    fn monthly(slug: &str, values: &[f64]) -> IndicatorSeries {
        let points = values
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &v)| DataPoint::new(anchor() - Duration::days(30 * i as i64), v))
            .rev()
            .collect();
        IndicatorSeries::new(slug, points).unwrap()
    }

    fn policy(growth: &[&str], inflation: &[&str]) -> RegimePolicy {
        RegimePolicy {
            growth: growth.iter().map(|s| s.to_string()).collect(),
            inflation: inflation.iter().map(|s| s.to_string()).collect(),
            ..RegimePolicy::default()
        }
    }

    #[test]
    fn rising_growth_and_falling_inflation_is_goldilocks() {
        let mut store = MemoryStore::new();
        store.insert(monthly("gdp", &[1.0, 1.0, 1.0, 1.0, 1.0, 3.0]));
        store.insert(monthly("cpi", &[5.0, 5.0, 5.0, 5.0, 5.0, 2.0]));
        let result = classify(&store, &policy(&["gdp"], &["cpi"]), anchor()).unwrap();

        assert!(result.growth_score > 0.0);
        assert!(result.inflation_score < 0.0);
        assert_eq!(result.regime, Regime::Goldilocks);
        assert_eq!(result.strategy.key_theme, "Maximum Risk On");
    }

    #[test]
    fn path_is_oldest_first_and_ends_at_the_live_score() {
        let mut store = MemoryStore::new();
        store.insert(monthly("gdp", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]));
        store.insert(monthly("cpi", &[8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]));
        let result = classify(&store, &policy(&["gdp"], &["cpi"]), anchor()).unwrap();

        assert_eq!(result.historical_path.len(), 7);
        for pair in result.historical_path.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        let last = result.historical_path.last().unwrap();
        assert_eq!(last.date, anchor());
        assert_eq!(last.growth_score, result.growth_score);
        assert_eq!(last.inflation_score, result.inflation_score);
        // Growth is rising, so earlier checkpoints score lower.
        assert!(result.historical_path[0].growth_score < result.growth_score);
    }

    #[test]
    fn missing_and_flat_members_are_skipped() {
        let mut store = MemoryStore::new();
        store.insert(monthly("gdp", &[1.0, 1.0, 1.0, 1.0, 1.0, 3.0]));
        store.insert(monthly("flat", &[2.0, 2.0, 2.0, 2.0]));
        store.insert(monthly("cpi", &[5.0, 5.0, 5.0, 5.0, 5.0, 2.0]));

        let with_noise = classify(
            &store,
            &policy(&["gdp", "flat", "absent"], &["cpi"]),
            anchor(),
        )
        .unwrap();
        let clean = classify(&store, &policy(&["gdp"], &["cpi"]), anchor()).unwrap();

        // Unusable members do not move the composite.
        assert_eq!(with_noise.growth_score, clean.growth_score);
        assert_eq!(with_noise.regime, clean.regime);
    }

    #[test]
    fn empty_baskets_score_zero_and_land_in_reflation() {
        let store = MemoryStore::new();
        let result = classify(&store, &policy(&["gdp"], &["cpi"]), anchor()).unwrap();

        assert_eq!(result.growth_score, 0.0);
        assert_eq!(result.inflation_score, 0.0);
        // Both axes inclusive at zero.
        assert_eq!(result.regime, Regime::Reflation);
    }
}
