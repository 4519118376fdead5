//! Composite market risk scoring.
//!
//! Four drivers (yield curve, VIX, equity momentum, valuation) are each
//! mapped through a piecewise-linear severity curve from [`RiskPolicy`],
//! weighted, and summed into a 0-100 score. The same model scores both the
//! live snapshot and the recomputed history, so the two never disagree about
//! what a given set of inputs means.

use chrono::{Duration, NaiveDate};

use crate::data::SeriesStore;
use crate::domain::{IndicatorSeries, RiskDriver, RiskLabel, RiskScorePoint, RiskScoreResult};
use crate::engine::policy::{DriverSpec, RiskPolicy};
use crate::error::EngineError;

/// Score the latest snapshot.
///
/// Drivers whose input series is missing or empty are omitted and the score
/// is computed from the rest; only a fully empty driver set is an error.
pub fn status<S: SeriesStore>(store: &S, policy: &RiskPolicy) -> Result<RiskScoreResult, EngineError> {
    let mut drivers = Vec::with_capacity(4);

    if let Some(x) = latest_value(store, &policy.yield_curve.slug) {
        drivers.push(reading(&policy.yield_curve, x, yield_curve_signal(x)));
    }
    if let Some(x) = latest_value(store, &policy.vix.slug) {
        drivers.push(reading(&policy.vix, x, vix_signal(x)));
    }
    if let Some(x) = latest_momentum(store, policy) {
        drivers.push(reading(&policy.momentum, x, momentum_signal(x)));
    }
    if let Some(x) = latest_value(store, &policy.valuation.slug) {
        drivers.push(reading(&policy.valuation, x, valuation_signal(x)));
    }

    if drivers.is_empty() {
        return Err(EngineError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let total: f64 = drivers.iter().map(|d| d.contribution).sum();
    let score = clamp_score(total);
    let label = RiskLabel::from_score(score);

    let top = drivers
        .iter()
        .max_by(|a, b| a.contribution.total_cmp(&b.contribution))
        .map(|d| d.name.clone())
        .unwrap_or_else(|| "none".to_string());
    let summary = format!(
        "Risk score {score} ({}). Key driver: {top}.",
        label.display_name()
    );

    Ok(RiskScoreResult {
        score,
        label,
        drivers,
        summary,
        model_version: policy.model_version.clone(),
    })
}

/// Recompute the score for each of the trailing `days` calendar days.
///
/// Driver inputs are forward-filled to each day; the momentum driver only
/// participates once a full moving-average window exists, so early history is
/// scored from the remaining drivers alone.
pub fn history<S: SeriesStore>(
    store: &S,
    policy: &RiskPolicy,
    days: i64,
    anchor: NaiveDate,
) -> Result<Vec<RiskScorePoint>, EngineError> {
    if days < 1 {
        return Err(EngineError::InvalidParameter(format!(
            "history length must be at least 1 day (got {days})"
        )));
    }

    let yield_curve = series_opt(store, &policy.yield_curve.slug);
    let vix = series_opt(store, &policy.vix.slug);
    let valuation = series_opt(store, &policy.valuation.slug);
    let spx = series_opt(store, &policy.momentum.slug);

    // Prefix sums over the equity closes keep the running SMA O(1) per day.
    let spx_prefix: Vec<f64> = spx
        .as_ref()
        .map(|s| {
            let mut acc = 0.0;
            std::iter::once(0.0)
                .chain(s.points.iter().map(|p| {
                    acc += p.value;
                    acc
                }))
                .collect()
        })
        .unwrap_or_default();

    let mut out = Vec::with_capacity(days as usize);
    for offset in (0..days).rev() {
        let date = anchor - Duration::days(offset);
        let mut total = 0.0;

        for (spec, series) in [
            (&policy.yield_curve, &yield_curve),
            (&policy.vix, &vix),
            (&policy.valuation, &valuation),
        ] {
            if let Some(p) = series.as_ref().and_then(|s| s.latest_at(date)) {
                total += spec.curve.severity(p.value) * spec.weight * 100.0;
            }
        }

        if let Some(s) = spx.as_ref() {
            let upto = s.points.partition_point(|p| p.date <= date);
            let window = policy.momentum_sma_days;
            if upto >= window && window > 0 {
                let sma = (spx_prefix[upto] - spx_prefix[upto - window]) / window as f64;
                let price = s.points[upto - 1].value;
                if sma != 0.0 {
                    total +=
                        policy.momentum.curve.severity(price / sma - 1.0) * policy.momentum.weight * 100.0;
                }
            }
        }

        out.push(RiskScorePoint {
            date,
            score: clamp_score(total),
        });
    }
    Ok(out)
}

fn reading(spec: &DriverSpec, value: f64, signal: &'static str) -> RiskDriver {
    RiskDriver {
        name: spec.name.clone(),
        value,
        signal: signal.to_string(),
        contribution: spec.curve.severity(value) * spec.weight * 100.0,
    }
}

fn clamp_score(total: f64) -> u8 {
    total.clamp(0.0, 100.0).round() as u8
}

fn series_opt<S: SeriesStore>(store: &S, slug: &str) -> Option<IndicatorSeries> {
    match store.series(slug) {
        Ok(s) if !s.is_empty() => Some(s),
        Ok(_) => {
            log::warn!("risk: driver series '{slug}' is empty, omitting");
            None
        }
        Err(e) => {
            log::warn!("risk: driver series '{slug}' unavailable, omitting: {e}");
            None
        }
    }
}

fn latest_value<S: SeriesStore>(store: &S, slug: &str) -> Option<f64> {
    series_opt(store, slug).and_then(|s| s.latest()).map(|p| p.value)
}

/// Relative distance of the latest close from its moving average, using up to
/// `momentum_sma_days` trailing closes.
fn latest_momentum<S: SeriesStore>(store: &S, policy: &RiskPolicy) -> Option<f64> {
    let series = series_opt(store, &policy.momentum.slug)?;
    let latest = series.latest()?;
    let n = series.len().min(policy.momentum_sma_days);
    let window = &series.points[series.len() - n..];
    let sma = window.iter().map(|p| p.value).sum::<f64>() / n as f64;
    if sma == 0.0 {
        log::warn!("risk: momentum average is zero, omitting driver");
        return None;
    }
    Some(latest.value / sma - 1.0)
}

fn yield_curve_signal(x: f64) -> &'static str {
    if x <= -0.5 {
        "Deep Inversion"
    } else if x < 0.0 {
        "Inverted"
    } else {
        "Normal"
    }
}

fn vix_signal(x: f64) -> &'static str {
    if x >= 30.0 {
        "Panic"
    } else if x > 15.0 {
        "Elevated"
    } else {
        "Complacent"
    }
}

fn momentum_signal(x: f64) -> &'static str {
    if x < 0.0 {
        "Below 200d MA"
    } else {
        "Above 200d MA"
    }
}

fn valuation_signal(x: f64) -> &'static str {
    if x >= 180.0 {
        "Overvalued"
    } else if x > 140.0 {
        "Stretched"
    } else {
        "Fair"
    }
}
