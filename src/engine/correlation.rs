//! Pairwise, lagged, rolling, matrix, and ranked correlations.
//!
//! All functions here are pure over the series they receive; range bounds are
//! resolved by the engine facade before the series arrive. Lag convention:
//! a positive `lag_days` means the first series leads, with its value at `t`
//! compared against the second series at `t + lag`.

use chrono::{Duration, NaiveDate};
use rayon::prelude::*;

use crate::align;
use crate::domain::{
    CorrelationMatrix, CorrelationResult, IndicatorSeries, LagScan, RankedCorrelation, RankedEntry,
    RollingPoint,
};
use crate::error::EngineError;
use crate::math;

/// Minimum aligned rows for a meaningful pairwise correlation.
const MIN_PAIR_ROWS: usize = 3;
/// Row count of the recent-trend window.
const TREND_ROWS: usize = 30;

/// Rename the kernel's positional degenerate-series errors to real slugs.
fn with_slugs(err: EngineError, lhs: &str, rhs: &str) -> EngineError {
    match err {
        EngineError::DegenerateSeries { slug } => {
            let slug = match slug.as_str() {
                "lhs" => lhs.to_string(),
                "rhs" => rhs.to_string(),
                other => other.to_string(),
            };
            EngineError::DegenerateSeries { slug }
        }
        other => other,
    }
}

/// Shift every observation date of `series` backward by `lag_days`.
///
/// After the shift, an equality join pairs the other series at `t` with this
/// one at `t + lag`: a positive lag tests whether the first series' moves
/// reappear in the second one `lag` days later.
fn shift(series: &IndicatorSeries, lag_days: i64) -> IndicatorSeries {
    if lag_days == 0 {
        return series.clone();
    }
    IndicatorSeries {
        slug: series.slug.clone(),
        points: series
            .points
            .iter()
            .map(|p| crate::domain::DataPoint::new(p.date - Duration::days(lag_days), p.value))
            .collect(),
    }
}

/// Pairwise correlation with lag and explanatory diagnostics.
pub fn correlate(
    a: &IndicatorSeries,
    b: &IndicatorSeries,
    from: Option<NaiveDate>,
    lag_days: i64,
) -> Result<CorrelationResult, EngineError> {
    let b_shifted = shift(b, lag_days);
    let table = align::align(&[a, &b_shifted], from, None);
    let rows = align::paired(&table, &a.slug, &b.slug)?;

    if rows.len() < MIN_PAIR_ROWS {
        return Err(EngineError::InsufficientData {
            required: MIN_PAIR_ROWS,
            actual: rows.len(),
        });
    }

    let xs: Vec<f64> = rows.iter().map(|r| r.1).collect();
    let ys: Vec<f64> = rows.iter().map(|r| r.2).collect();
    let n = xs.len();

    let coefficient = math::pearson(&xs, &ys).map_err(|e| with_slugs(e, &a.slug, &b.slug))?;

    // Recent trend: correlation over the newest rows only. A degenerate
    // trend window falls back to the full-range coefficient.
    let trend_rows = TREND_ROWS.min(n);
    let recent_trend =
        math::pearson(&xs[n - trend_rows..], &ys[n - trend_rows..]).unwrap_or(coefficient);

    // Both stddevs are non-zero here, otherwise pearson above would have failed.
    let std_a = math::population_stddev(&xs)?;
    let std_b = math::population_stddev(&ys)?;
    let volatility_ratio = std_a / std_b;

    // Divergence: z-score of the latest scale-adjusted spread. The second
    // series is rescaled to the first's volatility and sign-flipped for
    // inverse relationships, so a stable relationship keeps spreads flat.
    let sign = if coefficient >= 0.0 { 1.0 } else { -1.0 };
    let spreads: Vec<f64> = xs
        .iter()
        .zip(ys.iter())
        .map(|(x, y)| x - y * volatility_ratio * sign)
        .collect();
    let spread_mean = math::mean(&spreads)?;
    let spread_std = math::population_stddev(&spreads)?;
    let divergence_sigma = if spread_std == 0.0 {
        // Diagnostic only: a perfectly stable spread means zero divergence.
        0.0
    } else {
        (spreads[spreads.len() - 1] - spread_mean) / spread_std
    };

    Ok(CorrelationResult {
        coefficient,
        lag_days,
        sample_size: n,
        divergence_sigma,
        volatility_ratio,
        recent_trend,
    })
}

/// Exhaustive lag scan over `[-max_lag, +max_lag]`.
///
/// Deterministic tie-break on equal |coefficient|: prefer the lag closest to
/// zero, then the smaller (more negative) lag. Lags whose aligned overlap is
/// unusable are skipped rather than failing the scan.
pub fn find_optimal_lag(
    target: &IndicatorSeries,
    indicator: &IndicatorSeries,
    from: Option<NaiveDate>,
    max_lag: i64,
) -> Result<LagScan, EngineError> {
    if max_lag < 0 {
        return Err(EngineError::InvalidParameter(format!(
            "max_lag must be >= 0 (got {max_lag})"
        )));
    }

    let mut best: Option<(i64, f64)> = None;
    for lag in -max_lag..=max_lag {
        let coefficient = match correlate(target, indicator, from, lag) {
            Ok(result) => result.coefficient,
            Err(_) => continue,
        };

        let replace = match best {
            None => true,
            Some((best_lag, best_coef)) => {
                let (abs, best_abs) = (coefficient.abs(), best_coef.abs());
                abs > best_abs
                    || (abs == best_abs
                        && (lag.abs() < best_lag.abs()
                            || (lag.abs() == best_lag.abs() && lag < best_lag)))
            }
        };
        if replace {
            best = Some((lag, coefficient));
        }
    }

    let (optimal_lag, coefficient) = best.ok_or(EngineError::InsufficientData {
        required: MIN_PAIR_ROWS,
        actual: 0,
    })?;
    Ok(LagScan {
        optimal_lag,
        max_abs_coefficient: coefficient.abs(),
        coefficient_at_optimum: coefficient,
    })
}

/// Rolling correlation over a sliding window of aligned rows.
///
/// Emits one point per full window, dated at the window's last row. An
/// aligned overlap shorter than the window yields an empty history, not an
/// error. Degenerate (constant) windows are skipped.
pub fn rolling(
    a: &IndicatorSeries,
    b: &IndicatorSeries,
    window: usize,
) -> Result<Vec<RollingPoint>, EngineError> {
    if window < 2 {
        return Err(EngineError::InvalidParameter(format!(
            "rolling window must be >= 2 (got {window})"
        )));
    }

    let table = align::align(&[a, b], None, None);
    let rows = align::paired(&table, &a.slug, &b.slug)?;
    if rows.len() < window {
        return Ok(Vec::new());
    }

    let xs: Vec<f64> = rows.iter().map(|r| r.1).collect();
    let ys: Vec<f64> = rows.iter().map(|r| r.2).collect();

    let mut out = Vec::with_capacity(rows.len() - window + 1);
    for end in window..=rows.len() {
        let start = end - window;
        match math::pearson(&xs[start..end], &ys[start..end]) {
            Ok(coefficient) => out.push(RollingPoint {
                date: rows[end - 1].0,
                coefficient,
            }),
            Err(EngineError::DegenerateSeries { .. }) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

/// N x N correlation matrix.
///
/// Each unordered pair is aligned independently over its own overlap (pairs
/// with different cadences have different usable windows), computed once and
/// mirrored. Pair computations are independent and run in parallel. Failing
/// pairs are isolated into `skipped` instead of aborting the matrix.
pub fn matrix(series: &[IndicatorSeries], from: Option<NaiveDate>) -> CorrelationMatrix {
    let n = series.len();
    let mut grid = vec![vec![0.0; n]; n];
    for (i, row) in grid.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();

    let results: Vec<(usize, usize, Result<CorrelationResult, EngineError>)> = pairs
        .par_iter()
        .map(|&(i, j)| (i, j, correlate(&series[i], &series[j], from, 0)))
        .collect();

    let mut sample_size = usize::MAX;
    let mut skipped = Vec::new();
    for (i, j, result) in results {
        match result {
            Ok(r) => {
                grid[i][j] = r.coefficient;
                grid[j][i] = r.coefficient;
                sample_size = sample_size.min(r.sample_size);
            }
            Err(e) => {
                skipped.push((series[i].slug.clone(), series[j].slug.clone(), e.to_string()));
            }
        }
    }
    if sample_size == usize::MAX {
        sample_size = 0;
    }

    CorrelationMatrix {
        labels: series.iter().map(|s| s.slug.clone()).collect(),
        matrix: grid,
        sample_size,
        skipped,
    }
}

/// Zero-lag correlation of every candidate against one reference.
///
/// Candidates that cannot be correlated are omitted (isolated failures). The
/// entries carry no implicit order.
pub fn ranked(
    target: &IndicatorSeries,
    candidates: &[IndicatorSeries],
    from: Option<NaiveDate>,
) -> RankedCorrelation {
    let entries = candidates
        .iter()
        .filter(|c| c.slug != target.slug)
        .filter_map(|c| match correlate(target, c, from, 0) {
            Ok(r) => Some(RankedEntry {
                slug: c.slug.clone(),
                coefficient: r.coefficient,
                sample_size: r.sample_size,
            }),
            Err(e) => {
                log::debug!("ranked: skipping '{}': {e}", c.slug);
                None
            }
        })
        .collect();

    RankedCorrelation {
        reference_slug: target.slug.clone(),
        entries,
    }
}
