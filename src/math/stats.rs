//! Pure statistics kernel.
//!
//! Everything in this module is a pure function of its arguments: no I/O, no
//! dates, no store access. Degenerate inputs are reported as structured
//! errors rather than silently coerced to 0, so callers can distinguish
//! "zero correlation" from "no defined correlation".
//!
//! The `DegenerateSeries` errors produced here carry positional slugs
//! (`"lhs"` / `"rhs"` / `"population"`); call sites that know real indicator
//! slugs substitute them before surfacing the error.

use crate::error::EngineError;

/// Arithmetic mean. Errors on an empty slice.
pub fn mean(xs: &[f64]) -> Result<f64, EngineError> {
    if xs.is_empty() {
        return Err(EngineError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    Ok(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Population standard deviation (divide by n). Errors on fewer than 2 points.
pub fn population_stddev(xs: &[f64]) -> Result<f64, EngineError> {
    if xs.len() < 2 {
        return Err(EngineError::InsufficientData {
            required: 2,
            actual: xs.len(),
        });
    }
    let m = mean(xs)?;
    let var = xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / xs.len() as f64;
    Ok(var.sqrt())
}

/// Pearson correlation coefficient.
///
/// Requires equal lengths, at least 2 paired samples, and non-zero variance
/// on both sides. The result is clamped to [-1, 1] against floating error.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64, EngineError> {
    if xs.len() != ys.len() {
        return Err(EngineError::InvalidParameter(format!(
            "pearson requires equal lengths (got {} and {})",
            xs.len(),
            ys.len()
        )));
    }
    let n = xs.len();
    if n < 2 {
        return Err(EngineError::InsufficientData {
            required: 2,
            actual: n,
        });
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut numer = 0.0;
    let mut denom_x = 0.0;
    let mut denom_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        numer += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }

    if denom_x == 0.0 {
        return Err(EngineError::degenerate("lhs"));
    }
    if denom_y == 0.0 {
        return Err(EngineError::degenerate("rhs"));
    }

    // Single square root keeps self-correlation exactly 1.0: for ys == xs the
    // numerator equals denom_x and sqrt(d * d) rounds back to d.
    Ok((numer / (denom_x * denom_y).sqrt()).clamp(-1.0, 1.0))
}

/// Percentile rank of `value` within `population`, in [0, 100].
///
/// Ties count fully: the rank is the fraction of the population <= `value`.
pub fn percentile_rank(value: f64, population: &[f64]) -> Result<f64, EngineError> {
    if population.is_empty() {
        return Err(EngineError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    let at_or_below = population.iter().filter(|&&v| v <= value).count();
    Ok(at_or_below as f64 / population.len() as f64 * 100.0)
}

/// Standard score of `value` against a population mean and stddev.
pub fn z_score(value: f64, population_mean: f64, population_stddev: f64) -> Result<f64, EngineError> {
    if population_stddev == 0.0 {
        return Err(EngineError::degenerate("population"));
    }
    Ok((value - population_mean) / population_stddev)
}
