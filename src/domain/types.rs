//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during analysis
//! - exported to JSON for downstream tooling
//! - rendered by the terminal report layer
//!
//! Every result type here is a value object: created fresh per call, owned by
//! the caller, never mutated after construction.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A single dated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl DataPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A named indicator series.
///
/// Invariant: `points` is strictly increasing by date with no duplicates.
/// `new` enforces this by sorting and rejecting duplicate dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub slug: String,
    pub points: Vec<DataPoint>,
}

impl IndicatorSeries {
    pub fn new(slug: impl Into<String>, mut points: Vec<DataPoint>) -> Result<Self, EngineError> {
        let slug = slug.into();
        points.sort_by_key(|p| p.date);
        for pair in points.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(EngineError::InvalidParameter(format!(
                    "series '{slug}' has duplicate observations for {}",
                    pair[0].date
                )));
            }
        }
        Ok(Self { slug, points })
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Most recent observation, if any.
    pub fn latest(&self) -> Option<DataPoint> {
        self.points.last().copied()
    }

    /// Most recent observation at or before `date`.
    pub fn latest_at(&self, date: NaiveDate) -> Option<DataPoint> {
        // Points are sorted ascending, so scan from the back.
        self.points.iter().rev().find(|p| p.date <= date).copied()
    }

    /// Values from the trailing `days` window anchored at the series' own
    /// latest date. `days = 0` means full history.
    pub fn trailing_values(&self, days: i64) -> Vec<f64> {
        match (self.points.last(), days) {
            (None, _) => Vec::new(),
            (Some(_), 0) => self.points.iter().map(|p| p.value).collect(),
            (Some(last), _) => {
                let cutoff = last.date - chrono::Duration::days(days);
                self.points
                    .iter()
                    .filter(|p| p.date >= cutoff)
                    .map(|p| p.value)
                    .collect()
            }
        }
    }
}

/// Fixed range vocabulary for historical lookbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Range {
    #[value(name = "1m")]
    #[serde(rename = "1M")]
    M1,
    #[value(name = "3m")]
    #[serde(rename = "3M")]
    M3,
    #[value(name = "6m")]
    #[serde(rename = "6M")]
    M6,
    #[value(name = "1y")]
    #[serde(rename = "1Y")]
    Y1,
    #[value(name = "3y")]
    #[serde(rename = "3Y")]
    Y3,
    #[value(name = "5y")]
    #[serde(rename = "5Y")]
    Y5,
    #[value(name = "all")]
    #[serde(rename = "ALL")]
    All,
}

impl Range {
    /// Lookback in calendar days; `None` means unbounded.
    pub fn days(self) -> Option<i64> {
        match self {
            Range::M1 => Some(30),
            Range::M3 => Some(90),
            Range::M6 => Some(180),
            Range::Y1 => Some(365),
            Range::Y3 => Some(365 * 3),
            Range::Y5 => Some(365 * 5),
            Range::All => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Range::M1 => "1M",
            Range::M3 => "3M",
            Range::M6 => "6M",
            Range::Y1 => "1Y",
            Range::Y3 => "3Y",
            Range::Y5 => "5Y",
            Range::All => "ALL",
        }
    }
}

/// One column of an aligned table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedColumn {
    pub slug: String,
    /// One entry per axis date. `None` means no observation exists at or
    /// before that date (missing, never zero).
    pub values: Vec<Option<f64>>,
    /// True if at least one axis date used a carried-forward value.
    pub filled: bool,
}

/// Multiple series on a common sorted date axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<AlignedColumn>,
}

impl AlignedTable {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, slug: &str) -> Option<&AlignedColumn> {
        self.columns.iter().find(|c| c.slug == slug)
    }
}

/// Pairwise correlation outcome with explanatory diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Pearson coefficient in [-1, 1].
    pub coefficient: f64,
    /// Lag applied to the second series (positive = first series leads).
    pub lag_days: i64,
    /// Aligned row count after intersection and lag shift.
    pub sample_size: usize,
    /// Z-score of the latest scaled spread against its in-range distribution.
    pub divergence_sigma: f64,
    /// stddev(first) / stddev(second), over the aligned rows.
    pub volatility_ratio: f64,
    /// Pearson over the most recent aligned rows (up to 30).
    pub recent_trend: f64,
}

/// Outcome of an exhaustive lag scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagScan {
    pub optimal_lag: i64,
    pub max_abs_coefficient: f64,
    /// Signed coefficient at the optimal lag.
    pub coefficient_at_optimum: f64,
}

/// One point of a rolling correlation history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub coefficient: f64,
}

/// N x N correlation grid. Symmetric with a unit diagonal by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    /// Minimum aligned sample size across successfully computed pairs.
    pub sample_size: usize,
    /// Pairs that could not be computed: (slug a, slug b, reason).
    /// Cells for these pairs hold 0.0 and must not be read as correlations.
    pub skipped: Vec<(String, String, String)>,
}

/// One entry of a ranked correlation listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub slug: String,
    pub coefficient: f64,
    pub sample_size: usize,
}

/// All zero-lag correlations against a single reference indicator.
///
/// Entries carry no implicit order; callers sort by magnitude, sign, or name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCorrelation {
    pub reference_slug: String,
    pub entries: Vec<RankedEntry>,
}

/// Severity band for an anomaly score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Elevated,
    Extreme,
}

impl Severity {
    /// Fixed banding: |z| >= 2 extreme, |z| >= 1 elevated.
    pub fn from_z(z: f64) -> Self {
        let a = z.abs();
        if a >= 2.0 {
            Severity::Extreme
        } else if a >= 1.0 {
            Severity::Elevated
        } else {
            Severity::Normal
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Severity::Normal => "Normal",
            Severity::Elevated => "Elevated",
            Severity::Extreme => "Extreme",
        }
    }
}

/// Latest-value anomaly of one indicator against its own history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyScore {
    pub slug: String,
    pub z_score: f64,
    /// Inclusive percentile rank in [0, 100].
    pub percentile: f64,
    pub severity: Severity,
}

/// Macro regime quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Goldilocks,
    Reflation,
    Stagflation,
    Recession,
}

impl Regime {
    /// Quadrant mapping with both thresholds inclusive on the >= 0 side.
    pub fn from_scores(growth: f64, inflation: f64) -> Self {
        match (growth >= 0.0, inflation >= 0.0) {
            (true, false) => Regime::Goldilocks,
            (true, true) => Regime::Reflation,
            (false, true) => Regime::Stagflation,
            (false, false) => Regime::Recession,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Regime::Goldilocks => "Goldilocks (Risk-On)",
            Regime::Reflation => "Reflation (Rotation)",
            Regime::Stagflation => "Stagflation (Risk-Off)",
            Regime::Recession => "Recession (Deflation)",
        }
    }
}

/// One checkpoint of the regime trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimePoint {
    pub date: NaiveDate,
    pub growth_score: f64,
    pub inflation_score: f64,
}

/// Static investment posture for a regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyProfile {
    pub key_theme: String,
    pub favorable_assets: Vec<String>,
    pub unfavorable_assets: Vec<String>,
    pub sectors_to_watch: Vec<String>,
}

/// Current regime classification with trajectory and strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub regime: Regime,
    pub growth_score: f64,
    pub inflation_score: f64,
    /// Monthly checkpoints, oldest first; the last one is the current score.
    pub historical_path: Vec<RegimePoint>,
    pub strategy: StrategyProfile,
}

/// Rolled-up label band for the composite risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    RiskOn,
    Caution,
    RiskOff,
}

impl RiskLabel {
    /// score < 30 risk-on, 30..60 caution, >= 60 risk-off.
    pub fn from_score(score: u8) -> Self {
        if score >= 60 {
            RiskLabel::RiskOff
        } else if score >= 30 {
            RiskLabel::Caution
        } else {
            RiskLabel::RiskOn
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RiskLabel::RiskOn => "Risk On",
            RiskLabel::Caution => "Caution",
            RiskLabel::RiskOff => "Risk Off",
        }
    }
}

/// One driver's contribution to the composite risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDriver {
    pub name: String,
    /// Raw observed value of the driver input.
    pub value: f64,
    /// Short signal label, e.g. "Inverted", "Panic".
    pub signal: String,
    /// Points contributed toward the 0-100 score (unrounded).
    pub contribution: f64,
}

/// Composite 0-100 risk score with explainable drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreResult {
    pub score: u8,
    pub label: RiskLabel,
    pub drivers: Vec<RiskDriver>,
    pub summary: String,
    /// Versioned severity model identifier.
    pub model_version: String,
}

/// One day of the recomputed risk score history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskScorePoint {
    pub date: NaiveDate,
    pub score: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn series_constructor_sorts_and_rejects_duplicates() {
        let pts = vec![
            DataPoint::new(d("2024-01-03"), 3.0),
            DataPoint::new(d("2024-01-01"), 1.0),
            DataPoint::new(d("2024-01-02"), 2.0),
        ];
        let s = IndicatorSeries::new("x", pts).unwrap();
        assert_eq!(s.points[0].date, d("2024-01-01"));
        assert_eq!(s.points[2].date, d("2024-01-03"));

        let dup = vec![
            DataPoint::new(d("2024-01-01"), 1.0),
            DataPoint::new(d("2024-01-01"), 2.0),
        ];
        assert!(matches!(
            IndicatorSeries::new("x", dup),
            Err(EngineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn latest_at_finds_most_recent_earlier_point() {
        let s = IndicatorSeries::new(
            "x",
            vec![
                DataPoint::new(d("2024-01-01"), 1.0),
                DataPoint::new(d("2024-02-01"), 2.0),
            ],
        )
        .unwrap();
        assert_eq!(s.latest_at(d("2024-01-15")).unwrap().value, 1.0);
        assert_eq!(s.latest_at(d("2024-02-01")).unwrap().value, 2.0);
        assert!(s.latest_at(d("2023-12-31")).is_none());
    }

    #[test]
    fn regime_quadrants_match_contract() {
        assert_eq!(Regime::from_scores(1.0, -1.0), Regime::Goldilocks);
        assert_eq!(Regime::from_scores(-1.0, 1.0), Regime::Stagflation);
        assert_eq!(Regime::from_scores(-1.0, -1.0), Regime::Recession);
        // Both thresholds inclusive on the >= 0 side.
        assert_eq!(Regime::from_scores(0.0, 0.0), Regime::Reflation);
    }

    #[test]
    fn severity_bands_are_fixed() {
        assert_eq!(Severity::from_z(0.99), Severity::Normal);
        assert_eq!(Severity::from_z(-1.0), Severity::Elevated);
        assert_eq!(Severity::from_z(2.0), Severity::Extreme);
        assert_eq!(Severity::from_z(-2.5), Severity::Extreme);
    }

    #[test]
    fn risk_label_bands() {
        assert_eq!(RiskLabel::from_score(0), RiskLabel::RiskOn);
        assert_eq!(RiskLabel::from_score(29), RiskLabel::RiskOn);
        assert_eq!(RiskLabel::from_score(30), RiskLabel::Caution);
        assert_eq!(RiskLabel::from_score(59), RiskLabel::Caution);
        assert_eq!(RiskLabel::from_score(60), RiskLabel::RiskOff);
    }
}
