//! Immutable policy tables.
//!
//! Regime baskets, regime strategies, and the risk model live here as plain
//! data rather than branching scattered through the classifiers. Defaults
//! match the documented contract; a JSON file with the same shape can
//! override them at startup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Regime, StrategyProfile};

/// Everything configurable about the engine's classifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub regime: RegimePolicy,
    pub risk: RiskPolicy,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            regime: RegimePolicy::default(),
            risk: RiskPolicy::default(),
        }
    }
}

/// Baskets and strategy table for the regime classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimePolicy {
    /// Indicators whose z-scores average into the growth composite.
    pub growth: Vec<String>,
    /// Indicators whose z-scores average into the inflation composite.
    pub inflation: Vec<String>,
    /// Trailing window for per-indicator baselines, in days.
    pub baseline_days: i64,
    /// Checkpoint count for the historical path (current + N-1 months back).
    pub path_points: usize,
    pub strategies: HashMap<Regime, StrategyProfile>,
}

impl Default for RegimePolicy {
    fn default() -> Self {
        let strategies = HashMap::from([
            (
                Regime::Goldilocks,
                strategy(
                    "Maximum Risk On",
                    &["Equities (Tech, Growth)", "Corporate Bonds", "Real Estate"],
                    &["Cash", "Gold (Defensive)"],
                    &["Technology", "Discretionary"],
                ),
            ),
            (
                Regime::Reflation,
                strategy(
                    "Inflation Hedge",
                    &["Commodities", "Value Stocks", "TIPS"],
                    &["Long-term Bonds", "High-PE Growth"],
                    &["Energy", "Materials", "Financials"],
                ),
            ),
            (
                Regime::Stagflation,
                strategy(
                    "Preservation",
                    &["Gold", "Cash", "Commodities"],
                    &["Equities", "Bonds"],
                    &["Energy", "Defensive Havens"],
                ),
            ),
            (
                Regime::Recession,
                strategy(
                    "Duration Play",
                    &["Govt Bonds (Long Duration)", "Gold", "Defensive Stocks"],
                    &["Commodities", "Cyclical Stocks"],
                    &["Utilities", "Staples", "Healthcare"],
                ),
            ),
        ]);

        Self {
            growth: vec![
                "gdp_growth".into(),
                "industrial_prod".into(),
                "retail_sales".into(),
                "capacity_util".into(),
            ],
            inflation: vec!["cpi".into(), "ppi".into(), "pce".into()],
            baseline_days: 365 * 5,
            path_points: 7,
            strategies,
        }
    }
}

impl RegimePolicy {
    pub fn strategy_for(&self, regime: Regime) -> StrategyProfile {
        self.strategies
            .get(&regime)
            .cloned()
            .unwrap_or_else(|| strategy("Unspecified", &[], &[], &[]))
    }
}

fn strategy(theme: &str, favorable: &[&str], unfavorable: &[&str], sectors: &[&str]) -> StrategyProfile {
    StrategyProfile {
        key_theme: theme.to_string(),
        favorable_assets: favorable.iter().map(|s| s.to_string()).collect(),
        unfavorable_assets: unfavorable.iter().map(|s| s.to_string()).collect(),
        sectors_to_watch: sectors.iter().map(|s| s.to_string()).collect(),
    }
}

/// Linear severity ramp between two breakpoints.
///
/// Works in either direction: when `one_at < zero_at`, severity rises as the
/// input falls (e.g. yield-curve inversion).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ramp {
    pub zero_at: f64,
    pub one_at: f64,
}

impl Ramp {
    pub fn severity(&self, x: f64) -> f64 {
        if !x.is_finite() || self.one_at == self.zero_at {
            return 0.0;
        }
        ((x - self.zero_at) / (self.one_at - self.zero_at)).clamp(0.0, 1.0)
    }
}

/// One risk driver's input slug, weight, and severity curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSpec {
    pub slug: String,
    pub name: String,
    /// Fraction of the 0-100 scale this driver can contribute at full severity.
    pub weight: f64,
    pub curve: Ramp,
}

/// The versioned four-driver risk model.
///
/// Weights and breakpoints are a documented contract; any recalibration must
/// bump `model_version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    pub model_version: String,
    pub yield_curve: DriverSpec,
    pub vix: DriverSpec,
    /// Input is relative distance from the 200-day moving average
    /// (`price / sma - 1`), not the raw price.
    pub momentum: DriverSpec,
    pub valuation: DriverSpec,
    pub momentum_sma_days: usize,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            model_version: "risk-v1".to_string(),
            yield_curve: DriverSpec {
                slug: "yield_curve_10y_2y".into(),
                name: "Yield Curve (10Y-2Y)".into(),
                weight: 0.40,
                curve: Ramp { zero_at: 0.2, one_at: -0.5 },
            },
            vix: DriverSpec {
                slug: "vix".into(),
                name: "VIX (Fear Index)".into(),
                weight: 0.30,
                curve: Ramp { zero_at: 15.0, one_at: 30.0 },
            },
            momentum: DriverSpec {
                slug: "spx".into(),
                name: "S&P 500 Momentum".into(),
                weight: 0.30,
                curve: Ramp { zero_at: 0.0, one_at: -0.10 },
            },
            valuation: DriverSpec {
                slug: "buffett_indicator".into(),
                name: "Buffett Indicator".into(),
                weight: 0.20,
                curve: Ramp { zero_at: 140.0, one_at: 180.0 },
            },
            momentum_sma_days: 200,
        }
    }
}

impl RiskPolicy {
    pub fn drivers(&self) -> [&DriverSpec; 4] {
        [&self.yield_curve, &self.vix, &self.momentum, &self.valuation]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_rises_in_both_directions() {
        let falling = Ramp { zero_at: 0.2, one_at: -0.5 };
        assert_eq!(falling.severity(0.5), 0.0);
        assert_eq!(falling.severity(-0.5), 1.0);
        assert_eq!(falling.severity(-1.0), 1.0);
        assert!((falling.severity(-0.15) - 0.5).abs() < 1e-12);

        let rising = Ramp { zero_at: 15.0, one_at: 30.0 };
        assert_eq!(rising.severity(10.0), 0.0);
        assert_eq!(rising.severity(30.0), 1.0);
        assert!((rising.severity(22.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn default_policy_is_the_documented_contract() {
        let policy = Policy::default();
        assert_eq!(policy.regime.growth.len(), 4);
        assert_eq!(policy.regime.inflation.len(), 3);
        assert_eq!(policy.risk.model_version, "risk-v1");

        let weights: f64 = policy.risk.drivers().iter().map(|d| d.weight).sum();
        // Weights deliberately sum past 1.0; the composite clamps at 100.
        assert!((weights - 1.2).abs() < 1e-12);
        assert!(policy.regime.strategies.contains_key(&Regime::Goldilocks));
    }
}
