//! Analysis engine.
//!
//! [`Engine`] is the command surface: it owns a [`SeriesStore`] snapshot and
//! a [`Policy`], resolves slugs and ranges, and delegates to the analysis
//! modules. All lookback ranges anchor at the newest observation in the
//! store rather than the wall clock, so a fixed snapshot always produces the
//! same numbers.

pub mod anomaly;
pub mod correlation;
pub mod policy;
pub mod regime;
pub mod risk;

pub use policy::Policy;

use chrono::{Duration, NaiveDate};

use crate::data::SeriesStore;
use crate::domain::{
    AlignedTable, AnomalyScore, CorrelationMatrix, CorrelationResult, IndicatorSeries, LagScan,
    Range, RankedCorrelation, RegimeResult, RiskScorePoint, RiskScoreResult, RollingPoint,
};
use crate::align;
use crate::error::EngineError;

pub struct Engine<S: SeriesStore> {
    store: S,
    policy: Policy,
}

impl<S: SeriesStore> Engine<S> {
    pub fn new(store: S, policy: Policy) -> Self {
        Self { store, policy }
    }

    pub fn with_defaults(store: S) -> Self {
        Self::new(store, Policy::default())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Newest observation date across the whole store.
    pub fn latest_date(&self) -> Result<NaiveDate, EngineError> {
        self.store
            .slugs()
            .iter()
            .filter_map(|slug| self.store.series(slug).ok())
            .filter_map(|s| s.latest())
            .map(|p| p.date)
            .max()
            .ok_or(EngineError::InsufficientData {
                required: 1,
                actual: 0,
            })
    }

    /// Lower bound for a range, anchored at the store's newest date.
    fn range_start(&self, range: Range) -> Result<Option<NaiveDate>, EngineError> {
        match range.days() {
            None => Ok(None),
            Some(days) => Ok(Some(self.latest_date()? - Duration::days(days))),
        }
    }

    pub fn correlate(
        &self,
        a: &str,
        b: &str,
        range: Range,
        lag_days: i64,
    ) -> Result<CorrelationResult, EngineError> {
        let from = self.range_start(range)?;
        let a = self.store.series(a)?;
        let b = self.store.series(b)?;
        correlation::correlate(&a, &b, from, lag_days)
    }

    pub fn find_optimal_lag(
        &self,
        target: &str,
        indicator: &str,
        range: Range,
        max_lag: i64,
    ) -> Result<LagScan, EngineError> {
        let from = self.range_start(range)?;
        let target = self.store.series(target)?;
        let indicator = self.store.series(indicator)?;
        correlation::find_optimal_lag(&target, &indicator, from, max_lag)
    }

    pub fn rolling_correlation(
        &self,
        a: &str,
        b: &str,
        window: usize,
    ) -> Result<Vec<RollingPoint>, EngineError> {
        let a = self.store.series(a)?;
        let b = self.store.series(b)?;
        correlation::rolling(&a, &b, window)
    }

    /// Correlation grid over the named indicators.
    ///
    /// `range = None` lets each pair use its widest mutual overlap.
    pub fn correlation_matrix(
        &self,
        slugs: &[String],
        range: Option<Range>,
    ) -> Result<CorrelationMatrix, EngineError> {
        if slugs.len() < 2 {
            return Err(EngineError::InvalidParameter(format!(
                "matrix requires at least 2 indicators (got {})",
                slugs.len()
            )));
        }
        let from = match range {
            None => None,
            Some(r) => self.range_start(r)?,
        };
        let series: Vec<IndicatorSeries> = slugs
            .iter()
            .map(|slug| self.store.series(slug))
            .collect::<Result<_, _>>()?;
        Ok(correlation::matrix(&series, from))
    }

    pub fn ranked_correlations(
        &self,
        target: &str,
        range: Range,
    ) -> Result<RankedCorrelation, EngineError> {
        let from = self.range_start(range)?;
        let target = self.store.series(target)?;
        let candidates: Vec<IndicatorSeries> = self
            .store
            .slugs()
            .iter()
            .filter_map(|slug| self.store.series(slug).ok())
            .collect();
        Ok(correlation::ranked(&target, &candidates, from))
    }

    pub fn macro_heatmap(&self) -> Result<Vec<AnomalyScore>, EngineError> {
        let items = anomaly::heatmap(&self.store);
        if items.is_empty() && self.store.slugs().is_empty() {
            return Err(EngineError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        Ok(items)
    }

    pub fn market_regime(&self) -> Result<RegimeResult, EngineError> {
        let anchor = self.latest_date()?;
        regime::classify(&self.store, &self.policy.regime, anchor)
    }

    pub fn market_status(&self) -> Result<RiskScoreResult, EngineError> {
        risk::status(&self.store, &self.policy.risk)
    }

    pub fn risk_score_history(&self, days: i64) -> Result<Vec<RiskScorePoint>, EngineError> {
        let anchor = self.latest_date()?;
        risk::history(&self.store, &self.policy.risk, days, anchor)
    }

    /// Forward-filled multi-series table over a shared date axis.
    pub fn multi_series(
        &self,
        slugs: &[String],
        range: Range,
    ) -> Result<AlignedTable, EngineError> {
        if slugs.is_empty() {
            return Err(EngineError::InvalidParameter(
                "multi requires at least one indicator".to_string(),
            ));
        }
        let from = self.range_start(range)?;
        let series: Vec<IndicatorSeries> = slugs
            .iter()
            .map(|slug| self.store.series(slug))
            .collect::<Result<_, _>>()?;
        let refs: Vec<&IndicatorSeries> = series.iter().collect();
        Ok(align::align(&refs, from, None))
    }
}
