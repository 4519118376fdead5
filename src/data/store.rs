//! The read-only series access interface and its in-memory implementation.

use std::collections::BTreeMap;

use crate::domain::IndicatorSeries;
use crate::error::EngineError;

/// Read-only access to named indicator series.
///
/// Implementations own persistence and refresh; the engine only reads. All
/// engine operations are pure functions over the snapshot a store returns.
pub trait SeriesStore {
    /// Full history for `slug`, sorted ascending by date.
    fn series(&self, slug: &str) -> Result<IndicatorSeries, EngineError>;

    /// Every known slug, sorted for deterministic iteration.
    fn slugs(&self) -> Vec<String>;
}

/// In-memory snapshot store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    series: BTreeMap<String, IndicatorSeries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: IndicatorSeries) {
        self.series.insert(series.slug.clone(), series);
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl SeriesStore for MemoryStore {
    fn series(&self, slug: &str) -> Result<IndicatorSeries, EngineError> {
        self.series
            .get(slug)
            .cloned()
            .ok_or_else(|| EngineError::UnknownIndicator(slug.to_string()))
    }

    fn slugs(&self) -> Vec<String> {
        self.series.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataPoint;

    #[test]
    fn memory_store_roundtrip_and_unknown_slug() {
        let mut store = MemoryStore::new();
        store.insert(
            IndicatorSeries::new(
                "vix",
                vec![DataPoint::new("2024-01-01".parse().unwrap(), 14.5)],
            )
            .unwrap(),
        );

        assert_eq!(store.slugs(), vec!["vix".to_string()]);
        assert_eq!(store.series("vix").unwrap().points[0].value, 14.5);
        assert!(matches!(
            store.series("spx"),
            Err(EngineError::UnknownIndicator(_))
        ));
    }
}
