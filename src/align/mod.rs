//! Series alignment onto a common date axis.
//!
//! Heterogeneous release cadences (daily market data vs. monthly or quarterly
//! macro prints) make naive equality-joins under-count samples badly. The
//! aligner therefore builds the **union** of all observation dates and
//! forward-fills each series: at every axis date a series contributes its
//! exact value if one exists, otherwise the most recent earlier value. Cells
//! with no earlier value stay missing (absent, never zero).
//!
//! Correlation paths that need a strict intersection drop rows with any
//! missing cell afterwards via [`paired`].

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::{AlignedColumn, AlignedTable, IndicatorSeries};
use crate::error::EngineError;

/// Align `series` onto the union of their dates within optional bounds.
///
/// Forward-fill carries values observed *before* `from` into the window, so a
/// quarterly print released just before the window still backs the first rows.
pub fn align(
    series: &[&IndicatorSeries],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> AlignedTable {
    let mut axis: BTreeSet<NaiveDate> = BTreeSet::new();
    for s in series {
        for p in &s.points {
            if from.is_some_and(|f| p.date < f) {
                continue;
            }
            if to.is_some_and(|t| p.date > t) {
                continue;
            }
            axis.insert(p.date);
        }
    }
    let dates: Vec<NaiveDate> = axis.into_iter().collect();

    let columns = series
        .iter()
        .map(|s| fill_column(s, &dates, from))
        .collect();

    AlignedTable { dates, columns }
}

fn fill_column(series: &IndicatorSeries, dates: &[NaiveDate], from: Option<NaiveDate>) -> AlignedColumn {
    let mut values = Vec::with_capacity(dates.len());
    let mut filled = false;

    // Seed the carry with the last observation before the window, if any.
    let mut carry: Option<f64> = from.and_then(|f| {
        series
            .points
            .iter()
            .rev()
            .find(|p| p.date < f)
            .map(|p| p.value)
    });

    let mut cursor = series.points.iter().peekable();
    // Skip pre-window points; they were folded into the carry above.
    if let Some(f) = from {
        while cursor.next_if(|p| p.date < f).is_some() {}
    }

    for &date in dates {
        // Consume observations up to the axis date, updating the carry.
        let mut exact = None;
        while let Some(p) = cursor.next_if(|p| p.date <= date) {
            carry = Some(p.value);
            if p.date == date {
                exact = Some(p.value);
            }
        }

        match (exact, carry) {
            (Some(v), _) => values.push(Some(v)),
            (None, Some(v)) => {
                filled = true;
                values.push(Some(v));
            }
            (None, None) => values.push(None),
        }
    }

    AlignedColumn {
        slug: series.slug.clone(),
        values,
        filled,
    }
}

/// Strict-intersection rows for two columns of an aligned table.
///
/// Rows where either column is missing are dropped; the returned length is
/// the `sample_size` reported by correlation results.
pub fn paired(
    table: &AlignedTable,
    a_slug: &str,
    b_slug: &str,
) -> Result<Vec<(NaiveDate, f64, f64)>, EngineError> {
    let a = table
        .column(a_slug)
        .ok_or_else(|| EngineError::UnknownIndicator(a_slug.to_string()))?;
    let b = table
        .column(b_slug)
        .ok_or_else(|| EngineError::UnknownIndicator(b_slug.to_string()))?;

    Ok(table
        .dates
        .iter()
        .zip(a.values.iter().zip(b.values.iter()))
        .filter_map(|(&date, (va, vb))| match (va, vb) {
            (Some(a), Some(b)) => Some((date, *a, *b)),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataPoint;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn series(slug: &str, points: &[(&str, f64)]) -> IndicatorSeries {
        IndicatorSeries::new(
            slug,
            points
                .iter()
                .map(|(date, value)| DataPoint::new(d(date), *value))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn union_axis_with_forward_fill() {
        let daily = series(
            "daily",
            &[
                ("2024-01-01", 10.0),
                ("2024-01-02", 11.0),
                ("2024-01-03", 12.0),
                ("2024-01-04", 13.0),
            ],
        );
        let monthly = series("monthly", &[("2024-01-02", 100.0)]);

        let table = align(&[&daily, &monthly], None, None);
        assert_eq!(table.dates.len(), 4);

        let daily_col = table.column("daily").unwrap();
        assert!(!daily_col.filled);
        assert_eq!(daily_col.values, vec![Some(10.0), Some(11.0), Some(12.0), Some(13.0)]);

        let monthly_col = table.column("monthly").unwrap();
        assert!(monthly_col.filled);
        // Missing before the first print, carried after it.
        assert_eq!(
            monthly_col.values,
            vec![None, Some(100.0), Some(100.0), Some(100.0)]
        );
    }

    #[test]
    fn carry_crosses_the_lower_bound() {
        let slow = series("slow", &[("2023-12-15", 5.0)]);
        let fast = series("fast", &[("2024-01-10", 1.0), ("2024-01-11", 2.0)]);

        let table = align(&[&slow, &fast], Some(d("2024-01-01")), None);
        let slow_col = table.column("slow").unwrap();
        // The December print backs every January row.
        assert_eq!(slow_col.values, vec![Some(5.0), Some(5.0)]);
        assert!(slow_col.filled);
    }

    #[test]
    fn paired_drops_missing_rows() {
        let a = series("a", &[("2024-01-02", 1.0), ("2024-01-03", 2.0)]);
        let b = series("b", &[("2024-01-01", 9.0), ("2024-01-03", 8.0)]);

        let table = align(&[&a, &b], None, None);
        let rows = paired(&table, "a", "b").unwrap();
        // 2024-01-01 has no `a` value; the other two rows survive (b filled on the 2nd).
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], (d("2024-01-02"), 1.0, 9.0));
        assert_eq!(rows[1], (d("2024-01-03"), 2.0, 8.0));
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let table = align(&[], None, None);
        assert!(table.is_empty());

        let empty = IndicatorSeries::new("nil", vec![]).unwrap();
        let table = align(&[&empty], None, None);
        assert!(table.dates.is_empty());
        assert!(!table.columns[0].filled);
    }

    #[test]
    fn forward_fill_is_idempotent() {
        let a = series("a", &[("2024-01-01", 1.0), ("2024-01-05", 2.0)]);
        let b = series(
            "b",
            &[("2024-01-01", 3.0), ("2024-01-03", 4.0), ("2024-01-05", 5.0)],
        );

        let first = align(&[&a, &b], None, None);

        // Rebuild series from the aligned table and align again: nothing changes.
        let rebuilt: Vec<IndicatorSeries> = first
            .columns
            .iter()
            .map(|col| {
                IndicatorSeries::new(
                    col.slug.clone(),
                    first
                        .dates
                        .iter()
                        .zip(col.values.iter())
                        .filter_map(|(&date, v)| v.map(|value| DataPoint::new(date, value)))
                        .collect(),
                )
                .unwrap()
            })
            .collect();
        let refs: Vec<&IndicatorSeries> = rebuilt.iter().collect();
        let second = align(&refs, None, None);

        assert_eq!(first.dates, second.dates);
        for (c1, c2) in first.columns.iter().zip(second.columns.iter()) {
            assert_eq!(c1.values, c2.values);
        }
    }

    #[test]
    fn monthly_against_daily_marks_filled_over_full_axis() {
        // A year of daily data against 12 monthly prints.
        let mut daily_points = Vec::new();
        let mut day = d("2024-01-01");
        for i in 0..365 {
            daily_points.push((day, 100.0 + i as f64));
            day = day.succ_opt().unwrap();
        }
        let daily = IndicatorSeries::new(
            "daily",
            daily_points
                .iter()
                .map(|(date, v)| DataPoint::new(*date, *v))
                .collect(),
        )
        .unwrap();

        let monthly = IndicatorSeries::new(
            "monthly",
            (1..=12)
                .map(|m| DataPoint::new(NaiveDate::from_ymd_opt(2024, m, 1).unwrap(), m as f64))
                .collect(),
        )
        .unwrap();

        let table = align(&[&daily, &monthly], None, None);
        assert_eq!(table.dates.len(), 365);
        let monthly_col = table.column("monthly").unwrap();
        assert!(monthly_col.filled);
        assert!(monthly_col.values.iter().all(|v| v.is_some()));
    }
}
