//! CSV directory ingestion.
//!
//! One `<slug>.csv` per indicator, rows of `date,value` with an optional
//! header. Dates are ISO (`YYYY-MM-DD`). Rows with an empty or `.` value
//! cell are skipped (FRED exports use `.` for missing observations).

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::data::store::MemoryStore;
use crate::domain::{DataPoint, IndicatorSeries};
use crate::error::AppError;

/// Load every `*.csv` in `dir` into a memory store.
pub fn load_csv_dir(dir: &Path) -> Result<MemoryStore, AppError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::new(2, format!("Failed to read data dir '{}': {e}", dir.display())))?;

    let mut store = MemoryStore::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| AppError::new(2, format!("Failed to read data dir entry: {e}")))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let series = load_csv_file(&path, slug)?;
        log::debug!("loaded {} points for '{}'", series.len(), slug);
        store.insert(series);
    }

    if store.is_empty() {
        return Err(AppError::new(
            2,
            format!("No CSV series found in '{}'.", dir.display()),
        ));
    }
    Ok(store)
}

fn load_csv_file(path: &Path, slug: &str) -> Result<IndicatorSeries, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read '{}': {e}", path.display())))?;

    let mut points = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut cells = line.splitn(2, ',');
        let date_cell = cells.next().unwrap_or("").trim();
        let value_cell = cells.next().unwrap_or("").trim();

        let Ok(date) = date_cell.parse::<NaiveDate>() else {
            // Tolerate a single header row; anything else is a data error.
            if lineno == 0 {
                continue;
            }
            return Err(AppError::new(
                2,
                format!("'{}' line {}: invalid date '{date_cell}'", path.display(), lineno + 1),
            ));
        };

        if value_cell.is_empty() || value_cell == "." {
            continue;
        }
        let value: f64 = value_cell.parse().map_err(|_| {
            AppError::new(
                2,
                format!("'{}' line {}: invalid value '{value_cell}'", path.display(), lineno + 1),
            )
        })?;
        points.push(DataPoint::new(date, value));
    }

    IndicatorSeries::new(slug, points).map_err(AppError::from)
}
