//! File input/output.
//!
//! - JSON export of any result type (portable result files)
//! - policy JSON loading (regime/risk table overrides)

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::engine::Policy;
use crate::error::AppError;

/// Write any serializable result as pretty-printed JSON.
pub fn export_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::new(2, format!("Failed to write JSON: {e}")))?;
    Ok(())
}

/// Load a policy override file. Missing fields fall back to the defaults.
pub fn read_policy(path: &Path) -> Result<Policy, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open policy '{}': {e}", path.display())))?;
    let policy: Policy = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid policy JSON: {e}")))?;
    Ok(policy)
}
