//! Series storage collaborators.
//!
//! The engine itself never performs I/O; it reads already-fetched snapshots
//! through the [`SeriesStore`] trait. This module provides the trait plus the
//! concrete stores used by the CLI and tests:
//!
//! - [`MemoryStore`]: in-memory snapshot
//! - [`csv::load_csv_dir`]: one `<slug>.csv` file per indicator
//! - [`sample::generate_sample`]: deterministic synthetic dataset (demo mode)

pub mod csv;
pub mod sample;
pub mod store;

pub use sample::generate_sample;
pub use store::{MemoryStore, SeriesStore};
