//! Numeric primitives: mean, stddev, Pearson correlation, ranks.

pub mod stats;

pub use stats::*;
