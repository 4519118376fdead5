//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - input series types (`DataPoint`, `IndicatorSeries`)
//! - the range vocabulary (`Range`)
//! - result value objects (`CorrelationResult`, `RegimeResult`, ...)

pub mod types;

pub use types::*;
