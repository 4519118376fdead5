//! Command-line parsing for the macro analytics engine.
//!
//! Argument parsing and command dispatch stay separate from the analysis
//! code: this module only defines the surface, `app` wires it to the engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Range;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "mlens",
    version,
    about = "Macro time-series analytics: correlations, anomalies, regimes, risk"
)]
pub struct Cli {
    /// Directory of per-indicator CSV files (`<slug>.csv` with `date,value` rows).
    #[arg(long, value_name = "DIR", global = true, conflicts_with = "demo")]
    pub data: Option<PathBuf>,

    /// Use the built-in deterministic demo dataset instead of CSV files.
    #[arg(long, global = true)]
    pub demo: bool,

    /// Random seed for the demo dataset.
    #[arg(long, global = true, default_value_t = 42)]
    pub seed: u64,

    /// Policy JSON overriding the built-in regime/risk tables.
    #[arg(long, value_name = "JSON", global = true)]
    pub policy: Option<PathBuf>,

    /// Export the result as pretty-printed JSON.
    #[arg(long, value_name = "PATH", global = true)]
    pub export: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands, one per engine operation.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Correlate two indicators, with an optional lead/lag shift.
    Correlate(CorrelateArgs),
    /// Scan a lag window for the strongest lead/lag relationship.
    Lag(LagArgs),
    /// Rolling correlation history over a sliding window.
    Rolling(RollingArgs),
    /// Pairwise correlation matrix over a set of indicators.
    Matrix(MatrixArgs),
    /// Rank every stored indicator by correlation against one reference.
    Rank(RankArgs),
    /// Anomaly heatmap: every indicator's latest value vs. its own history.
    Heatmap,
    /// Current growth/inflation regime with trajectory and strategy.
    Regime,
    /// Composite market risk score with per-driver contributions.
    Status,
    /// Recomputed daily risk score history.
    History(HistoryArgs),
    /// Forward-filled multi-indicator table on a shared date axis.
    Multi(MultiArgs),
}

#[derive(Debug, Parser)]
pub struct CorrelateArgs {
    /// First indicator (the leader when a lag is applied).
    pub a: String,
    /// Second indicator.
    pub b: String,

    /// Historical range, anchored at the newest stored observation.
    #[arg(short = 'r', long, value_enum, default_value_t = Range::Y5)]
    pub range: Range,

    /// Lag in days applied to the second indicator (positive = first leads).
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub lag: i64,
}

#[derive(Debug, Parser)]
pub struct LagArgs {
    /// Target indicator (tested as the leader at positive lags).
    pub target: String,
    /// Candidate indicator.
    pub indicator: String,

    #[arg(short = 'r', long, value_enum, default_value_t = Range::Y5)]
    pub range: Range,

    /// Scan lags in [-max-lag, +max-lag].
    #[arg(long, default_value_t = 30)]
    pub max_lag: i64,
}

#[derive(Debug, Parser)]
pub struct RollingArgs {
    pub a: String,
    pub b: String,

    /// Window size in aligned rows.
    #[arg(short = 'w', long, default_value_t = 90)]
    pub window: usize,
}

#[derive(Debug, Parser)]
pub struct MatrixArgs {
    /// Indicators to cross-correlate (at least two).
    #[arg(required = true, num_args = 2..)]
    pub slugs: Vec<String>,

    /// Shared range; omit to let each pair use its widest mutual overlap.
    #[arg(short = 'r', long, value_enum)]
    pub range: Option<Range>,
}

#[derive(Debug, Parser)]
pub struct RankArgs {
    /// Reference indicator.
    pub target: String,

    #[arg(short = 'r', long, value_enum, default_value_t = Range::Y5)]
    pub range: Range,
}

#[derive(Debug, Parser)]
pub struct HistoryArgs {
    /// Trailing days to recompute.
    #[arg(short = 'd', long, default_value_t = 90)]
    pub days: i64,
}

#[derive(Debug, Parser)]
pub struct MultiArgs {
    /// Indicators to align (at least one).
    #[arg(required = true, num_args = 1..)]
    pub slugs: Vec<String>,

    #[arg(short = 'r', long, value_enum, default_value_t = Range::Y1)]
    pub range: Range,
}
