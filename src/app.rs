//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - builds the series store (CSV directory or demo dataset)
//! - runs the requested engine operation
//! - prints the report and writes the optional JSON export

use clap::Parser;
use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::data::{self, MemoryStore};
use crate::engine::{Engine, Policy};
use crate::error::AppError;
use crate::{io, report};

/// Entry point for the `mlens` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let store = build_store(&cli)?;
    let policy = match &cli.policy {
        Some(path) => io::read_policy(path)?,
        None => Policy::default(),
    };
    let engine = Engine::new(store, policy);

    match &cli.command {
        Command::Correlate(args) => {
            let result = engine.correlate(&args.a, &args.b, args.range, args.lag)?;
            finish(&cli, &result, report::format_correlation(&args.a, &args.b, &result))
        }
        Command::Lag(args) => {
            let result =
                engine.find_optimal_lag(&args.target, &args.indicator, args.range, args.max_lag)?;
            finish(&cli, &result, report::format_lag_scan(&args.target, &args.indicator, &result))
        }
        Command::Rolling(args) => {
            let result = engine.rolling_correlation(&args.a, &args.b, args.window)?;
            finish(&cli, &result, report::format_rolling(&args.a, &args.b, &result))
        }
        Command::Matrix(args) => {
            let result = engine.correlation_matrix(&args.slugs, args.range)?;
            finish(&cli, &result, report::format_matrix(&result))
        }
        Command::Rank(args) => {
            let result = engine.ranked_correlations(&args.target, args.range)?;
            finish(&cli, &result, report::format_ranked(&result))
        }
        Command::Heatmap => {
            let result = engine.macro_heatmap()?;
            finish(&cli, &result, report::format_heatmap(&result))
        }
        Command::Regime => {
            let result = engine.market_regime()?;
            finish(&cli, &result, report::format_regime(&result))
        }
        Command::Status => {
            let result = engine.market_status()?;
            finish(&cli, &result, report::format_status(&result))
        }
        Command::History(args) => {
            let result = engine.risk_score_history(args.days)?;
            finish(&cli, &result, report::format_history(&result))
        }
        Command::Multi(args) => {
            let result = engine.multi_series(&args.slugs, args.range)?;
            finish(&cli, &result, report::format_table(&result))
        }
    }
}

fn build_store(cli: &Cli) -> Result<MemoryStore, AppError> {
    if let Some(dir) = &cli.data {
        data::csv::load_csv_dir(dir)
    } else if cli.demo {
        data::generate_sample(cli.seed)
    } else {
        Err(AppError::new(
            2,
            "No data source. Provide --data <dir> with CSV series, or --demo.",
        ))
    }
}

/// Print the rendered report and write the optional JSON export.
fn finish<T: Serialize>(cli: &Cli, result: &T, rendered: String) -> Result<(), AppError> {
    if let Some(path) = &cli.export {
        io::export_json(path, result)?;
        log::info!("exported result to {}", path.display());
    }
    print!("{rendered}");
    Ok(())
}
