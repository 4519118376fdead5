//! Formatted terminal output for every result type.
//!
//! Formatting lives in one place so the analysis code stays clean and output
//! changes are localized. Presentation-only choices (sort order of rankings,
//! column widths) belong here, not in the engine.

use crate::domain::{
    AlignedTable, AnomalyScore, CorrelationMatrix, CorrelationResult, LagScan, RankedCorrelation,
    RegimeResult, RiskScorePoint, RiskScoreResult, RollingPoint,
};

pub fn format_correlation(a: &str, b: &str, r: &CorrelationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Correlation: {a} vs {b} ===\n"));
    out.push_str(&format!(
        "Coefficient : {:+.4} (lag {} days, n={})\n",
        r.coefficient, r.lag_days, r.sample_size
    ));
    out.push_str(&format!("Recent trend: {:+.4}\n", r.recent_trend));
    out.push_str(&format!("Vol ratio   : {:.4}\n", r.volatility_ratio));
    out.push_str(&format!("Divergence  : {:+.2} sigma\n", r.divergence_sigma));
    out
}

pub fn format_lag_scan(target: &str, indicator: &str, scan: &LagScan) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Lag scan: {target} -> {indicator} ===\n"));
    out.push_str(&format!(
        "Optimal lag : {} days ({} leads)\n",
        scan.optimal_lag,
        if scan.optimal_lag >= 0 { target } else { indicator }
    ));
    out.push_str(&format!(
        "Coefficient : {:+.4} (|r| = {:.4})\n",
        scan.coefficient_at_optimum, scan.max_abs_coefficient
    ));
    out
}

pub fn format_rolling(a: &str, b: &str, points: &[RollingPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Rolling correlation: {a} vs {b} ===\n"));
    if points.is_empty() {
        out.push_str("(not enough overlapping history for a single window)\n");
        return out;
    }
    for p in points {
        out.push_str(&format!("{}  {:+.4}\n", p.date, p.coefficient));
    }
    out
}

pub fn format_matrix(m: &CorrelationMatrix) -> String {
    let width = m
        .labels
        .iter()
        .map(|l| l.len())
        .max()
        .unwrap_or(0)
        .max(8);

    let mut out = String::new();
    out.push_str(&format!("=== Correlation matrix (n={}) ===\n", m.sample_size));
    out.push_str(&format!("{:width$}", ""));
    for label in &m.labels {
        out.push_str(&format!(" {label:>width$}"));
    }
    out.push('\n');
    for (i, label) in m.labels.iter().enumerate() {
        out.push_str(&format!("{label:width$}"));
        for value in &m.matrix[i] {
            out.push_str(&format!(" {value:>width$.3}"));
        }
        out.push('\n');
    }
    for (a, b, reason) in &m.skipped {
        out.push_str(&format!("(skipped {a}/{b}) {reason}\n"));
    }
    out
}

/// Ranked listing, strongest |coefficient| first. The sort is presentation
/// order only; the engine result carries no implicit order.
pub fn format_ranked(ranked: &RankedCorrelation) -> String {
    let mut entries = ranked.entries.clone();
    entries.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));

    let mut out = String::new();
    out.push_str(&format!(
        "=== Correlations against {} ===\n",
        ranked.reference_slug
    ));
    for e in &entries {
        out.push_str(&format!(
            "{:<24} {:+.4} (n={})\n",
            e.slug, e.coefficient, e.sample_size
        ));
    }
    out
}

pub fn format_heatmap(items: &[AnomalyScore]) -> String {
    let mut out = String::new();
    out.push_str("=== Anomaly heatmap (5y baseline) ===\n");
    for item in items {
        out.push_str(&format!(
            "{:<24} z={:+.2}  pct={:5.1}  {}\n",
            item.slug,
            item.z_score,
            item.percentile,
            item.severity.display_name()
        ));
    }
    out
}

pub fn format_regime(r: &RegimeResult) -> String {
    let mut out = String::new();
    out.push_str("=== Market regime ===\n");
    out.push_str(&format!("Regime   : {}\n", r.regime.display_name()));
    out.push_str(&format!(
        "Scores   : growth {:+.2} | inflation {:+.2}\n",
        r.growth_score, r.inflation_score
    ));
    out.push_str(&format!("Strategy : {}\n", r.strategy.key_theme));
    out.push_str(&format!(
        "Favor    : {}\n",
        r.strategy.favorable_assets.join(", ")
    ));
    out.push_str(&format!(
        "Avoid    : {}\n",
        r.strategy.unfavorable_assets.join(", ")
    ));
    out.push_str(&format!(
        "Sectors  : {}\n",
        r.strategy.sectors_to_watch.join(", ")
    ));
    out.push_str("\nTrajectory (oldest first):\n");
    for p in &r.historical_path {
        out.push_str(&format!(
            "{}  g={:+.2} i={:+.2}\n",
            p.date, p.growth_score, p.inflation_score
        ));
    }
    out
}

pub fn format_status(r: &RiskScoreResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Market risk ({}) ===\n", r.model_version));
    out.push_str(&format!(
        "Score : {} / 100 ({})\n",
        r.score,
        r.label.display_name()
    ));
    out.push_str("Drivers:\n");
    for d in &r.drivers {
        out.push_str(&format!(
            "  {:<24} {:>10.2}  {:<16} +{:.1}\n",
            d.name, d.value, d.signal, d.contribution
        ));
    }
    out.push_str(&format!("\n{}\n", r.summary));
    out
}

pub fn format_history(points: &[RiskScorePoint]) -> String {
    let mut out = String::new();
    out.push_str("=== Risk score history ===\n");
    for p in points {
        out.push_str(&format!("{}  {:>3}\n", p.date, p.score));
    }
    out
}

pub fn format_table(table: &AlignedTable) -> String {
    let mut out = String::new();
    out.push_str("=== Aligned series ===\n");
    out.push_str("date      ");
    for c in &table.columns {
        let marker = if c.filled { "*" } else { "" };
        out.push_str(&format!(" {:>14}", format!("{}{marker}", c.slug)));
    }
    out.push('\n');
    for (i, date) in table.dates.iter().enumerate() {
        out.push_str(&format!("{date}"));
        for c in &table.columns {
            match c.values[i] {
                Some(v) => out.push_str(&format!(" {v:>14.4}")),
                None => out.push_str(&format!(" {:>14}", "-")),
            }
        }
        out.push('\n');
    }
    if table.columns.iter().any(|c| c.filled) {
        out.push_str("(* column contains forward-filled values)\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RankedEntry;

    #[test]
    fn ranked_output_is_sorted_by_magnitude() {
        let ranked = RankedCorrelation {
            reference_slug: "spx".to_string(),
            entries: vec![
                RankedEntry {
                    slug: "weak".to_string(),
                    coefficient: 0.1,
                    sample_size: 50,
                },
                RankedEntry {
                    slug: "strong_negative".to_string(),
                    coefficient: -0.9,
                    sample_size: 50,
                },
                RankedEntry {
                    slug: "moderate".to_string(),
                    coefficient: 0.5,
                    sample_size: 50,
                },
            ],
        };

        let out = format_ranked(&ranked);
        let neg = out.find("strong_negative").unwrap();
        let mid = out.find("moderate").unwrap();
        let weak = out.find("weak").unwrap();
        assert!(neg < mid && mid < weak);
    }

    #[test]
    fn status_output_names_score_and_drivers() {
        use crate::domain::{RiskDriver, RiskLabel};
        let r = RiskScoreResult {
            score: 70,
            label: RiskLabel::RiskOff,
            drivers: vec![RiskDriver {
                name: "VIX (Fear Index)".to_string(),
                value: 42.0,
                signal: "Panic".to_string(),
                contribution: 30.0,
            }],
            summary: "Risk score 70 (Risk Off). Key driver: VIX (Fear Index).".to_string(),
            model_version: "risk-v1".to_string(),
        };
        let out = format_status(&r);
        assert!(out.contains("70 / 100 (Risk Off)"));
        assert!(out.contains("Panic"));
        assert!(out.contains("risk-v1"));
    }
}
