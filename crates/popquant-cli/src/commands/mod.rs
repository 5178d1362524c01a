//! Subcommand implementations.

pub mod generate;
pub mod gini;
pub mod mobility;
pub mod stats;

use popquant_core::Statistic;

pub(crate) type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Parse `"0.5,0.9,0.99"` into explicit cut points. Ordering and range are
/// validated by the engine.
pub(crate) fn parse_cuts(raw: &str) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    raw.split(',')
        .map(|s| s.trim().parse::<f64>().map_err(Into::into))
        .collect()
}

/// Print one statistic as an aligned table.
pub(crate) fn print_statistic(stat: &Statistic) {
    println!("{} [{}] — {}", stat.key, stat.kind, stat.description);
    for (label, value) in stat.labels.iter().zip(&stat.values) {
        println!("  {label:>12}  {value:>14.6}");
    }
    println!();
}

/// Write statistic records to `path` as pretty JSON.
pub(crate) fn write_report(path: &str, stats: &[Statistic]) -> CliResult {
    let json = serde_json::to_string_pretty(stats)?;
    std::fs::write(path, json)?;
    println!("wrote {path}");
    Ok(())
}
