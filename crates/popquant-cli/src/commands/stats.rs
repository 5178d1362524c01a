use std::path::Path;

use popquant_core::{CutSpec, bucket_matrix, gini_statistic, mean_statistic, share_statistic};

use super::{CliResult, parse_cuts, print_statistic, write_report};
use crate::input::PopulationFile;

pub struct StatsConfig<'a> {
    pub input: &'a str,
    pub buckets: usize,
    pub cuts: Option<&'a str>,
    pub key: &'a str,
    pub gini: bool,
    pub output: Option<&'a str>,
}

pub fn run(cfg: StatsConfig<'_>) -> CliResult {
    let population = PopulationFile::load(Path::new(cfg.input))?;
    let cut_spec = match cfg.cuts {
        Some(raw) => CutSpec::Thresholds(parse_cuts(raw)?),
        None => CutSpec::Count(cfg.buckets),
    };

    let buckets = bucket_matrix(population.values(), population.weights(), &cut_spec)?;
    if !buckets.skipped().is_empty() {
        println!(
            "note: {} degenerate bucket(s) skipped — statistics cover {} of {} buckets",
            buckets.skipped().len(),
            buckets.retained().len(),
            buckets.bucket_count()
        );
    }

    let mut report = vec![
        share_statistic(
            &buckets,
            population.values(),
            population.weights(),
            cfg.key,
            None,
        )?,
        mean_statistic(
            &buckets,
            population.values(),
            population.weights(),
            cfg.key,
            None,
        )?,
    ];
    if cfg.gini {
        report.push(gini_statistic(
            population.values(),
            population.weights(),
            cfg.key,
        )?);
    }

    println!(
        "{} agents, total weight {:.4}\n",
        population.len(),
        population.total_weight()
    );
    for stat in &report {
        print_statistic(stat);
    }
    if let Some(path) = cfg.output {
        write_report(path, &report)?;
    }
    Ok(())
}
