use std::path::Path;

use popquant_core::{CutSpec, bucket_matrix, future_distribution, future_probabilities};

use super::{CliResult, print_statistic, write_report};
use crate::input::{PopulationFile, TransitionsFile};

pub struct MobilityConfig<'a> {
    pub input: &'a str,
    pub transitions: &'a str,
    pub buckets: usize,
    pub from_bucket: usize,
    pub horizon: usize,
    pub probabilities: bool,
    pub key: &'a str,
    pub output: Option<&'a str>,
}

pub fn run(cfg: MobilityConfig<'_>) -> CliResult {
    let population = PopulationFile::load(Path::new(cfg.input))?;
    let transitions = TransitionsFile::load(Path::new(cfg.transitions))?;

    let buckets = bucket_matrix(
        population.values(),
        population.weights(),
        &CutSpec::Count(cfg.buckets),
    )?;
    if cfg.from_bucket >= buckets.bucket_count() {
        return Err(format!(
            "starting bucket {} out of range: the partition has {} buckets",
            cfg.from_bucket,
            buckets.bucket_count()
        )
        .into());
    }

    // Condition on membership in the chosen starting bucket.
    let subgroup = buckets.membership_row(cfg.from_bucket);
    let label = buckets.percentile_labels(population.weights())?[cfg.from_bucket].clone();

    let stat = if cfg.probabilities {
        future_probabilities(
            &subgroup,
            &transitions,
            cfg.horizon,
            &buckets,
            cfg.key,
            &label,
        )?
    } else {
        future_distribution(
            &subgroup,
            &transitions,
            cfg.horizon,
            &buckets,
            cfg.key,
            &label,
        )?
    };

    println!(
        "starting bucket {} ({label}), horizon {} period(s)\n",
        cfg.from_bucket, cfg.horizon
    );
    print_statistic(&stat);
    if let Some(path) = cfg.output {
        write_report(path, std::slice::from_ref(&stat))?;
    }
    Ok(())
}
