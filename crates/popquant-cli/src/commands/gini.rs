use std::path::Path;

use popquant_core::gini_statistic;

use super::{CliResult, print_statistic, write_report};
use crate::input::PopulationFile;

pub fn run(input: &str, key: &str, output: Option<&str>) -> CliResult {
    let population = PopulationFile::load(Path::new(input))?;
    let stat = gini_statistic(population.values(), population.weights(), key)?;
    print_statistic(&stat);
    if let Some(path) = output {
        write_report(path, std::slice::from_ref(&stat))?;
    }
    Ok(())
}
