//! JSON input schemas shared by the CLI commands.
//!
//! These schemas are the CLI's own contract with the upstream solver
//! layer; the engine's matrix representations never appear in a file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use popquant_core::{Population, SparseMatrix};

/// Population file: parallel value/weight arrays.
#[derive(Debug, Serialize, Deserialize)]
pub struct PopulationFile {
    pub values: Vec<f64>,
    pub weights: Vec<f64>,
}

impl PopulationFile {
    /// Read and validate a population file.
    pub fn load(path: &Path) -> Result<Population, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(path)?;
        let file: PopulationFile = serde_json::from_str(&raw)?;
        Ok(Population::new(file.values, file.weights)?)
    }
}

/// One transition matrix in `(row, col, value)` triplet form.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransitionMatrixFile {
    pub rows: usize,
    pub cols: usize,
    pub entries: Vec<(usize, usize, f64)>,
}

/// Transitions file: one column-stochastic matrix per forecast period,
/// in period order.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransitionsFile {
    pub matrices: Vec<TransitionMatrixFile>,
}

impl TransitionsFile {
    /// Read a transitions file and build the per-period matrices.
    pub fn load(path: &Path) -> Result<Vec<SparseMatrix>, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(path)?;
        let file: TransitionsFile = serde_json::from_str(&raw)?;
        let mut matrices = Vec::with_capacity(file.matrices.len());
        for m in &file.matrices {
            matrices.push(SparseMatrix::from_triplets(m.rows, m.cols, &m.entries)?);
        }
        Ok(matrices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_population_file_round_trip() {
        let file = write_temp(r#"{"values": [1.5, 2.5, 3.5], "weights": [1.0, 2.0, 1.0]}"#);
        let population = PopulationFile::load(file.path()).unwrap();
        assert_eq!(population.len(), 3);
        assert_eq!(population.values(), &[1.5, 2.5, 3.5]);
        assert_eq!(population.total_weight(), 4.0);
    }

    #[test]
    fn test_population_file_rejects_mismatched_lengths() {
        let file = write_temp(r#"{"values": [1.0, 2.0], "weights": [1.0]}"#);
        assert!(PopulationFile::load(file.path()).is_err());
    }

    #[test]
    fn test_transitions_file_builds_matrices() {
        let file = write_temp(
            r#"{"matrices": [{"rows": 2, "cols": 2,
                "entries": [[0, 1, 1.0], [1, 0, 1.0]]}]}"#,
        );
        let matrices = TransitionsFile::load(file.path()).unwrap();
        assert_eq!(matrices.len(), 1);
        assert_eq!(matrices[0].get(0, 1), 1.0);
        assert_eq!(matrices[0].col_sums(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_transitions_file_rejects_out_of_range_entries() {
        let file = write_temp(
            r#"{"matrices": [{"rows": 2, "cols": 2, "entries": [[5, 0, 1.0]]}]}"#,
        );
        assert!(TransitionsFile::load(file.path()).is_err());
    }
}
