//! Compressed sparse row matrices.
//!
//! One representation serves both matrix families in the engine: the
//! bucket-membership matrix (buckets × agents) and the per-period
//! transition matrices (states × states). Both are built once and then
//! used as read-only linear operators.

use crate::error::{EngineError, Result};

/// Immutable sparse matrix in compressed row form.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    nrows: usize,
    ncols: usize,
    /// Row start offsets into `cols`/`vals`; length `nrows + 1`.
    row_ptr: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<f64>,
}

impl SparseMatrix {
    /// Build from `(row, col, value)` triplets. Exact-zero entries are
    /// dropped; duplicate coordinates are summed.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: &[(usize, usize, f64)],
    ) -> Result<Self> {
        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); nrows];
        for &(r, c, v) in triplets {
            if r >= nrows || c >= ncols {
                return Err(EngineError::ShapeMismatch(format!(
                    "entry ({r}, {c}) outside a {nrows}x{ncols} matrix"
                )));
            }
            if v != 0.0 {
                rows[r].push((c, v));
            }
        }

        let mut row_ptr = Vec::with_capacity(nrows + 1);
        let mut cols = Vec::new();
        let mut vals = Vec::new();
        row_ptr.push(0);
        for entries in &mut rows {
            entries.sort_by_key(|&(c, _)| c);
            let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
            for &(c, v) in entries.iter() {
                match merged.last_mut() {
                    Some(last) if last.0 == c => last.1 += v,
                    _ => merged.push((c, v)),
                }
            }
            for (c, v) in merged {
                cols.push(c);
                vals.push(v);
            }
            row_ptr.push(cols.len());
        }

        Ok(Self {
            nrows,
            ncols,
            row_ptr,
            cols,
            vals,
        })
    }

    /// The n × n identity.
    pub fn identity(n: usize) -> Self {
        Self {
            nrows: n,
            ncols: n,
            row_ptr: (0..=n).collect(),
            cols: (0..n).collect(),
            vals: vec![1.0; n],
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored (nonzero) entries.
    pub fn nnz(&self) -> usize {
        self.vals.len()
    }

    /// `y = A · x`. Fails with [`EngineError::ShapeMismatch`] unless
    /// `x.len() == ncols`.
    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.ncols {
            return Err(EngineError::ShapeMismatch(format!(
                "vector of length {} against a {}x{} matrix",
                x.len(),
                self.nrows,
                self.ncols
            )));
        }
        let mut y = vec![0.0; self.nrows];
        for r in 0..self.nrows {
            let mut acc = 0.0;
            for k in self.row_ptr[r]..self.row_ptr[r + 1] {
                acc += self.vals[k] * x[self.cols[k]];
            }
            y[r] = acc;
        }
        Ok(y)
    }

    /// Stored entries of row `r` as `(col, value)` pairs, ascending by
    /// column.
    ///
    /// # Panics
    ///
    /// Panics if `r >= nrows`.
    pub fn row(&self, r: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let lo = self.row_ptr[r];
        let hi = self.row_ptr[r + 1];
        self.cols[lo..hi]
            .iter()
            .copied()
            .zip(self.vals[lo..hi].iter().copied())
    }

    /// Entry `(r, c)`, zero if not stored.
    ///
    /// # Panics
    ///
    /// Panics if `r >= nrows`.
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.row(r).find(|&(col, _)| col == c).map_or(0.0, |(_, v)| v)
    }

    /// Per-row entry sums.
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.nrows)
            .map(|r| self.row(r).map(|(_, v)| v).sum())
            .collect()
    }

    /// Per-column entry sums. For a column-stochastic transition matrix
    /// these are all 1.
    pub fn col_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.ncols];
        for (k, &c) in self.cols.iter().enumerate() {
            sums[c] += self.vals[k];
        }
        sums
    }
}
