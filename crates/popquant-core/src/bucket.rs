//! Quantile bucket assignment.
//!
//! Builds the sparse bucket-membership matrix that every aggregate in this
//! crate is a linear function of: entry `(b, a)` is the fraction of agent
//! `a`'s weight assigned to bucket `b`. Interpolation at cut points splits
//! an agent's weight between at most two adjacent buckets; columns sum to
//! 1 except where the degenerate-bucket policy dropped a bucket.

use serde::{Deserialize, Serialize};

use crate::boundary::{Bracket, locate_boundaries};
use crate::error::{EngineError, Result};
use crate::population::{cumulative_weights, sort_permutation};
use crate::sparse::SparseMatrix;

/// Where a bucket sits in its partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketKind {
    /// No lower bound: everything below the first cut point.
    BottomOpen,
    /// Bounded by a cut point on both sides.
    Interior,
    /// No upper bound: everything at or above the last cut point.
    TopOpen,
}

impl std::fmt::Display for BucketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BottomOpen => write!(f, "bottom_open"),
            Self::Interior => write!(f, "interior"),
            Self::TopOpen => write!(f, "top_open"),
        }
    }
}

/// Cut points for one bucket group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutSpec {
    /// Explicit strictly increasing cumulative-probability thresholds in
    /// (0, 1).
    Thresholds(Vec<f64>),
    /// `n` equal-probability buckets, expanded to `n - 1` thresholds.
    Count(usize),
}

impl CutSpec {
    /// Expand to the explicit threshold sequence.
    pub fn thresholds(&self) -> Result<Vec<f64>> {
        match self {
            CutSpec::Thresholds(t) => {
                if t.is_empty() {
                    return Err(EngineError::ShapeMismatch(
                        "empty cut-point sequence".into(),
                    ));
                }
                Ok(t.clone())
            }
            CutSpec::Count(n) => {
                if *n < 2 {
                    return Err(EngineError::ShapeMismatch(format!(
                        "bucket count must be at least 2, got {n}"
                    )));
                }
                Ok((1..*n).map(|i| i as f64 / *n as f64).collect())
            }
        }
    }

    /// Number of buckets this spec produces.
    pub fn bucket_count(&self) -> usize {
        match self {
            CutSpec::Thresholds(t) => t.len() + 1,
            CutSpec::Count(n) => *n,
        }
    }
}

/// Sparse bucket-membership matrix plus its partition bookkeeping.
///
/// Rows are buckets, columns are agents in their original input order.
/// Buckets dropped by the degenerate policy keep an all-zero row so that
/// row indices stay aligned with the requested partition; their indices
/// are listed in [`BucketMatrix::skipped`].
#[derive(Debug, Clone)]
pub struct BucketMatrix {
    matrix: SparseMatrix,
    kinds: Vec<BucketKind>,
    skipped: Vec<usize>,
}

impl BucketMatrix {
    /// The underlying buckets × agents weighting matrix.
    pub fn matrix(&self) -> &SparseMatrix {
        &self.matrix
    }

    pub fn bucket_count(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn agent_count(&self) -> usize {
        self.matrix.ncols()
    }

    /// Bucket kinds, one per row.
    pub fn kinds(&self) -> &[BucketKind] {
        &self.kinds
    }

    /// Buckets dropped by the degenerate policy, ascending.
    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }

    pub fn is_skipped(&self, bucket: usize) -> bool {
        self.skipped.binary_search(&bucket).is_ok()
    }

    /// Indices of buckets that were actually assigned.
    pub fn retained(&self) -> Vec<usize> {
        (0..self.bucket_count())
            .filter(|b| !self.is_skipped(*b))
            .collect()
    }

    /// Dense membership row for bucket `b`: one fraction per agent.
    ///
    /// # Panics
    ///
    /// Panics if `b >= bucket_count()`.
    pub fn membership_row(&self, b: usize) -> Vec<f64> {
        let mut row = vec![0.0; self.agent_count()];
        for (agent, frac) in self.matrix.row(b) {
            row[agent] = frac;
        }
        row
    }

    /// Weighted population share captured by each bucket. Skipped buckets
    /// report 0.
    pub fn weight_shares(&self, weights: &[f64]) -> Result<Vec<f64>> {
        if weights.len() != self.agent_count() {
            return Err(EngineError::ShapeMismatch(format!(
                "{} weights for {} agents",
                weights.len(),
                self.agent_count()
            )));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(EngineError::DivisionByZero(
                "population has zero total weight".into(),
            ));
        }
        let mut shares = self.matrix.mul_vec(weights)?;
        for s in &mut shares {
            *s /= total;
        }
        Ok(shares)
    }

    /// Default bucket labels from the cumulative weight share spanned by
    /// each bucket, formatted as percentile ranges (`"0-20%"`). The running
    /// share restarts at every bottom-open bucket so stacked groups label
    /// independently.
    pub fn percentile_labels(&self, weights: &[f64]) -> Result<Vec<String>> {
        let shares = self.weight_shares(weights)?;
        let mut labels = Vec::with_capacity(self.bucket_count());
        let mut acc = 0.0;
        for (b, kind) in self.kinds.iter().enumerate() {
            if *kind == BucketKind::BottomOpen {
                acc = 0.0;
            }
            let hi = acc + shares[b];
            labels.push(percentile_range(acc, hi));
            acc = hi;
        }
        Ok(labels)
    }

    /// Default bucket labels that divide each group's index range evenly —
    /// the fallback when no weight vector applies (e.g. future-period
    /// buckets).
    pub fn index_labels(&self) -> Vec<String> {
        let mut labels = vec![String::new(); self.bucket_count()];
        let mut start = 0;
        for (b, kind) in self.kinds.iter().enumerate() {
            if *kind == BucketKind::BottomOpen {
                start = b;
            }
            if *kind == BucketKind::TopOpen {
                let size = b - start + 1;
                for (j, label) in labels[start..=b].iter_mut().enumerate() {
                    *label =
                        percentile_range(j as f64 / size as f64, (j + 1) as f64 / size as f64);
                }
            }
        }
        labels
    }
}

fn percentile_range(lo: f64, hi: f64) -> String {
    format!("{:.0}-{:.0}%", lo * 100.0, hi * 100.0)
}

/// Build the bucket-membership matrix for one full quantile partition:
/// one bottom-open bucket, interior buckets between consecutive cut
/// points, one top-open bucket.
pub fn bucket_matrix(values: &[f64], weights: &[f64], cuts: &CutSpec) -> Result<BucketMatrix> {
    stacked_bucket_matrix(values, weights, std::slice::from_ref(cuts))
}

/// Build one combined matrix from several cut-point groups over the same
/// population. Bucket indices are offset group by group, so e.g. halves
/// and deciles concatenate into a single 12-row matrix in which every
/// agent is fully assigned once per group.
pub fn stacked_bucket_matrix(
    values: &[f64],
    weights: &[f64],
    groups: &[CutSpec],
) -> Result<BucketMatrix> {
    if values.len() != weights.len() {
        return Err(EngineError::ShapeMismatch(format!(
            "{} values vs {} weights",
            values.len(),
            weights.len()
        )));
    }
    if values.is_empty() {
        return Err(EngineError::ShapeMismatch("empty population".into()));
    }
    if groups.is_empty() {
        return Err(EngineError::ShapeMismatch("no cut-point groups".into()));
    }

    // Sort once; every group shares the ordering and cumulative sequence.
    let order = sort_permutation(values);
    let cum = cumulative_weights(weights, &order)?;

    let total_buckets: usize = groups.iter().map(CutSpec::bucket_count).sum();
    let mut triplets = Vec::new();
    let mut kinds = Vec::with_capacity(total_buckets);
    let mut skipped = Vec::new();
    let mut offset = 0;

    for group in groups {
        let divs = group.thresholds()?;
        let brackets = locate_boundaries(&cum, &divs)?;
        assign_group(
            &brackets,
            &order,
            offset,
            &mut triplets,
            &mut kinds,
            &mut skipped,
        );
        offset += brackets.len() + 1;
    }

    let matrix = SparseMatrix::from_triplets(total_buckets, values.len(), &triplets)?;
    Ok(BucketMatrix {
        matrix,
        kinds,
        skipped,
    })
}

/// Emit the membership triplets for one partition's buckets.
///
/// Triplet columns are original agent indices: sorted position `s` maps
/// back through `order[s]`, which is the "reorder columns to input order"
/// step of the algorithm.
fn assign_group(
    brackets: &[Bracket],
    order: &[usize],
    row_offset: usize,
    triplets: &mut Vec<(usize, usize, f64)>,
    kinds: &mut Vec<BucketKind>,
    skipped: &mut Vec<usize>,
) {
    let n_agents = order.len();
    let n_buckets = brackets.len() + 1;

    for b in 0..n_buckets {
        let kind = if b == 0 {
            BucketKind::BottomOpen
        } else if b == n_buckets - 1 {
            BucketKind::TopOpen
        } else {
            BucketKind::Interior
        };
        kinds.push(kind);
        let row = row_offset + b;

        match kind {
            BucketKind::BottomOpen => {
                let Bracket { upper, split, .. } = brackets[0];
                for &agent in &order[..upper] {
                    triplets.push((row, agent, 1.0));
                }
                triplets.push((row, order[upper], split));
            }
            BucketKind::Interior => {
                let lo = brackets[b - 1];
                let hi = brackets[b];
                // Index span from the lower cut's lower bracket through the
                // upper cut's upper bracket. Two or fewer agents means both
                // cuts bracket inside the same segment of the cumulative
                // distribution: a jump straddles this bucket.
                let span = hi.upper + 1 - lo.lower;
                if span <= 2 {
                    log::warn!(
                        "skipping degenerate bucket {row}: only {span} agent(s) between its cut points"
                    );
                    skipped.push(row);
                    continue;
                }
                triplets.push((row, order[lo.upper], 1.0 - lo.split));
                for &agent in &order[lo.upper + 1..hi.upper] {
                    triplets.push((row, agent, 1.0));
                }
                triplets.push((row, order[hi.upper], hi.split));
            }
            BucketKind::TopOpen => {
                let Bracket { upper, split, .. } = brackets[n_buckets - 2];
                triplets.push((row, order[upper], 1.0 - split));
                for &agent in &order[upper + 1..n_agents] {
                    triplets.push((row, agent, 1.0));
                }
            }
        }
    }
}
