//! # popquant-core
//!
//! **Distributional statistics over weighted agent populations.**
//!
//! A microsimulation hands this crate, for every agent, a value and a
//! population weight. The engine partitions the population into quantile
//! buckets with exact fractional weight splits at bucket edges, aggregates
//! weighted shares and means per bucket, computes Gini coefficients, and
//! forecasts how bucket membership evolves under a sequence of per-period
//! transition matrices.
//!
//! ## Quick start
//!
//! ```
//! use popquant_core::{CutSpec, bucket_matrix, share_statistic};
//!
//! let values = vec![12.0, 40.0, 7.0, 21.0];
//! let weights = vec![1.0, 1.0, 1.0, 1.0];
//!
//! let buckets = bucket_matrix(&values, &weights, &CutSpec::Count(2)).unwrap();
//! let shares = share_statistic(&buckets, &values, &weights, "income", None).unwrap();
//!
//! assert_eq!(shares.values.len(), 2);
//! let total: f64 = shares.values.iter().sum();
//! assert!((total - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Architecture
//!
//! Values + weights → boundary interpolation → bucket-membership matrix →
//! {share/mean statistics, Gini}. Separately: initial distribution +
//! transition matrices → mobility forecast, restated through a
//! future-period bucket matrix.
//!
//! Every component is a pure function over immutable inputs: no shared
//! state, no I/O, deterministic for given inputs. Independent invocations
//! (one per cohort, one per horizon) can run as fully parallel tasks.

pub mod boundary;
pub mod bucket;
pub mod error;
pub mod gini;
pub mod mobility;
pub mod population;
pub mod sparse;
pub mod stats;

pub use boundary::{Bracket, locate_boundaries};
pub use bucket::{BucketKind, BucketMatrix, CutSpec, bucket_matrix, stacked_bucket_matrix};
pub use error::{EngineError, Result};
pub use gini::{gini_coefficient, gini_statistic};
pub use mobility::{future_distribution, future_probabilities, propagate};
pub use population::Population;
pub use sparse::SparseMatrix;
pub use stats::{
    FutureMeta, StatKind, Statistic, mean_statistic, share_statistic, subgroup_share_statistic,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
