//! Boundary interpolation over a cumulative weight sequence.
//!
//! Given the sorted population's normalized cumulative weights and a set of
//! cumulative-probability cut points, find the pair of agents bracketing
//! each cut and the fraction of the boundary agent's weight that falls on
//! the lower side. This is the primitive the quantile assigner is built on.

use crate::error::{EngineError, Result};

/// Bracketing of one cut point over the cumulative sequence.
///
/// `cum[lower] <= div <= cum[upper]` with `upper == lower + 1`, except for
/// cut points outside the observed cumulative range, which clamp to the
/// nearest valid bracket and extrapolate linearly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lower: usize,
    pub upper: usize,
    /// Fraction of the boundary agent's weight (the agent at `upper`)
    /// belonging to the lower side of the cut, linearly interpolated
    /// between the bracketing cumulative values.
    pub split: f64,
}

/// Locate the bracketing pair and split weight for each cut point.
///
/// `cum` is non-decreasing with last entry 1.0 (see
/// `population::cumulative_weights`). `divs` must be strictly increasing
/// and inside (0, 1); anything else fails with
/// [`EngineError::ShapeMismatch`].
///
/// A cut point that coincides exactly with an agent's cumulative weight
/// resolves to the bracket *above* that agent with split weight 0.0 — the
/// agent sits wholly below the cut.
pub fn locate_boundaries(cum: &[f64], divs: &[f64]) -> Result<Vec<Bracket>> {
    if cum.len() < 2 {
        return Err(EngineError::ShapeMismatch(format!(
            "cumulative sequence needs at least 2 entries, got {}",
            cum.len()
        )));
    }
    debug_assert!(
        cum.last().is_some_and(|&last| (last - 1.0).abs() < 1e-9),
        "cumulative sequence must end at 1.0"
    );
    for pair in divs.windows(2) {
        if pair[1] <= pair[0] {
            return Err(EngineError::ShapeMismatch(format!(
                "cut points must be strictly increasing ({} then {})",
                pair[0], pair[1]
            )));
        }
    }
    if let Some(d) = divs.iter().find(|d| **d <= 0.0 || **d >= 1.0) {
        return Err(EngineError::ShapeMismatch(format!(
            "cut point {d} outside (0, 1)"
        )));
    }

    let mut brackets = Vec::with_capacity(divs.len());
    // Cut points ascend, so the scan never restarts.
    let mut upper = 1usize;
    for &d in divs {
        while upper < cum.len() - 1 && cum[upper] <= d {
            upper += 1;
        }
        let lower = upper - 1;
        let span = cum[upper] - cum[lower];
        // Zero span only happens on a weightless boundary agent; the lower
        // side takes it whole.
        let split = if span > 0.0 {
            (d - cum[lower]) / span
        } else {
            1.0
        };
        brackets.push(Bracket { lower, upper, split });
    }
    Ok(brackets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_quintile_cuts_land_on_agents() {
        let cum = vec![0.2, 0.4, 0.6, 0.8, 1.0];
        let brackets = locate_boundaries(&cum, &[0.2, 0.4, 0.6, 0.8]).unwrap();
        for (i, b) in brackets.iter().enumerate() {
            assert_eq!(b.lower, i);
            assert_eq!(b.upper, i + 1);
            assert_eq!(b.split, 0.0, "cut {i} should split 0.0 on the boundary");
        }
    }

    #[test]
    fn test_split_interpolates_inside_a_segment() {
        let cum = vec![0.25, 0.5, 0.75, 1.0];
        let brackets = locate_boundaries(&cum, &[0.4]).unwrap();
        assert_eq!(brackets[0].lower, 0);
        assert_eq!(brackets[0].upper, 1);
        assert!((brackets[0].split - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_cut_below_first_cumulative_extrapolates() {
        // The first agent already holds 60% of the mass; a 0.5 cut falls
        // below cum[0] and resolves to the first bracket with a negative
        // (extrapolated) split.
        let cum = vec![0.6, 0.8, 1.0];
        let brackets = locate_boundaries(&cum, &[0.5]).unwrap();
        assert_eq!(brackets[0].lower, 0);
        assert_eq!(brackets[0].upper, 1);
        assert!(brackets[0].split < 0.0);
    }

    #[test]
    fn test_rejects_non_increasing_cuts() {
        let cum = vec![0.5, 1.0];
        let err = locate_boundaries(&cum, &[0.4, 0.4]).unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));
    }

    #[test]
    fn test_rejects_cuts_outside_unit_interval() {
        let cum = vec![0.5, 1.0];
        assert!(locate_boundaries(&cum, &[0.0]).is_err());
        assert!(locate_boundaries(&cum, &[1.0]).is_err());
        assert!(locate_boundaries(&cum, &[-0.2]).is_err());
    }

    #[test]
    fn test_exact_match_favors_lower_side() {
        // Cut exactly on an agent's cumulative value: that agent is wholly
        // below the cut, so the split charged to the next agent is 0.0.
        let cum = vec![0.5, 1.0];
        let brackets = locate_boundaries(&cum, &[0.5]).unwrap();
        assert_eq!(brackets[0].lower, 0);
        assert_eq!(brackets[0].upper, 1);
        assert_eq!(brackets[0].split, 0.0);
    }
}
