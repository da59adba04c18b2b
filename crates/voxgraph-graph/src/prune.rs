//! Distance-based edge pruning.
//!
//! An edge `(i, j)` survives when `D[i][j] < max_dist`. Pruning is optional
//! for every strategy that supports it, but once a threshold is requested
//! the distance matrix becomes mandatory.

use tracing::debug;
use voxgraph_core::{DistanceMatrix, Error, IncidenceMatrix, Result};

/// Resolve the distance matrix a pruning step needs.
///
/// Returns `Ok(None)` when no threshold is set, `Ok(Some(..))` when both are
/// present, and an error when a threshold arrives without a matrix. Call
/// this before building anything so bad configuration fails fast.
///
/// # Errors
///
/// - [`Error::MissingDistanceMatrix`] if `max_dist` is set but `dist` is not.
/// - [`Error::InvalidParameter`] if `max_dist` is NaN.
/// - [`Error::LengthMismatch`] if the matrix does not cover `n_clusters`.
pub fn require_distance<'a>(
    strategy: &'static str,
    dist: Option<&'a DistanceMatrix>,
    max_dist: Option<f64>,
    n_clusters: usize,
) -> Result<Option<(&'a DistanceMatrix, f64)>> {
    match (max_dist, dist) {
        (None, _) => Ok(None),
        (Some(m), _) if m.is_nan() => Err(Error::InvalidParameter {
            name: "max_dist",
            reason: "must not be NaN".into(),
        }),
        (Some(_), None) => Err(Error::MissingDistanceMatrix { strategy }),
        (Some(m), Some(d)) => {
            d.expect_len(n_clusters)?;
            Ok(Some((d, m)))
        }
    }
}

/// Keep the edges strictly shorter than `max_dist`, in order.
#[must_use]
pub fn prune_by_distance(
    edges: &IncidenceMatrix,
    dist: &DistanceMatrix,
    max_dist: f64,
) -> IncidenceMatrix {
    let kept = edges.filter(|_, i, j| dist.get(i, j) < max_dist);
    debug!(
        before = edges.len(),
        after = kept.len(),
        max_dist,
        "pruned edges by distance"
    );
    kept
}

/// Apply an optional, already-resolved pruning step.
#[must_use]
pub fn apply(edges: IncidenceMatrix, pruning: Option<(&DistanceMatrix, f64)>) -> IncidenceMatrix {
    match pruning {
        Some((dist, max_dist)) => prune_by_distance(&edges, dist, max_dist),
        None => edges,
    }
}
