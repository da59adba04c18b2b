//! Complete graph within each batch.

use tracing::{debug, instrument};
use voxgraph_core::{BatchId, DistanceMatrix, IncidenceMatrix, Result};

use crate::batch::BatchPartition;
use crate::prune;
use crate::symmetrize::make_undirected;

/// Connect every pair of clusters sharing a batch id.
///
/// Forward edges `(i, j)`, `i < j`, are enumerated in row-major order over
/// cluster ids, optionally pruned to `D[i][j] < max_dist`, and then made
/// undirected. Before pruning a batch of size `m` contributes `m(m-1)`
/// directed edges.
///
/// # Errors
///
/// Returns [`voxgraph_core::Error::MissingDistanceMatrix`] if `max_dist` is
/// set without `dist`.
#[instrument(skip(batch_ids, dist), fields(clusters = batch_ids.len()))]
pub fn complete_graph(
    batch_ids: &[BatchId],
    dist: Option<&DistanceMatrix>,
    max_dist: Option<f64>,
) -> Result<IncidenceMatrix> {
    let pruning = prune::require_distance("complete", dist, max_dist, batch_ids.len())?;
    let partition = BatchPartition::new(batch_ids);

    let mut forward = IncidenceMatrix::with_capacity(partition.pair_count());
    for i in 0..batch_ids.len() {
        for &j in partition.group_of(i).members.iter().filter(|&&j| j > i) {
            forward.push(i, j);
        }
    }
    debug!(pairs = forward.len(), "enumerated in-batch pairs");

    Ok(make_undirected(&prune::apply(forward, pruning)))
}
