//! Minimum spanning tree within each batch.
//!
//! # Algorithm
//!
//! Each batch's sub-block of the distance matrix becomes a weighted
//! undirected graph over the batch's clusters, with an edge for every
//! positive off-diagonal entry. A zero entry means "no edge", so duplicate
//! clusters at distance zero fall into separate trees and the result is a
//! spanning forest. Kruskal's algorithm (petgraph) selects the tree edges.
//!
//! Tree edges are emitted per batch as `(i, j)` with `i < j`, sorted, and
//! then optionally pruned and made undirected.

use petgraph::algo::min_spanning_tree;
use petgraph::data::Element;
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::{debug, instrument};
use voxgraph_core::{BatchId, DistanceMatrix, Error, IncidenceMatrix, Result};

use crate::batch::{BatchGroup, BatchPartition};
use crate::prune;
use crate::symmetrize::make_undirected;

/// Connect clusters along the minimum spanning tree of each batch.
///
/// # Errors
///
/// - [`Error::MissingDistanceMatrix`] if `dist` is absent.
/// - [`Error::LengthMismatch`] if `dist` does not cover every cluster.
#[instrument(skip(batch_ids, dist), fields(clusters = batch_ids.len()))]
pub fn mst_graph(
    batch_ids: &[BatchId],
    dist: Option<&DistanceMatrix>,
    max_dist: Option<f64>,
) -> Result<IncidenceMatrix> {
    let dist = dist.ok_or(Error::MissingDistanceMatrix { strategy: "mst" })?;
    dist.expect_len(batch_ids.len())?;
    let pruning = prune::require_distance("mst", Some(dist), max_dist, batch_ids.len())?;

    let mut forward = IncidenceMatrix::empty();
    for group in BatchPartition::new(batch_ids).groups() {
        if group.len() < 2 {
            continue;
        }
        let tree = spanning_forest(dist, group);
        debug!(batch = group.batch, edges = tree.len(), "spanning forest");
        forward.extend_from(&tree);
    }

    Ok(make_undirected(&prune::apply(forward, pruning)))
}

fn spanning_forest(dist: &DistanceMatrix, group: &BatchGroup) -> IncidenceMatrix {
    let ids = &group.members;
    let mut graph: UnGraph<(), f64> = UnGraph::with_capacity(ids.len(), group.pair_count());
    for _ in ids {
        graph.add_node(());
    }
    for a in 0..ids.len() {
        for b in a + 1..ids.len() {
            let d = dist.get(ids[a], ids[b]);
            if d > 0.0 {
                graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), d);
            }
        }
    }

    let mut pairs: Vec<(usize, usize)> = min_spanning_tree(&graph)
        .filter_map(|element| match element {
            Element::Edge { source, target, .. } => {
                Some((ids[source.min(target)], ids[source.max(target)]))
            }
            Element::Node { .. } => None,
        })
        .collect();
    pairs.sort_unstable();
    IncidenceMatrix::from_pairs(&pairs)
}
