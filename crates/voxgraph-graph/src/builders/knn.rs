//! k-nearest-neighbour graph within each batch.
//!
//! Every cluster links to the `min(k, m - 1)` closest other clusters of its
//! batch, where `m` is the batch size. Neighbours are ranked by distance and
//! then by cluster id, and each cluster's selection is emitted in ascending
//! id order. The union of all selections is made undirected, so a pair
//! chosen from both ends appears once per direction.
//!
//! Rows are ranked in parallel; their outputs are concatenated in batch and
//! cluster order, so the result does not depend on thread scheduling.

use rayon::prelude::*;
use tracing::{debug, instrument};
use voxgraph_core::{BatchId, DistanceMatrix, Error, IncidenceMatrix, Result};

use crate::batch::BatchPartition;
use crate::symmetrize::make_undirected;

/// Connect every cluster to its `k` nearest in-batch neighbours.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if `k` is zero.
/// - [`Error::MissingDistanceMatrix`] if `dist` is absent.
/// - [`Error::LengthMismatch`] if `dist` does not cover every cluster.
#[instrument(skip(batch_ids, dist), fields(clusters = batch_ids.len()))]
pub fn knn_graph(
    batch_ids: &[BatchId],
    k: usize,
    dist: Option<&DistanceMatrix>,
) -> Result<IncidenceMatrix> {
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "k",
            reason: "must be at least 1".into(),
        });
    }
    let dist = dist.ok_or(Error::MissingDistanceMatrix { strategy: "knn" })?;
    dist.expect_len(batch_ids.len())?;

    let mut forward = IncidenceMatrix::empty();
    for group in BatchPartition::new(batch_ids).groups() {
        if group.len() < 2 {
            continue;
        }
        let take = k.min(group.len() - 1);
        let rows: Vec<Vec<usize>> = group
            .members
            .par_iter()
            .map(|&i| nearest(dist, i, &group.members, take))
            .collect();
        for (&i, row) in group.members.iter().zip(&rows) {
            for &j in row {
                forward.push(i, j);
            }
        }
        debug!(batch = group.batch, take, "ranked neighbours");
    }

    Ok(make_undirected(&forward))
}

/// The `take` members closest to `i`, excluding `i`, in ascending id order.
fn nearest(dist: &DistanceMatrix, i: usize, members: &[usize], take: usize) -> Vec<usize> {
    let mut ranked: Vec<(f64, usize)> = members
        .iter()
        .filter(|&&j| j != i)
        .map(|&j| (dist.get(i, j), j))
        .collect();
    ranked.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    let mut chosen: Vec<usize> = ranked.into_iter().take(take).map(|(_, j)| j).collect();
    chosen.sort_unstable();
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> DistanceMatrix {
        DistanceMatrix::from_row_slice(3, &[0.0, 1.0, 5.0, 1.0, 0.0, 2.0, 5.0, 2.0, 0.0])
            .expect("square")
    }

    #[test]
    fn one_neighbour_each() {
        let edges = knn_graph(&[0, 0, 0], 1, Some(&triangle())).expect("knn");
        // Forward: 0→1, 1→0, 2→1; the reversed block only adds 1→2.
        assert_eq!(edges.to_pairs(), vec![(0, 1), (1, 0), (2, 1), (1, 2)]);
    }

    #[test]
    fn k_is_clipped_to_batch_size() {
        let edges = knn_graph(&[0, 0, 0], 10, Some(&triangle())).expect("knn");
        assert_eq!(edges.len(), 6);
    }

    #[test]
    fn ties_prefer_lower_ids() {
        let dm = DistanceMatrix::from_row_slice(3, &[0.0, 2.0, 2.0, 2.0, 0.0, 2.0, 2.0, 2.0, 0.0])
            .expect("square");
        let edges = knn_graph(&[0, 0, 0], 1, Some(&dm)).expect("knn");
        assert_eq!(edges.to_pairs(), vec![(0, 1), (1, 0), (2, 0), (0, 2)]);
    }

    #[test]
    fn singleton_batches_have_no_neighbours() {
        let dm = DistanceMatrix::zeros(3);
        assert!(knn_graph(&[0, 1, 2], 3, Some(&dm)).expect("knn").is_empty());
    }

    #[test]
    fn batches_do_not_mix() {
        #[rustfmt::skip]
        let dm = DistanceMatrix::from_row_slice(4, &[
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
        ])
        .expect("square");
        let edges = knn_graph(&[0, 1, 0, 1], 2, Some(&dm)).expect("knn");
        assert_eq!(edges.to_pairs(), vec![(0, 2), (2, 0), (1, 3), (3, 1)]);
    }

    #[test]
    fn invalid_inputs() {
        assert!(matches!(
            knn_graph(&[0, 0], 0, Some(&DistanceMatrix::zeros(2))),
            Err(Error::InvalidParameter { name: "k", .. })
        ));
        assert_eq!(
            knn_graph(&[0, 0], 1, None),
            Err(Error::MissingDistanceMatrix { strategy: "knn" })
        );
    }
}
