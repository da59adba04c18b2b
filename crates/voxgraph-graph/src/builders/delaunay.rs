//! Delaunay adjacency between clusters.
//!
//! # Algorithm
//!
//! For each batch:
//!
//! 1. Concatenate the voxels of the batch's clusters and remember, per
//!    point, the local index of the cluster it came from.
//! 2. Tetrahedralize the point cloud through a [`Triangulator`].
//! 3. Mark local clusters `a < b` adjacent whenever a voxel of each appears
//!    in the same simplex.
//! 4. Emit adjacent pairs in row-major order of the local adjacency matrix,
//!    translated back to cluster ids.
//!
//! Batches with fewer than two clusters cannot produce an edge and are
//! skipped without triangulating. Batches with fewer than four points have
//! no full-dimensional simplex; all their points are treated as a single
//! simplex, so every pair of their clusters is adjacent.
//!
//! The triangulation runs on the calling thread, one batch at a time.

use fixedbitset::FixedBitSet;
use nalgebra::Point3;
use tracing::{debug, instrument, trace};
use voxgraph_core::{BatchId, Clusters, DistanceMatrix, Error, IncidenceMatrix, Result, VoxelSet};

use crate::batch::{BatchGroup, BatchPartition};
use crate::prune;
use crate::symmetrize::make_undirected;
use crate::triangulate::{MIN_POINTS, Triangulator};

/// Connect clusters whose voxels share a Delaunay simplex.
///
/// # Errors
///
/// - [`Error::LengthMismatch`] if `batch_ids` does not match `clusters`.
/// - [`Error::VoxelOutOfRange`] if a cluster references a missing voxel.
/// - [`Error::MissingDistanceMatrix`] if `max_dist` is set without `dist`.
/// - Any error from the triangulator, unchanged.
#[instrument(skip_all, fields(clusters = clusters.len()))]
pub fn delaunay_graph<T: Triangulator + ?Sized>(
    voxels: &VoxelSet,
    clusters: &Clusters,
    batch_ids: &[BatchId],
    dist: Option<&DistanceMatrix>,
    max_dist: Option<f64>,
    triangulator: &T,
) -> Result<IncidenceMatrix> {
    if batch_ids.len() != clusters.len() {
        return Err(Error::LengthMismatch {
            what: "cluster batch ids",
            expected: clusters.len(),
            actual: batch_ids.len(),
        });
    }
    clusters.validate(voxels.len())?;
    let pruning = prune::require_distance("delaunay", dist, max_dist, batch_ids.len())?;

    let mut forward = IncidenceMatrix::empty();
    for group in BatchPartition::new(batch_ids).groups() {
        if group.len() < 2 {
            continue;
        }
        let batch_edges = batch_adjacency(voxels, clusters, group, triangulator)?;
        debug!(batch = group.batch, edges = batch_edges.len(), "delaunay adjacency");
        forward.extend_from(&batch_edges);
    }

    Ok(make_undirected(&prune::apply(forward, pruning)))
}

fn batch_adjacency<T: Triangulator + ?Sized>(
    voxels: &VoxelSet,
    clusters: &Clusters,
    group: &BatchGroup,
    triangulator: &T,
) -> Result<IncidenceMatrix> {
    let c = group.len();
    let total: usize = group.members.iter().map(|&g| clusters.members(g).len()).sum();

    let mut points: Vec<Point3<f64>> = Vec::with_capacity(total);
    let mut labels: Vec<usize> = Vec::with_capacity(total);
    for (local, &cluster) in group.members.iter().enumerate() {
        for &v in clusters.members(cluster) {
            points.push(voxels.positions()[v]);
            labels.push(local);
        }
    }

    let mut adjacency = FixedBitSet::with_capacity(c * c);
    if points.len() < MIN_POINTS {
        for a in 0..c {
            for b in a + 1..c {
                adjacency.insert(a * c + b);
            }
        }
    } else {
        let simplices = triangulator.simplices(&points)?;
        trace!(simplices = simplices.len(), "triangulated batch");
        for simplex in &simplices {
            for &i in simplex {
                for &j in simplex {
                    let (a, b) = (labels[i], labels[j]);
                    if b > a {
                        adjacency.insert(a * c + b);
                    }
                }
            }
        }
    }

    Ok(adjacency
        .ones()
        .map(|cell| (group.members[cell / c], group.members[cell % c]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulate::{JoggledDelaunay, Simplex};

    /// Returns a fixed simplex list regardless of the input.
    struct Scripted(Vec<Simplex>);

    impl Triangulator for Scripted {
        fn simplices(&self, _points: &[Point3<f64>]) -> Result<Vec<Simplex>> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl Triangulator for Failing {
        fn simplices(&self, points: &[Point3<f64>]) -> Result<Vec<Simplex>> {
            Err(Error::Triangulation {
                points: points.len(),
                attempts: 1,
                reason: "scripted".into(),
            })
        }
    }

    fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
        Point3::new(x, y, z)
    }

    /// Three clusters of two voxels each, one batch.
    fn three_pairs() -> (VoxelSet, Clusters) {
        let voxels = VoxelSet::single_batch(vec![
            p(0.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(5.0, 0.0, 0.0),
            p(5.0, 1.0, 0.0),
            p(10.0, 0.0, 1.0),
            p(10.0, 1.0, 1.0),
        ]);
        let clusters =
            Clusters::from_lists(&[vec![0, 1], vec![2, 3], vec![4, 5]]).expect("clusters");
        (voxels, clusters)
    }

    #[test]
    fn simplex_co_occurrence_defines_adjacency() {
        let (voxels, clusters) = three_pairs();
        // Points 0..2 belong to cluster 0, 2..4 to cluster 1, 4..6 to cluster 2.
        let tri = Scripted(vec![[0, 1, 2, 3]]);
        let edges =
            delaunay_graph(&voxels, &clusters, &[0, 0, 0], None, None, &tri).expect("edges");
        assert_eq!(edges.to_pairs(), vec![(0, 1), (1, 0)]);

        let tri = Scripted(vec![[0, 2, 4, 5], [1, 3, 4, 5]]);
        let edges =
            delaunay_graph(&voxels, &clusters, &[0, 0, 0], None, None, &tri).expect("edges");
        assert_eq!(
            edges.to_pairs(),
            vec![(0, 1), (0, 2), (1, 2), (1, 0), (2, 0), (2, 1)]
        );
    }

    #[test]
    fn singleton_batches_skip_triangulation() {
        let (voxels, clusters) = three_pairs();
        let edges = delaunay_graph(&voxels, &clusters, &[0, 1, 2], None, None, &Failing)
            .expect("never triangulated");
        assert!(edges.is_empty());
    }

    #[test]
    fn tiny_batches_connect_all_clusters() {
        let voxels = VoxelSet::single_batch(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]);
        let clusters = Clusters::from_lists(&[vec![0], vec![1]]).expect("clusters");
        let edges =
            delaunay_graph(&voxels, &clusters, &[0, 0], None, None, &Failing).expect("edges");
        assert_eq!(edges.to_pairs(), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn triangulation_failure_propagates() {
        let (voxels, clusters) = three_pairs();
        let err = delaunay_graph(&voxels, &clusters, &[0, 0, 0], None, None, &Failing)
            .expect_err("rejected");
        assert!(matches!(err, Error::Triangulation { .. }));
    }

    #[test]
    fn threshold_without_matrix_fails_before_triangulating() {
        let (voxels, clusters) = three_pairs();
        let err = delaunay_graph(&voxels, &clusters, &[0, 0, 0], None, Some(2.0), &Failing)
            .expect_err("rejected");
        assert_eq!(
            err,
            Error::MissingDistanceMatrix {
                strategy: "delaunay"
            }
        );
    }

    #[test]
    fn chain_of_blobs_links_neighbours() {
        // Three separated blobs along x; neighbouring blobs must share a simplex.
        let mut positions = Vec::new();
        let mut lists = Vec::new();
        for (blob, cx) in [0.0, 10.0, 20.0].into_iter().enumerate() {
            let mut members = Vec::new();
            for (dx, dy, dz) in [
                (0.0, 0.0, 0.0),
                (0.0, 3.0, 0.0),
                (0.0, 0.0, 3.0),
                (0.0, 3.0, 3.0),
                (0.5, 1.5, 1.5),
            ] {
                members.push(positions.len());
                positions.push(p(cx + dx, dy + 0.01 * blob as f64, dz));
            }
            lists.push(members);
        }
        let voxels = VoxelSet::single_batch(positions);
        let clusters = Clusters::from_lists(&lists).expect("clusters");
        let edges = delaunay_graph(
            &voxels,
            &clusters,
            &[0, 0, 0],
            None,
            None,
            &JoggledDelaunay::default(),
        )
        .expect("triangulated");
        assert!(edges.contains(0, 1) && edges.contains(1, 0));
        assert!(edges.contains(1, 2) && edges.contains(2, 1));
    }
}
