//! Closest point of approach (CPA) between point sets.
//!
//! # Algorithm
//!
//! Brute force: every pair `(a, b)` is evaluated once on squared distance
//! and the first minimum in row-major order wins, so ties resolve to the
//! lowest index in the first set, then in the second. A single `sqrt` is
//! taken on the winner.
//!
//! Complexity: O(|A| · |B|) per pair of sets.

use nalgebra::Point3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cluster::Clusters;
use crate::error::Result;
use crate::incidence::IncidenceMatrix;
use crate::voxel::VoxelSet;

/// Winning pair of a closest-point search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosestPair {
    pub distance: f64,
    /// Index into the first set.
    pub first: usize,
    /// Index into the second set.
    pub second: usize,
}

/// CPA of one edge, expressed in global voxel ids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeCpa {
    pub distance: f64,
    pub source_voxel: usize,
    pub target_voxel: usize,
}

/// Closest pair between two point sets.
///
/// Returns `None` if either set is empty.
#[must_use]
pub fn closest_pair(a: &[Point3<f64>], b: &[Point3<f64>]) -> Option<ClosestPair> {
    let mut best: Option<(f64, usize, usize)> = None;
    for (i, pa) in a.iter().enumerate() {
        for (j, pb) in b.iter().enumerate() {
            let d2 = (*pa - *pb).norm_squared();
            if best.is_none_or(|(bd2, _, _)| d2 < bd2) {
                best = Some((d2, i, j));
            }
        }
    }
    best.map(|(d2, first, second)| ClosestPair {
        distance: d2.sqrt(),
        first,
        second,
    })
}

/// Closest pair between two voxel-index lists over a shared position table.
///
/// `first`/`second` in the result index into `a`/`b`, not the voxel table.
/// Returns `None` if either list is empty.
#[must_use]
pub fn cluster_cpa(positions: &[Point3<f64>], a: &[usize], b: &[usize]) -> Option<ClosestPair> {
    let mut best: Option<(f64, usize, usize)> = None;
    for (i, &va) in a.iter().enumerate() {
        let pa = positions[va];
        for (j, &vb) in b.iter().enumerate() {
            let d2 = (pa - positions[vb]).norm_squared();
            if best.is_none_or(|(bd2, _, _)| d2 < bd2) {
                best = Some((d2, i, j));
            }
        }
    }
    best.map(|(d2, first, second)| ClosestPair {
        distance: d2.sqrt(),
        first,
        second,
    })
}

/// CPA for the edge `source → target` between two clusters.
///
/// A self-loop short-circuits to distance 0 on the first member of the
/// cluster without searching.
///
/// # Panics
///
/// Panics if either cluster id is out of range. Callers validate the
/// incidence matrix first.
#[must_use]
pub fn edge_cpa(voxels: &VoxelSet, clusters: &Clusters, source: usize, target: usize) -> EdgeCpa {
    let a = clusters.members(source);
    let b = clusters.members(target);
    if source == target {
        return EdgeCpa {
            distance: 0.0,
            source_voxel: a[0],
            target_voxel: b[0],
        };
    }
    // Clusters are non-empty by construction, so a pair always exists.
    let pair = cluster_cpa(voxels.positions(), a, b).unwrap_or(ClosestPair {
        distance: 0.0,
        first: 0,
        second: 0,
    });
    EdgeCpa {
        distance: pair.distance,
        source_voxel: a[pair.first],
        target_voxel: b[pair.second],
    }
}

/// CPA distance and winning voxels for every edge, in edge order.
///
/// Edges are independent, so the loop runs on the rayon pool.
///
/// # Errors
///
/// - [`crate::Error::VoxelOutOfRange`] if a cluster references a missing voxel.
/// - [`crate::Error::ClusterOutOfRange`] if an edge references a missing cluster.
#[instrument(skip_all, fields(edges = edges.len()))]
pub fn edge_distances(
    voxels: &VoxelSet,
    clusters: &Clusters,
    edges: &IncidenceMatrix,
) -> Result<Vec<EdgeCpa>> {
    clusters.validate(voxels.len())?;
    edges.validate(clusters.len())?;

    let pairs = edges.to_pairs();
    Ok(pairs
        .par_iter()
        .map(|&(s, t)| edge_cpa(voxels, clusters, s, t))
        .collect())
}
