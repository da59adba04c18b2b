//! Geometric edge features.
//!
//! # Layout
//!
//! Every edge maps to a row of [`EDGE_FEATURE_DIM`] values:
//!
//! | columns | content                                        |
//! |---------|------------------------------------------------|
//! | 0..3    | source point                                   |
//! | 3..6    | target point                                   |
//! | 6..9    | unit displacement (zero when the distance is 0) |
//! | 9       | distance                                       |
//! | 10..19  | `u uᵀ` flattened row-major, `u` the unit displacement |
//!
//! Cluster edges use the closest point of approach of the two clusters and
//! measure the displacement from target to source (`source - target`).
//! Voxel edges use the voxel positions directly and measure it from source
//! to target (`target - source`).
//!
//! Rows are computed in parallel, one per edge, and returned in edge order.

use nalgebra::{DMatrix, Point3, Vector3};
use rayon::prelude::*;
use tracing::{debug, instrument};
use voxgraph_core::{Clusters, IncidenceMatrix, Result, VoxelSet, edge_distances};

/// Width of one edge feature row.
pub const EDGE_FEATURE_DIM: usize = 19;

/// One edge's feature row.
pub type EdgeFeature = [f64; EDGE_FEATURE_DIM];

/// Assemble a row from the two endpoints and the raw displacement.
fn feature_row(source: &Point3<f64>, target: &Point3<f64>, disp: Vector3<f64>) -> EdgeFeature {
    let length = disp.norm();
    let unit = if length > 0.0 { disp / length } else { Vector3::zeros() };
    let outer = unit * unit.transpose();

    let mut row = [0.0; EDGE_FEATURE_DIM];
    row[0..3].copy_from_slice(source.coords.as_slice());
    row[3..6].copy_from_slice(target.coords.as_slice());
    row[6..9].copy_from_slice(unit.as_slice());
    row[9] = length;
    for r in 0..3 {
        for c in 0..3 {
            row[10 + 3 * r + c] = outer[(r, c)];
        }
    }
    row
}

/// Features of edges between clusters.
///
/// # Errors
///
/// - [`voxgraph_core::Error::VoxelOutOfRange`] if a cluster references a missing voxel.
/// - [`voxgraph_core::Error::ClusterOutOfRange`] if an edge references a missing cluster.
#[instrument(skip_all, fields(edges = edges.len(), clusters = clusters.len()))]
pub fn cluster_edge_features(
    voxels: &VoxelSet,
    clusters: &Clusters,
    edges: &IncidenceMatrix,
) -> Result<Vec<EdgeFeature>> {
    let cpas = edge_distances(voxels, clusters, edges)?;

    let positions = voxels.positions();
    let rows: Vec<EdgeFeature> = cpas
        .par_iter()
        .map(|cpa| {
            let v1 = positions[cpa.source_voxel];
            let v2 = positions[cpa.target_voxel];
            feature_row(&v1, &v2, v1 - v2)
        })
        .collect();
    debug!(rows = rows.len(), "cluster edge features");
    Ok(rows)
}

/// Features of edges between individual voxels.
///
/// # Errors
///
/// Returns [`voxgraph_core::Error::ClusterOutOfRange`] if an edge endpoint is
/// not a voxel index.
#[instrument(skip_all, fields(edges = edges.len(), voxels = voxels.len()))]
pub fn voxel_edge_features(voxels: &VoxelSet, edges: &IncidenceMatrix) -> Result<Vec<EdgeFeature>> {
    edges.validate(voxels.len())?;

    let positions = voxels.positions();
    let rows: Vec<EdgeFeature> = edges
        .sources()
        .par_iter()
        .zip(edges.targets().par_iter())
        .map(|(&i, &j)| {
            let (xi, xj) = (positions[i], positions[j]);
            feature_row(&xi, &xj, xj - xi)
        })
        .collect();
    debug!(rows = rows.len(), "voxel edge features");
    Ok(rows)
}

/// Stack feature rows into an `(E, 19)` matrix.
#[must_use]
pub fn to_matrix(rows: &[EdgeFeature]) -> DMatrix<f64> {
    DMatrix::from_fn(rows.len(), EDGE_FEATURE_DIM, |r, c| rows[r][c])
}
