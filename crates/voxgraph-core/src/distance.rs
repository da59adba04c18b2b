//! Inter-cluster distance matrix.
//!
//! # Overview
//!
//! Entry `(i, j)` is the distance between clusters `i` and `j` when they
//! share a batch id and `0.0` otherwise, so the matrix is symmetric and
//! block-diagonal by batch. Graph builders compute it once and reuse it for
//! pruning, kNN ranking, and spanning trees.
//!
//! Cross-batch zeros are placeholders, not distances: builders never
//! consult an entry without first checking both clusters share a batch.

use nalgebra::{DMatrix, Point3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::cluster::Clusters;
use crate::cpa::cluster_cpa;
use crate::error::{Error, Result};
use crate::voxel::{BatchId, VoxelSet};

/// How the distance between two clusters is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMode {
    /// Minimum voxel-to-voxel distance (closest point of approach).
    #[default]
    Voxel,
    /// Distance between cluster centroids.
    Centroid,
}

/// Dense `C × C` symmetric distance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    inner: DMatrix<f64>,
}

impl DistanceMatrix {
    /// All-zero matrix for `n` clusters.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            inner: DMatrix::zeros(n, n),
        }
    }

    /// Wrap an existing square matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if the matrix is not square.
    pub fn from_matrix(inner: DMatrix<f64>) -> Result<Self> {
        if inner.nrows() != inner.ncols() {
            return Err(Error::LengthMismatch {
                what: "distance matrix columns",
                expected: inner.nrows(),
                actual: inner.ncols(),
            });
        }
        Ok(Self { inner })
    }

    /// Build an `n × n` matrix from row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if `values.len() != n * n`.
    pub fn from_row_slice(n: usize, values: &[f64]) -> Result<Self> {
        if values.len() != n * n {
            return Err(Error::LengthMismatch {
                what: "distance matrix values",
                expected: n * n,
                actual: values.len(),
            });
        }
        Ok(Self {
            inner: DMatrix::from_row_slice(n, n, values),
        })
    }

    /// Number of clusters `C`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.nrows()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.nrows() == 0
    }

    /// Entry `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.inner[(i, j)]
    }

    #[must_use]
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.inner
    }

    /// Square sub-block over `ids` (rows and columns in the given order).
    #[must_use]
    pub fn submatrix(&self, ids: &[usize]) -> DMatrix<f64> {
        DMatrix::from_fn(ids.len(), ids.len(), |r, c| self.inner[(ids[r], ids[c])])
    }

    /// Check this matrix covers exactly `n` clusters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] otherwise.
    pub fn expect_len(&self, n: usize) -> Result<()> {
        if self.len() == n {
            Ok(())
        } else {
            Err(Error::LengthMismatch {
                what: "distance matrix",
                expected: n,
                actual: self.len(),
            })
        }
    }
}

/// Pairwise distance between every pair of clusters sharing a batch id.
///
/// Each row is computed independently on the rayon pool; only the upper
/// triangle is evaluated and then mirrored.
///
/// # Errors
///
/// - [`Error::LengthMismatch`] if `batch_ids` does not have one entry per cluster.
/// - [`Error::VoxelOutOfRange`] if a cluster references a missing voxel.
#[instrument(skip(voxels, clusters, batch_ids), fields(n_clusters = clusters.len()))]
pub fn inter_cluster_distance(
    voxels: &VoxelSet,
    clusters: &Clusters,
    batch_ids: &[BatchId],
    mode: DistanceMode,
) -> Result<DistanceMatrix> {
    let n = clusters.len();
    if batch_ids.len() != n {
        return Err(Error::LengthMismatch {
            what: "cluster batch ids",
            expected: n,
            actual: batch_ids.len(),
        });
    }
    clusters.validate(voxels.len())?;

    let centroids: Vec<Point3<f64>> = match mode {
        DistanceMode::Voxel => Vec::new(),
        DistanceMode::Centroid => (0..n)
            .into_par_iter()
            .map(|c| clusters.centroid(c, voxels))
            .collect(),
    };

    let pair_distance = |i: usize, j: usize| -> f64 {
        match mode {
            DistanceMode::Voxel => {
                cluster_cpa(voxels.positions(), clusters.members(i), clusters.members(j))
                    .map_or(0.0, |pair| pair.distance)
            }
            DistanceMode::Centroid => (centroids[i] - centroids[j]).norm(),
        }
    };

    let upper: Vec<Vec<(usize, f64)>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (i + 1..n)
                .filter(|&j| batch_ids[i] == batch_ids[j])
                .map(|j| (j, pair_distance(i, j)))
                .collect()
        })
        .collect();

    let mut inner = DMatrix::zeros(n, n);
    let mut pairs = 0_usize;
    for (i, row) in upper.into_iter().enumerate() {
        for (j, d) in row {
            inner[(i, j)] = d;
            inner[(j, i)] = d;
            pairs += 1;
        }
    }
    debug!(pairs, ?mode, "computed inter-cluster distances");

    Ok(DistanceMatrix { inner })
}
