//! Variable-length cluster membership stored as a flat arena.
//!
//! # Layout
//!
//! ```text
//! indices: [ 4 5 9 | 0 1 | 2 3 6 7 8 ]
//! offsets: [ 0       3     5          10 ]
//! ```
//!
//! Cluster `c` owns `indices[offsets[c]..offsets[c + 1]]`. The arena is
//! immutable after construction, so parallel readers share it freely.

use std::collections::HashSet;

use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};
use crate::voxel::{BatchId, VoxelSet};

/// Ordered voxel-index lists, one per cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clusters {
    indices: Vec<usize>,
    offsets: Vec<usize>,
}

impl Clusters {
    /// Pack per-cluster voxel lists into an arena.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyCluster`] if any list is empty.
    /// - [`Error::DuplicateVoxel`] if a list repeats a voxel index.
    pub fn from_lists<L: AsRef<[usize]>>(lists: &[L]) -> Result<Self> {
        let total = lists.iter().map(|l| l.as_ref().len()).sum();
        let mut indices = Vec::with_capacity(total);
        let mut offsets = Vec::with_capacity(lists.len() + 1);
        offsets.push(0);

        let mut seen = HashSet::new();
        for (cluster, list) in lists.iter().enumerate() {
            let list = list.as_ref();
            if list.is_empty() {
                return Err(Error::EmptyCluster(cluster));
            }
            seen.clear();
            for &voxel in list {
                if !seen.insert(voxel) {
                    return Err(Error::DuplicateVoxel { cluster, voxel });
                }
            }
            indices.extend_from_slice(list);
            offsets.push(indices.len());
        }

        Ok(Self { indices, offsets })
    }

    /// Check that every referenced voxel exists in a set of `n_voxels`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VoxelOutOfRange`] for the first offending index.
    pub fn validate(&self, n_voxels: usize) -> Result<()> {
        for (cluster, members) in self.iter().enumerate() {
            if let Some(&voxel) = members.iter().find(|&&v| v >= n_voxels) {
                return Err(Error::VoxelOutOfRange {
                    cluster,
                    voxel,
                    len: n_voxels,
                });
            }
        }
        Ok(())
    }

    /// Number of clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of voxel references across all clusters.
    #[must_use]
    pub fn total_members(&self) -> usize {
        self.indices.len()
    }

    /// Voxel indices of cluster `c`.
    ///
    /// # Panics
    ///
    /// Panics if `c >= self.len()`.
    #[must_use]
    pub fn members(&self, c: usize) -> &[usize] {
        &self.indices[self.offsets[c]..self.offsets[c + 1]]
    }

    #[must_use]
    pub fn get(&self, c: usize) -> Option<&[usize]> {
        (c < self.len()).then(|| self.members(c))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[usize]> + '_ {
        self.offsets
            .windows(2)
            .map(|w| &self.indices[w[0]..w[1]])
    }

    /// Batch id of every cluster, taken from its first voxel.
    ///
    /// Clusters never span batches upstream, so the first voxel is
    /// representative.
    #[must_use]
    pub fn batch_ids(&self, voxels: &VoxelSet) -> Vec<BatchId> {
        self.iter()
            .map(|members| voxels.batch_ids()[members[0]])
            .collect()
    }

    /// Mean position of the voxels in cluster `c`.
    #[must_use]
    pub fn centroid(&self, c: usize, voxels: &VoxelSet) -> Point3<f64> {
        let members = self.members(c);
        let sum: Vector3<f64> = members
            .iter()
            .map(|&v| voxels.positions()[v].coords)
            .sum();
        Point3::from(sum / members.len() as f64)
    }

    /// Positions of the voxels in cluster `c`, in membership order.
    #[must_use]
    pub fn positions(&self, c: usize, voxels: &VoxelSet) -> Vec<Point3<f64>> {
        self.members(c)
            .iter()
            .map(|&v| voxels.positions()[v])
            .collect()
    }
}
