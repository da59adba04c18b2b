//! Immutable per-event voxel storage.
//!
//! Voxels are stored column-wise: positions live in one contiguous
//! `Vec<Point3<f64>>` so closest-point loops stream through memory, and the
//! auxiliary scalar attributes sit in parallel columns.

use nalgebra::Point3;

use crate::error::{Error, Result};

/// Integer tag separating independent events within one batch of data.
pub type BatchId = i64;

/// Number of columns in the raw row layout accepted by [`VoxelSet::from_rows`]:
/// `[x, y, z, batch, value, instance, group, semantic]`.
pub const VOXEL_ROW_WIDTH: usize = 8;

/// Sentinel stored for attributes that were not provided.
pub const UNLABELED: i64 = -1;

/// An ordered set of voxels for one batch of events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoxelSet {
    positions: Vec<Point3<f64>>,
    batch_ids: Vec<BatchId>,
    values: Vec<f64>,
    instance_ids: Vec<i64>,
    group_ids: Vec<i64>,
    semantic_types: Vec<i64>,
}

impl VoxelSet {
    /// Build a voxel set from positions and per-voxel batch ids.
    ///
    /// Values default to `0.0` and labels to [`UNLABELED`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if the two columns differ in length.
    pub fn from_points(positions: Vec<Point3<f64>>, batch_ids: Vec<BatchId>) -> Result<Self> {
        if positions.len() != batch_ids.len() {
            return Err(Error::LengthMismatch {
                what: "voxel batch ids",
                expected: positions.len(),
                actual: batch_ids.len(),
            });
        }
        let n = positions.len();
        Ok(Self {
            positions,
            batch_ids,
            values: vec![0.0; n],
            instance_ids: vec![UNLABELED; n],
            group_ids: vec![UNLABELED; n],
            semantic_types: vec![UNLABELED; n],
        })
    }

    /// Build a voxel set where every voxel belongs to batch 0.
    #[must_use]
    pub fn single_batch(positions: Vec<Point3<f64>>) -> Self {
        let n = positions.len();
        Self {
            positions,
            batch_ids: vec![0; n],
            values: vec![0.0; n],
            instance_ids: vec![UNLABELED; n],
            group_ids: vec![UNLABELED; n],
            semantic_types: vec![UNLABELED; n],
        }
    }

    /// Build a voxel set from `[x, y, z, batch, value, instance, group, semantic]`
    /// rows, the layout produced by the upstream voxelization stage.
    ///
    /// Integer columns are truncated toward zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_rows(rows: &[[f64; VOXEL_ROW_WIDTH]]) -> Self {
        let mut set = Self {
            positions: Vec::with_capacity(rows.len()),
            batch_ids: Vec::with_capacity(rows.len()),
            values: Vec::with_capacity(rows.len()),
            instance_ids: Vec::with_capacity(rows.len()),
            group_ids: Vec::with_capacity(rows.len()),
            semantic_types: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            set.positions.push(Point3::new(row[0], row[1], row[2]));
            set.batch_ids.push(row[3] as BatchId);
            set.values.push(row[4]);
            set.instance_ids.push(row[5] as i64);
            set.group_ids.push(row[6] as i64);
            set.semantic_types.push(row[7] as i64);
        }
        set
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// All voxel positions, indexed by voxel id.
    #[must_use]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    #[must_use]
    pub fn position(&self, voxel: usize) -> Option<&Point3<f64>> {
        self.positions.get(voxel)
    }

    #[must_use]
    pub fn batch_ids(&self) -> &[BatchId] {
        &self.batch_ids
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn instance_ids(&self) -> &[i64] {
        &self.instance_ids
    }

    #[must_use]
    pub fn group_ids(&self) -> &[i64] {
        &self.group_ids
    }

    #[must_use]
    pub fn semantic_types(&self) -> &[i64] {
        &self.semantic_types
    }
}
