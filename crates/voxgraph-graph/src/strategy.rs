//! Closed set of graph strategies with a uniform entry point.
//!
//! A [`GraphStrategy`] is chosen once at configuration time and carries its
//! own parameters. [`GraphStrategy::build`] dispatches on the variant and
//! pulls the inputs it needs from a [`GraphInputs`]; a missing input is a
//! [`Error::MissingInput`] rather than a silent fallback.

use std::fmt;

use tracing::instrument;
use voxgraph_core::{BatchId, Clusters, DistanceMatrix, Error, IncidenceMatrix, Result, VoxelSet};

use crate::builders::{
    bipartite_graph, complete_graph, delaunay_graph, knn_graph, loop_graph, mst_graph,
};
use crate::symmetrize::Directedness;
use crate::triangulate::JoggledDelaunay;

/// A fully-parameterized graph construction strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphStrategy {
    Loop,
    Complete {
        max_dist: Option<f64>,
    },
    Delaunay {
        max_dist: Option<f64>,
        triangulator: JoggledDelaunay,
    },
    Mst {
        max_dist: Option<f64>,
    },
    Knn {
        k: usize,
    },
    Bipartite {
        max_dist: Option<f64>,
        directedness: Directedness,
    },
}

impl Default for GraphStrategy {
    fn default() -> Self {
        Self::Complete { max_dist: None }
    }
}

impl fmt::Display for GraphStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a strategy may consume. Only `batch_ids` is always required.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphInputs<'a> {
    /// One batch id per cluster.
    pub batch_ids: &'a [BatchId],
    pub dist: Option<&'a DistanceMatrix>,
    /// Delaunay only.
    pub voxels: Option<&'a VoxelSet>,
    /// Delaunay only.
    pub clusters: Option<&'a Clusters>,
    /// Bipartite only.
    pub primaries: Option<&'a [bool]>,
}

impl<'a> GraphInputs<'a> {
    #[must_use]
    pub const fn new(batch_ids: &'a [BatchId]) -> Self {
        Self {
            batch_ids,
            dist: None,
            voxels: None,
            clusters: None,
            primaries: None,
        }
    }

    #[must_use]
    pub const fn with_distances(mut self, dist: &'a DistanceMatrix) -> Self {
        self.dist = Some(dist);
        self
    }

    #[must_use]
    pub const fn with_geometry(mut self, voxels: &'a VoxelSet, clusters: &'a Clusters) -> Self {
        self.voxels = Some(voxels);
        self.clusters = Some(clusters);
        self
    }

    #[must_use]
    pub const fn with_primaries(mut self, primaries: &'a [bool]) -> Self {
        self.primaries = Some(primaries);
        self
    }
}

fn require<T>(value: Option<T>, strategy: &'static str, input: &'static str) -> Result<T> {
    value.ok_or(Error::MissingInput { strategy, input })
}

impl GraphStrategy {
    /// Lowercase strategy name, as used in configuration files.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Loop => "loop",
            Self::Complete { .. } => "complete",
            Self::Delaunay { .. } => "delaunay",
            Self::Mst { .. } => "mst",
            Self::Knn { .. } => "knn",
            Self::Bipartite { .. } => "bipartite",
        }
    }

    /// The pruning threshold, if the strategy has one set.
    #[must_use]
    pub const fn max_dist(&self) -> Option<f64> {
        match self {
            Self::Complete { max_dist }
            | Self::Delaunay { max_dist, .. }
            | Self::Mst { max_dist }
            | Self::Bipartite { max_dist, .. } => *max_dist,
            Self::Loop | Self::Knn { .. } => None,
        }
    }

    /// Whether [`build`](Self::build) will read a distance matrix.
    #[must_use]
    pub const fn needs_distance_matrix(&self) -> bool {
        matches!(self, Self::Mst { .. } | Self::Knn { .. }) || self.max_dist().is_some()
    }

    /// Build the incidence matrix for `inputs`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingInput`] if a strategy-specific input is absent.
    /// - Any error the underlying builder reports.
    #[instrument(
        skip(self, inputs),
        fields(strategy = self.name(), clusters = inputs.batch_ids.len())
    )]
    pub fn build(&self, inputs: &GraphInputs<'_>) -> Result<IncidenceMatrix> {
        let batch_ids = inputs.batch_ids;
        match *self {
            Self::Loop => Ok(loop_graph(batch_ids.len())),
            Self::Complete { max_dist } => complete_graph(batch_ids, inputs.dist, max_dist),
            Self::Delaunay {
                max_dist,
                ref triangulator,
            } => {
                let voxels = require(inputs.voxels, "delaunay", "voxels")?;
                let clusters = require(inputs.clusters, "delaunay", "clusters")?;
                delaunay_graph(voxels, clusters, batch_ids, inputs.dist, max_dist, triangulator)
            }
            Self::Mst { max_dist } => mst_graph(batch_ids, inputs.dist, max_dist),
            Self::Knn { k } => knn_graph(batch_ids, k, inputs.dist),
            Self::Bipartite {
                max_dist,
                directedness,
            } => {
                let primaries = require(inputs.primaries, "bipartite", "primaries")?;
                bipartite_graph(batch_ids, primaries, inputs.dist, max_dist, directedness)
            }
        }
    }
}
