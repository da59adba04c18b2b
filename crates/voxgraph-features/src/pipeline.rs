//! Event-level graph construction.
//!
//! # Overview
//!
//! [`EventGraph::build`] runs the whole per-event sequence from a single
//! [`EventGraphConfig`]:
//!
//! 1. Derive each cluster's batch id from its first voxel.
//! 2. Compute the inter-cluster distance matrix, but only when the strategy
//!    reads it (MST, kNN, or any strategy with a `max_dist`).
//! 3. Build the incidence matrix.
//! 4. Extract one cluster edge feature row per edge.
//!
//! Configuration lives in a TOML file with `[graph]` and `[distance]`
//! tables. Every key is optional:
//!
//! ```toml
//! [graph]
//! strategy = "knn"
//! k = 3
//!
//! [distance]
//! mode = "centroid"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use voxgraph_core::{
    BatchId, Clusters, DistanceMatrix, DistanceMode, IncidenceMatrix, VoxelSet,
    inter_cluster_distance,
};
use voxgraph_graph::{GraphConfig, GraphInputs};

use crate::features::{EdgeFeature, cluster_edge_features};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceConfig {
    #[serde(default)]
    pub mode: DistanceMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventGraphConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub distance: DistanceConfig,
}

/// Load an [`EventGraphConfig`] from a TOML file.
///
/// A missing file yields the defaults: a complete graph over voxel
/// distances.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<EventGraphConfig> {
    if !path.exists() {
        return Ok(EventGraphConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<EventGraphConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Graph, distances and features for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventGraph {
    /// Batch id per cluster.
    pub batch_ids: Vec<BatchId>,
    /// Present only when the strategy needed it.
    pub distances: Option<DistanceMatrix>,
    pub edges: IncidenceMatrix,
    /// One row per edge, in edge order.
    pub features: Vec<EdgeFeature>,
}

impl EventGraph {
    /// Run the configured pipeline over one event.
    ///
    /// `primaries` is only read by the bipartite strategy.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, input, or triangulation error
    /// encountered. The configuration is validated before any geometry is
    /// computed.
    #[instrument(skip_all, fields(voxels = voxels.len(), clusters = clusters.len()))]
    pub fn build(
        config: &EventGraphConfig,
        voxels: &VoxelSet,
        clusters: &Clusters,
        primaries: Option<&[bool]>,
    ) -> voxgraph_core::Result<Self> {
        let strategy = config.graph.strategy()?;
        clusters.validate(voxels.len())?;
        let batch_ids = clusters.batch_ids(voxels);

        let distances = if strategy.needs_distance_matrix() {
            Some(inter_cluster_distance(
                voxels,
                clusters,
                &batch_ids,
                config.distance.mode,
            )?)
        } else {
            debug!(strategy = strategy.name(), "skipping distance matrix");
            None
        };

        let mut inputs = GraphInputs::new(&batch_ids).with_geometry(voxels, clusters);
        if let Some(dist) = distances.as_ref() {
            inputs = inputs.with_distances(dist);
        }
        if let Some(mask) = primaries {
            inputs = inputs.with_primaries(mask);
        }

        let edges = strategy.build(&inputs)?;
        let features = cluster_edge_features(voxels, clusters, &edges)?;
        info!(
            strategy = strategy.name(),
            edges = edges.len(),
            "built event graph"
        );

        Ok(Self {
            batch_ids,
            distances,
            edges,
            features,
        })
    }
}
