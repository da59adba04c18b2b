#![forbid(unsafe_code)]
//! voxgraph-core library.
//!
//! Data model and geometric primitives shared by the graph builders and the
//! edge-feature extractors.
//!
//! # Conventions
//!
//! - **Errors**: Use [`Result`] (alias over [`Error`]) for fallible operations.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`, `warn!`).
//! - **Parallelism**: per-pair and per-edge loops run on the `rayon` pool;
//!   every iteration writes to its own output slot.

pub mod cluster;
pub mod cpa;
pub mod distance;
pub mod error;
pub mod incidence;
pub mod voxel;

pub use cluster::Clusters;
pub use cpa::{ClosestPair, EdgeCpa, closest_pair, cluster_cpa, edge_cpa, edge_distances};
pub use distance::{DistanceMatrix, DistanceMode, inter_cluster_distance};
pub use error::{Error, Result};
pub use incidence::IncidenceMatrix;
pub use voxel::{BatchId, VoxelSet};
