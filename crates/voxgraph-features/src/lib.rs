#![forbid(unsafe_code)]
//! voxgraph-features library.
//!
//! Edge feature extraction over built graphs, projection of labelled edges
//! onto local fragments, and the event-level pipeline tying graph building
//! and feature extraction to a TOML configuration.
//!
//! # Conventions
//!
//! - **Errors**: library operations use [`voxgraph_core::Result`];
//!   configuration loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `debug!`).

pub mod features;
pub mod fragment;
pub mod pipeline;

pub use features::{
    EDGE_FEATURE_DIM, EdgeFeature, cluster_edge_features, to_matrix, voxel_edge_features,
};
pub use fragment::fragment_edges;
pub use pipeline::{DistanceConfig, EventGraph, EventGraphConfig, load_config};
