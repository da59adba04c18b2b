#![forbid(unsafe_code)]
//! voxgraph-graph library.
//!
//! Batch-aware graph construction over clusters: six strategies sharing one
//! pruning rule and one symmetrization rule, plus the triangulation backend
//! the Delaunay strategy calls into.
//!
//! # Conventions
//!
//! - **Errors**: Use [`voxgraph_core::Result`] for fallible operations.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`, `warn!`).
//! - **Ordering**: outputs are deterministic; parallel sections collect in
//!   input order.

pub mod batch;
pub mod builders;
pub mod config;
pub mod prune;
pub mod strategy;
pub mod symmetrize;
pub mod triangulate;

pub use batch::{BatchGroup, BatchPartition};
pub use builders::{
    bipartite_graph, complete_graph, delaunay_graph, knn_graph, loop_graph, mst_graph,
};
pub use config::{DelaunayConfig, GraphConfig, StrategyKind};
pub use prune::prune_by_distance;
pub use strategy::{GraphInputs, GraphStrategy};
pub use symmetrize::{Directedness, Orientation, make_undirected, orient};
pub use triangulate::{JoggledDelaunay, Simplex, Triangulator};
