//! Graph-construction strategies over clusters.
//!
//! # Overview
//!
//! Each strategy turns per-cluster batch ids (plus strategy-specific inputs)
//! into an [`IncidenceMatrix`](voxgraph_core::IncidenceMatrix) over cluster
//! ids:
//!
//! - **loop** (`loops`): every cluster connected to itself only.
//! - **complete** (`complete`): every in-batch pair.
//! - **delaunay** (`delaunay`): pairs whose voxels share a Delaunay simplex.
//! - **mst** (`mst`): minimum spanning tree of each batch's distance block.
//! - **knn** (`knn`): each cluster's `k` nearest in-batch neighbours.
//! - **bipartite** (`bipartite`): every primary to every in-batch secondary.
//!
//! Common rules:
//!
//! - No edge ever joins clusters with different batch ids.
//! - No qualifying edge is not an error: the result is the `(2, 0)` matrix.
//! - A `max_dist` threshold requires a distance matrix; its absence is an
//!   error raised before any edge is built.
//! - All strategies except a directed bipartite graph return both
//!   directions of every pair (see [`crate::symmetrize`]).

pub mod bipartite;
pub mod complete;
pub mod delaunay;
pub mod knn;
pub mod loops;
pub mod mst;

pub use bipartite::bipartite_graph;
pub use complete::complete_graph;
pub use delaunay::delaunay_graph;
pub use knn::knn_graph;
pub use loops::loop_graph;
pub use mst::mst_graph;
