//! Delaunay tetrahedralization behind a narrow interface.
//!
//! # Overview
//!
//! The Delaunay graph strategy only needs the list of simplices over a point
//! cloud. [`Triangulator`] isolates that call so the per-batch loop in
//! [`crate::builders::delaunay`] can be tested with a scripted triangulation
//! and so the backend can be swapped without touching the graph logic.
//!
//! [`JoggledDelaunay`] is the default backend, built on the `delaunay` crate
//! with its robust predicates. It normalizes the cloud to unit extent,
//! perturbs every coordinate with seeded uniform noise ("joggle"), and
//! tetrahedralizes. An attempt that fails to construct, or that leaves an
//! input point outside every cell, is repeated with ten times the jitter, up
//! to `max_attempts`.
//!
//! Triangulation is a serialization point: builders call it from a single
//! thread, one batch at a time.

use std::collections::HashMap;

use delaunay::core::builder::DelaunayTriangulationBuilder;
use delaunay::core::vertex::{Vertex, VertexBuilder};
use delaunay::geometry::kernel::RobustKernel;
use delaunay::geometry::point::Point;
use delaunay::geometry::traits::coordinate::Coordinate;
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};
use voxgraph_core::{Error, Result};

/// A tetrahedron as four indices into the triangulated point slice.
pub type Simplex = [usize; 4];

/// Minimum number of points a 3D triangulation accepts.
pub const MIN_POINTS: usize = 4;

/// Source of Delaunay simplices for a point cloud.
pub trait Triangulator {
    /// Simplices of the Delaunay tetrahedralization of `points`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for fewer than [`MIN_POINTS`]
    /// points and [`Error::Triangulation`] when the backend fails.
    fn simplices(&self, points: &[Point3<f64>]) -> Result<Vec<Simplex>>;
}

/// Seeded, jittered Delaunay tetrahedralization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoggledDelaunay {
    /// Initial jitter half-width, relative to the cloud's largest extent.
    pub jitter: f64,
    pub seed: u64,
    pub max_attempts: u32,
}

impl Default for JoggledDelaunay {
    fn default() -> Self {
        Self {
            jitter: 1.0e-9,
            seed: 0x5EED_DE1A_0A11_u64,
            max_attempts: 8,
        }
    }
}

impl JoggledDelaunay {
    /// Validate the jitter parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for a non-positive jitter or zero attempts.
    pub fn validate(&self) -> Result<()> {
        if !(self.jitter.is_finite() && self.jitter > 0.0) {
            return Err(Error::InvalidParameter {
                name: "delaunay.jitter",
                reason: format!("must be a positive finite number, got {}", self.jitter),
            });
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidParameter {
                name: "delaunay.max_attempts",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Center on the bounding-box midpoint and scale the largest extent to 1.
fn normalize(points: &[Point3<f64>]) -> Vec<Vector3<f64>> {
    let mut lo = Vector3::repeat(f64::INFINITY);
    let mut hi = Vector3::repeat(f64::NEG_INFINITY);
    for p in points {
        lo = lo.inf(&p.coords);
        hi = hi.sup(&p.coords);
    }
    let mid = (lo + hi) / 2.0;
    let extent = (hi - lo).max();
    let scale = if extent > 0.0 { extent } else { 1.0 };
    points.iter().map(|p| (p.coords - mid) / scale).collect()
}

/// One tetrahedralization of already joggled points.
///
/// Every vertex carries its input index, which is how cells are mapped back
/// to the caller's slice. Simplices come back with sorted indices, in sorted
/// order. The error is the reason the attempt was rejected.
fn tetrahedralize(points: &[Vector3<f64>]) -> std::result::Result<Vec<Simplex>, String> {
    let vertices = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            VertexBuilder::default()
                .point(Point::new([p.x, p.y, p.z]))
                .data(i)
                .build()
                .map_err(|err| format!("vertex {i}: {err}"))
        })
        .collect::<std::result::Result<Vec<Vertex<f64, usize, 3>>, String>>()?;

    let dt = DelaunayTriangulationBuilder::from_vertices(&vertices)
        .build_with_kernel::<_, ()>(&RobustKernel::new())
        .map_err(|err| format!("construction failed: {err}"))?;
    let tri = dt.as_triangulation();

    let index: HashMap<_, usize> = tri
        .vertices()
        .filter_map(|(key, vertex)| vertex.data.map(|i| (key, i)))
        .collect();

    let mut covered = vec![false; points.len()];
    let mut simplices = Vec::with_capacity(tri.number_of_cells());
    for (_, cell) in tri.cells() {
        let keys = cell.vertices();
        if keys.len() != MIN_POINTS {
            return Err(format!("cell with {} vertices", keys.len()));
        }
        let mut simplex: Simplex = [0; 4];
        for (slot, key) in simplex.iter_mut().zip(keys) {
            let i = *index
                .get(key)
                .ok_or_else(|| String::from("cell references an untagged vertex"))?;
            covered[i] = true;
            *slot = i;
        }
        simplex.sort_unstable();
        trace!(?simplex, "cell");
        simplices.push(simplex);
    }

    if let Some(missing) = covered.iter().position(|&c| !c) {
        return Err(format!("point {missing} is in no simplex"));
    }
    simplices.sort_unstable();
    Ok(simplices)
}

impl Triangulator for JoggledDelaunay {
    #[instrument(skip_all, fields(points = points.len()))]
    fn simplices(&self, points: &[Point3<f64>]) -> Result<Vec<Simplex>> {
        self.validate()?;
        if points.len() < MIN_POINTS {
            return Err(Error::InvalidParameter {
                name: "points",
                reason: format!(
                    "a 3D triangulation needs at least {MIN_POINTS} points, got {}",
                    points.len()
                ),
            });
        }

        let base = normalize(points);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut scale = self.jitter;
        let mut last_reason = String::new();

        for attempt in 1..=self.max_attempts {
            let joggled: Vec<Vector3<f64>> = base
                .iter()
                .map(|p| {
                    p + Vector3::new(
                        rng.gen_range(-scale..=scale),
                        rng.gen_range(-scale..=scale),
                        rng.gen_range(-scale..=scale),
                    )
                })
                .collect();

            match tetrahedralize(&joggled) {
                Ok(simplices) => {
                    debug!(attempt, jitter = scale, simplices = simplices.len(), "triangulated");
                    return Ok(simplices);
                }
                Err(reason) => {
                    warn!(
                        attempt,
                        jitter = scale,
                        %reason,
                        "degenerate triangulation, increasing jitter"
                    );
                    last_reason = reason;
                    scale *= 10.0;
                }
            }
        }

        Err(Error::Triangulation {
            points: points.len(),
            attempts: self.max_attempts,
            reason: last_reason,
        })
    }
}
