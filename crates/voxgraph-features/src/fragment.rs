//! Projection of externally labelled edges onto local fragment indices.

use std::collections::HashMap;

use tracing::{debug, instrument};
use voxgraph_core::IncidenceMatrix;

/// Translate `(id, id)` edges into local fragment indices.
///
/// `fragment_ids[k]` is the external id of local fragment `k`. An edge is
/// kept only when both of its ids appear in `fragment_ids`; the rest are
/// dropped without error. Kept edges retain their input order. When an id
/// occurs more than once in `fragment_ids`, its first position is used.
#[must_use]
#[instrument(skip_all, fields(edges = edges.len(), fragments = fragment_ids.len()))]
pub fn fragment_edges(edges: &[(i64, i64)], fragment_ids: &[i64]) -> IncidenceMatrix {
    let mut local: HashMap<i64, usize> = HashMap::with_capacity(fragment_ids.len());
    for (k, &id) in fragment_ids.iter().enumerate() {
        local.entry(id).or_insert(k);
    }

    let mapped: IncidenceMatrix = edges
        .iter()
        .filter_map(|(a, b)| Some((*local.get(a)?, *local.get(b)?)))
        .collect();
    debug!(kept = mapped.len(), dropped = edges.len() - mapped.len(), "mapped fragment edges");
    mapped
}
