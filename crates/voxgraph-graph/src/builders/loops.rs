//! Self-loop graph.

use voxgraph_core::IncidenceMatrix;

/// One `(k, k)` edge per cluster. Batches are irrelevant.
#[must_use]
pub fn loop_graph(n: usize) -> IncidenceMatrix {
    (0..n).map(|k| (k, k)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_node_loops_once() {
        assert_eq!(loop_graph(3).to_pairs(), vec![(0, 0), (1, 1), (2, 2)]);
        assert!(loop_graph(0).is_empty());
    }
}
