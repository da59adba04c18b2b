//! Primary/secondary bipartite graph.

use tracing::{debug, instrument};
use voxgraph_core::{BatchId, DistanceMatrix, Error, IncidenceMatrix, Result};

use crate::prune;
use crate::symmetrize::{Directedness, orient};

/// Connect every primary cluster to every non-primary cluster of its batch.
///
/// Edges are enumerated primary-major: for each primary `i` in ascending
/// order, every secondary `j` in ascending order. They start out oriented
/// primary → secondary and are then pruned and oriented per `directedness`.
///
/// # Errors
///
/// - [`Error::LengthMismatch`] if `primaries` does not match `batch_ids`.
/// - [`Error::MissingDistanceMatrix`] if `max_dist` is set without `dist`.
#[instrument(skip(batch_ids, primaries, dist), fields(clusters = batch_ids.len()))]
pub fn bipartite_graph(
    batch_ids: &[BatchId],
    primaries: &[bool],
    dist: Option<&DistanceMatrix>,
    max_dist: Option<f64>,
    directedness: Directedness,
) -> Result<IncidenceMatrix> {
    if primaries.len() != batch_ids.len() {
        return Err(Error::LengthMismatch {
            what: "primary mask",
            expected: batch_ids.len(),
            actual: primaries.len(),
        });
    }
    let pruning = prune::require_distance("bipartite", dist, max_dist, batch_ids.len())?;

    let (primary, secondary): (Vec<usize>, Vec<usize>) =
        (0..batch_ids.len()).partition(|&c| primaries[c]);

    let mut forward = IncidenceMatrix::empty();
    for &i in &primary {
        for &j in secondary.iter().filter(|&&j| batch_ids[j] == batch_ids[i]) {
            forward.push(i, j);
        }
    }
    debug!(
        primaries = primary.len(),
        edges = forward.len(),
        "enumerated primary-secondary pairs"
    );

    Ok(orient(&prune::apply(forward, pruning), directedness))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetrize::Orientation;

    #[test]
    fn single_primary_points_at_secondaries() {
        let edges = bipartite_graph(
            &[0, 0, 0],
            &[true, false, false],
            None,
            None,
            Directedness::default(),
        )
        .expect("bipartite");
        assert_eq!(edges.to_pairs(), vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn orientation_and_undirected() {
        let to_primary = bipartite_graph(
            &[0, 0, 0],
            &[true, false, false],
            None,
            None,
            Directedness::Directed(Orientation::Primary),
        )
        .expect("bipartite");
        assert_eq!(to_primary.to_pairs(), vec![(1, 0), (2, 0)]);

        let both = bipartite_graph(
            &[0, 0, 0],
            &[true, false, false],
            None,
            None,
            Directedness::Undirected,
        )
        .expect("bipartite");
        assert_eq!(both.to_pairs(), vec![(0, 1), (0, 2), (1, 0), (2, 0)]);
    }

    #[test]
    fn pairs_stay_in_batch_and_primary_major() {
        let edges = bipartite_graph(
            &[0, 1, 0, 1, 0],
            &[false, true, true, false, false],
            None,
            None,
            Directedness::default(),
        )
        .expect("bipartite");
        assert_eq!(edges.to_pairs(), vec![(1, 3), (2, 0), (2, 4)]);
    }

    #[test]
    fn pruning_and_degenerate_masks() {
        let dm = DistanceMatrix::from_row_slice(3, &[0.0, 1.0, 5.0, 1.0, 0.0, 2.0, 5.0, 2.0, 0.0])
            .expect("square");
        let edges = bipartite_graph(
            &[0, 0, 0],
            &[true, false, false],
            Some(&dm),
            Some(3.0),
            Directedness::default(),
        )
        .expect("pruned");
        assert_eq!(edges.to_pairs(), vec![(0, 1)]);

        for mask in [[true; 3], [false; 3]] {
            let edges = bipartite_graph(&[0, 0, 0], &mask, None, None, Directedness::default())
                .expect("bipartite");
            assert!(edges.is_empty());
        }
    }

    #[test]
    fn mask_length_is_checked() {
        assert!(matches!(
            bipartite_graph(&[0, 0], &[true], None, None, Directedness::default()),
            Err(Error::LengthMismatch { .. })
        ));
    }
}
