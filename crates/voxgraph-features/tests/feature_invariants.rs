use nalgebra::Point3;
use proptest::prelude::*;
use voxgraph_core::{Clusters, IncidenceMatrix, VoxelSet};
use voxgraph_features::{
    EDGE_FEATURE_DIM, EdgeFeature, cluster_edge_features, fragment_edges, voxel_edge_features,
};

const EPS: f64 = 1e-9;

fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    (-100.0_f64..100.0, -100.0_f64..100.0, -100.0_f64..100.0)
        .prop_map(|(x, y, z)| Point3::new(x, y, z))
}

/// Voxels split into consecutive clusters, plus random cluster edges.
fn arb_clustered() -> impl Strategy<Value = (VoxelSet, Clusters, IncidenceMatrix)> {
    prop::collection::vec(prop::collection::vec(arb_point(), 1..6), 1..6).prop_flat_map(|groups| {
        let n_clusters = groups.len();
        let mut positions = Vec::new();
        let mut lists = Vec::new();
        for group in groups {
            let start = positions.len();
            positions.extend(group);
            lists.push((start..positions.len()).collect::<Vec<_>>());
        }
        let voxels = VoxelSet::single_batch(positions);
        let clusters = Clusters::from_lists(&lists).expect("clusters");
        prop::collection::vec((0..n_clusters, 0..n_clusters), 0..12).prop_map(move |pairs| {
            (
                voxels.clone(),
                clusters.clone(),
                IncidenceMatrix::from_pairs(&pairs),
            )
        })
    })
}

fn check_row(row: &EdgeFeature) -> Result<(), TestCaseError> {
    let source = nalgebra::Vector3::new(row[0], row[1], row[2]);
    let target = nalgebra::Vector3::new(row[3], row[4], row[5]);
    let unit = nalgebra::Vector3::new(row[6], row[7], row[8]);
    let distance = row[9];

    prop_assert!(distance >= 0.0);
    prop_assert!((distance - (source - target).norm()).abs() < EPS);
    if distance == 0.0 {
        prop_assert!(unit.iter().all(|&u| u == 0.0));
    } else {
        prop_assert!((unit.norm() - 1.0).abs() < EPS);
    }

    let mut trace = 0.0;
    for r in 0..3 {
        for c in 0..3 {
            let b = row[10 + 3 * r + c];
            prop_assert!((b - unit[r] * unit[c]).abs() < EPS);
            prop_assert!((b - row[10 + 3 * c + r]).abs() < EPS);
        }
        trace += row[10 + 4 * r];
    }
    prop_assert!(trace <= 1.0 + EPS);
    Ok(())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn cluster_rows_satisfy_geometric_invariants((voxels, clusters, edges) in arb_clustered()) {
        let rows = cluster_edge_features(&voxels, &clusters, &edges).expect("features");
        prop_assert_eq!(rows.len(), edges.len());
        for (row, (s, t)) in rows.iter().zip(edges.iter()) {
            check_row(row)?;
            if s == t {
                prop_assert_eq!(row[9], 0.0);
            }
        }
    }

    #[test]
    fn voxel_rows_satisfy_geometric_invariants(
        points in prop::collection::vec(arb_point(), 1..10),
        raw in prop::collection::vec((0_usize..10, 0_usize..10), 0..16),
    ) {
        let n = points.len();
        let pairs: Vec<(usize, usize)> = raw.into_iter().map(|(a, b)| (a % n, b % n)).collect();
        let voxels = VoxelSet::single_batch(points);
        let edges = IncidenceMatrix::from_pairs(&pairs);
        let rows = voxel_edge_features(&voxels, &edges).expect("features");
        prop_assert_eq!(rows.len(), pairs.len());
        for row in &rows {
            prop_assert_eq!(row.len(), EDGE_FEATURE_DIM);
            check_row(row)?;
        }
    }

    #[test]
    fn fragment_mapping_is_idempotent(
        edges in prop::collection::vec((0_i64..20, 0_i64..20), 0..30),
        ids in prop::collection::vec(0_i64..20, 0..12),
    ) {
        let once = fragment_edges(&edges, &ids);
        let as_ids: Vec<(i64, i64)> = once
            .iter()
            .map(|(a, b)| (ids[a], ids[b]))
            .collect();
        let twice = fragment_edges(&as_ids, &ids);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.len() <= edges.len());
    }
}
