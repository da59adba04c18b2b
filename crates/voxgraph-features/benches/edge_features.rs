use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use voxgraph_core::{Clusters, VoxelSet};
use voxgraph_features::{EventGraph, EventGraphConfig, cluster_edge_features};
use voxgraph_graph::complete_graph;

/// Cluster count, voxels per cluster.
const TIERS: &[(&str, usize, usize)] = &[("small", 16, 8), ("medium", 64, 16), ("large", 128, 32)];

fn synthetic_clusters(n_clusters: usize, per_cluster: usize, seed: u64) -> (VoxelSet, Clusters) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions = Vec::with_capacity(n_clusters * per_cluster);
    let mut lists = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        let center: [f64; 3] = [
            rng.gen_range(-1000.0..1000.0),
            rng.gen_range(-1000.0..1000.0),
            rng.gen_range(-1000.0..1000.0),
        ];
        let start = positions.len();
        for _ in 0..per_cluster {
            positions.push(Point3::new(
                center[0] + rng.gen_range(-10.0..10.0),
                center[1] + rng.gen_range(-10.0..10.0),
                center[2] + rng.gen_range(-10.0..10.0),
            ));
        }
        lists.push((start..positions.len()).collect::<Vec<_>>());
    }
    let clusters = Clusters::from_lists(&lists).expect("clusters");
    (VoxelSet::single_batch(positions), clusters)
}

fn bench_cluster_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("features.cluster_edges");
    for &(name, n_clusters, per_cluster) in TIERS {
        let (voxels, clusters) = synthetic_clusters(n_clusters, per_cluster, 0xFEA7_u64);
        let edges = complete_graph(&vec![0; n_clusters], None, None).expect("complete");
        group.throughput(Throughput::Elements(edges.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &edges, |b, edges| {
            b.iter(|| black_box(cluster_edge_features(&voxels, &clusters, edges)));
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("features.event_pipeline");
    let config = EventGraphConfig::default();
    for &(name, n_clusters, per_cluster) in TIERS {
        let (voxels, clusters) = synthetic_clusters(n_clusters, per_cluster, 0x91BE_u64);
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| black_box(EventGraph::build(&config, &voxels, &clusters, None)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cluster_features, bench_pipeline);
criterion_main!(benches);
