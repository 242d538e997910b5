use std::collections::BTreeSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use tribound_core::graph::AdjacencySnapshot;
use tribound_core::metrics::{VertexTriangleCounts, count_edge_triangles, count_vertex_triangles};
use tribound_core::model::VertexId;
use tribound_core::publish::{LaplaceMechanism, build_private_histogram};
use tribound_core::store::MemoryGraph;
use tribound_core::trim::{EdgeTrimmer, TrimPolicy};
use tribound_core::{Lambda, TriangleService};

const MAX_VERTEX: u64 = 12;

/// Simple undirected edge lists on `0..MAX_VERTEX`, normalized `a < b`.
fn arb_edges() -> impl Strategy<Value = Vec<(u64, u64)>> {
    prop::collection::vec((0..MAX_VERTEX, 0..MAX_VERTEX), 0..48).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    })
}

fn brute_force_triangles(edges: &[(u64, u64)]) -> u64 {
    let set: BTreeSet<_> = edges.iter().copied().collect();
    let mut total = 0;
    for a in 0..MAX_VERTEX {
        for b in (a + 1)..MAX_VERTEX {
            for c in (b + 1)..MAX_VERTEX {
                if set.contains(&(a, b)) && set.contains(&(b, c)) && set.contains(&(a, c)) {
                    total += 1;
                }
            }
        }
    }
    total
}

fn counts_of(edges: &[(u64, u64)]) -> VertexTriangleCounts {
    count_vertex_triangles(&AdjacencySnapshot::from_edges(&[], edges))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn bipartite_graphs_have_no_triangles(
        pairs in prop::collection::vec((0..6_u64, 0..6_u64), 0..30)
    ) {
        let edges: Vec<_> = pairs.into_iter().map(|(a, b)| (2 * a, 2 * b + 1)).collect();
        let counts = counts_of(&edges);
        prop_assert!(counts.iter().all(|(_, c)| c == 0));
    }

    #[test]
    fn vertex_counts_sum_to_three_per_triangle(edges in arb_edges()) {
        let total: u64 = counts_of(&edges).iter().map(|(_, c)| c).sum();
        prop_assert_eq!(total, 3 * brute_force_triangles(&edges));
    }

    #[test]
    fn edge_counts_sum_to_six_per_triangle(edges in arb_edges()) {
        let snapshot = AdjacencySnapshot::from_edges(&[], &edges);
        let total: u64 = count_edge_triangles(&snapshot).iter().map(|(_, c)| c).sum();
        prop_assert_eq!(total, 6 * brute_force_triangles(&edges));
    }

    #[test]
    fn store_and_snapshot_agree(edges in arb_edges()) {
        let graph = MemoryGraph::from_edges(&edges);
        let service = TriangleService::default();
        let first = service.vertex_triangle_counts(&graph).expect("count");
        let second = service.vertex_triangle_counts(&graph).expect("recount");
        prop_assert_eq!(&first, &second);
        for (v, c) in counts_of(&edges).iter() {
            prop_assert_eq!(first.count(v), c);
        }
    }

    #[test]
    fn trimming_bounds_or_flags_every_vertex(edges in arb_edges(), lambda in 0..4_u64) {
        let mut graph = MemoryGraph::from_edges(&edges);
        let policy = TrimPolicy::default();
        let outcome = EdgeTrimmer::new("Person", Lambda::from_u64(lambda), &policy)
            .trim(&mut graph)
            .expect("trim");

        let flagged: BTreeSet<VertexId> =
            outcome.report.unresolved.iter().map(|u| u.vertex_id).collect();
        for (v, c) in outcome.counts.iter() {
            prop_assert_eq!(flagged.contains(&v), c > lambda);
        }
        prop_assert_eq!(outcome.report.converged, flagged.is_empty());
        prop_assert_eq!(graph.edge_count() + outcome.report.deletions, edges.len());

        let recounted = TriangleService::default().vertex_triangle_counts(&graph).expect("count");
        prop_assert_eq!(recounted, outcome.counts);
    }

    #[test]
    fn private_histogram_has_lambda_plus_one_bins(
        edges in arb_edges(),
        lambda in 0..10_i64,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let histogram = build_private_histogram(
            &counts_of(&edges),
            lambda,
            0.5,
            &LaplaceMechanism,
            &mut rng,
        )
        .expect("histogram");
        prop_assert_eq!(i64::try_from(histogram.len()).expect("len"), lambda + 1);
        prop_assert!(histogram.values().all(f64::is_finite));
    }
}
