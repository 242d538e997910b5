//! Known-topology regression tests for exact triangle counting.
//!
//! Expected values are worked out by hand for each graph.

mod support;

use tribound_core::model::VertexId;
use tribound_core::store::MemoryGraph;
use tribound_core::{TriangleService, VertexTriangleCount};

fn counts(graph: &MemoryGraph) -> Vec<(u64, u64)> {
    TriangleService::default()
        .triangle_count(graph)
        .expect("count")
        .into_iter()
        .map(|c| (c.vertex_id.get(), c.triangle_count))
        .collect()
}

#[test]
fn chorded_four_cycle() {
    support::init_tracing();
    // A=0, B=1, C=2, D=3: A-B, B-C, C-A, C-D
    let graph = MemoryGraph::from_edges(&[(0, 1), (1, 2), (2, 0), (2, 3)]);
    assert_eq!(counts(&graph), vec![(0, 1), (1, 1), (2, 1), (3, 0)]);
}

#[test]
fn complete_four() {
    let graph = support::complete(4);
    assert_eq!(counts(&graph), vec![(0, 3), (1, 3), (2, 3), (3, 3)]);
}

#[test]
fn complete_five() {
    // C(4, 2) triangles through every vertex
    let graph = support::complete(5);
    assert!(counts(&graph).iter().all(|&(_, c)| c == 6));
}

#[test]
fn bowtie_centre_carries_both_triangles() {
    let graph = support::bowtie();
    assert_eq!(
        counts(&graph),
        vec![(0, 2), (1, 1), (2, 1), (3, 1), (4, 1)]
    );
}

#[test]
fn star_has_no_triangles() {
    let graph = support::star(6);
    let result = counts(&graph);
    assert_eq!(result.len(), 7);
    assert!(result.iter().all(|&(_, c)| c == 0));
}

#[test]
fn disjoint_triangles_count_one_each() {
    let graph = support::disjoint_triangles(4);
    let result = counts(&graph);
    assert_eq!(result.len(), 12);
    assert!(result.iter().all(|&(_, c)| c == 1));
}

#[test]
fn isolated_vertices_are_reported_with_zero() {
    let graph = MemoryGraph::with_vertices(&[7, 8], &[(0, 1), (1, 2), (2, 0)]);
    let result = counts(&graph);
    assert!(result.contains(&(7, 0)));
    assert!(result.contains(&(8, 0)));
}

#[test]
fn empty_graph_returns_no_records() {
    assert!(counts(&MemoryGraph::new()).is_empty());
}

#[test]
fn counting_is_idempotent() {
    let graph = support::bowtie();
    let service = TriangleService::default();
    let first = service.triangle_count(&graph).expect("first");
    let second = service.triangle_count(&graph).expect("second");
    assert_eq!(first, second);
    assert_eq!(graph.edge_count(), 6);
}

#[test]
fn edge_counts_on_bowtie() {
    let graph = support::bowtie();
    let edges = TriangleService::default()
        .edge_triangle_counts(&graph)
        .expect("edges");

    assert_eq!(edges.len(), 12);
    assert_eq!(edges.get(VertexId(0), VertexId(1)), Some(1));
    assert_eq!(edges.get(VertexId(3), VertexId(4)), Some(1));
    assert_eq!(edges.get(VertexId(1), VertexId(3)), None);
}

#[test]
fn histogram_of_bowtie() {
    let histogram = TriangleService::default()
        .triangle_histogram(&support::bowtie())
        .expect("histogram");
    assert_eq!(histogram.values().collect::<Vec<_>>(), vec![0, 4, 1]);
}

#[test]
fn records_serialize_with_camel_case_keys() {
    let record = VertexTriangleCount {
        vertex_id: VertexId(3),
        triangle_count: 2,
    };
    let json = serde_json::to_string(&record).expect("serialize");
    assert_eq!(json, r#"{"vertexId":3,"triangleCount":2}"#);
}
