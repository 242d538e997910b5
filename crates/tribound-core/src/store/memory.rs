//! In-memory graph store backed by petgraph.
//!
//! Uses a [`StableUnGraph`] so node indices survive deletions. Edge handles
//! come from a per-graph counter and are never reissued: petgraph recycles
//! freed edge slots, so a raw `EdgeIndex` cannot serve as a handle.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;

use super::{DEFAULT_LABEL, DeleteOutcome, GraphMutator, GraphView, Neighbor};
use crate::error::StoreError;
use crate::model::{EdgeHandle, VertexId};

#[derive(Debug, Clone)]
struct VertexRecord {
    id: VertexId,
    label: String,
}

/// Undirected simple graph held in memory.
///
/// Vertices are enumerated in insertion order. Adding an edge that already
/// exists returns the existing handle instead of creating a parallel edge.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    graph: StableUnGraph<VertexRecord, EdgeHandle>,
    node_map: HashMap<VertexId, NodeIndex>,
    edge_map: HashMap<EdgeHandle, EdgeIndex>,
    next_edge: u64,
}

impl MemoryGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph whose vertices all carry [`DEFAULT_LABEL`].
    ///
    /// Vertices are created in order of first appearance in `edges`.
    #[must_use]
    pub fn from_edges(edges: &[(u64, u64)]) -> Self {
        let mut graph = Self::new();
        for &(a, b) in edges {
            graph.add_edge(VertexId(a), VertexId(b));
        }
        graph
    }

    /// Build a graph with an explicit vertex list (isolated vertices
    /// included) followed by `edges`.
    #[must_use]
    pub fn with_vertices(vertices: &[u64], edges: &[(u64, u64)]) -> Self {
        let mut graph = Self::new();
        for &id in vertices {
            graph.add_vertex(VertexId(id));
        }
        for &(a, b) in edges {
            graph.add_edge(VertexId(a), VertexId(b));
        }
        graph
    }

    /// Add a vertex with [`DEFAULT_LABEL`]; existing vertices are left as is.
    pub fn add_vertex(&mut self, id: VertexId) {
        self.add_labeled_vertex(id, DEFAULT_LABEL);
    }

    /// Add a vertex with an explicit label; existing vertices are left as is.
    pub fn add_labeled_vertex(&mut self, id: VertexId, label: &str) {
        if self.node_map.contains_key(&id) {
            return;
        }
        let idx = self.graph.add_node(VertexRecord {
            id,
            label: label.to_string(),
        });
        self.node_map.insert(id, idx);
    }

    /// Connect `a` and `b`, creating missing endpoints with the default label.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> EdgeHandle {
        self.add_vertex(a);
        self.add_vertex(b);
        let ia = self.node_map[&a];
        let ib = self.node_map[&b];
        if let Some(handle) = self
            .graph
            .find_edge(ia, ib)
            .and_then(|idx| self.graph.edge_weight(idx))
        {
            return *handle;
        }

        let handle = EdgeHandle(self.next_edge);
        self.next_edge += 1;
        let idx = self.graph.add_edge(ia, ib, handle);
        self.edge_map.insert(handle, idx);
        handle
    }

    #[must_use]
    pub fn contains_edge(&self, a: VertexId, b: VertexId) -> bool {
        match (self.node_map.get(&a), self.node_map.get(&b)) {
            (Some(&ia), Some(&ib)) => self.graph.contains_edge(ia, ib),
            _ => false,
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl GraphView for MemoryGraph {
    fn vertices(&self, label: &str) -> Result<Vec<VertexId>, StoreError> {
        Ok(self
            .graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
            .filter(|record| record.label == label)
            .map(|record| record.id)
            .collect())
    }

    fn neighbors(&self, vertex: VertexId) -> Result<Vec<Neighbor>, StoreError> {
        let idx = *self
            .node_map
            .get(&vertex)
            .ok_or(StoreError::VertexNotFound(vertex))?;

        let mut neighbors = Vec::new();
        for edge in self.graph.edges(idx) {
            let other = if edge.source() == idx {
                edge.target()
            } else {
                edge.source()
            };
            if let Some(record) = self.graph.node_weight(other) {
                neighbors.push(Neighbor {
                    vertex_id: record.id,
                    edge: *edge.weight(),
                });
            }
        }
        Ok(neighbors)
    }
}

impl GraphMutator for MemoryGraph {
    fn delete_edge(&mut self, edge: EdgeHandle) -> Result<DeleteOutcome, StoreError> {
        let Some(idx) = self.edge_map.remove(&edge) else {
            return Ok(DeleteOutcome::NotFound);
        };
        match self.graph.remove_edge(idx) {
            Some(_) => Ok(DeleteOutcome::Deleted),
            None => Ok(DeleteOutcome::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_lists_nothing() {
        let graph = MemoryGraph::new();
        assert!(graph.vertices(DEFAULT_LABEL).expect("vertices").is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn vertices_follow_insertion_order_and_label() {
        let mut graph = MemoryGraph::new();
        graph.add_vertex(VertexId(5));
        graph.add_labeled_vertex(VertexId(9), "Company");
        graph.add_vertex(VertexId(1));

        let people = graph.vertices(DEFAULT_LABEL).expect("vertices");
        assert_eq!(people, vec![VertexId(5), VertexId(1)]);
        let companies = graph.vertices("Company").expect("vertices");
        assert_eq!(companies, vec![VertexId(9)]);
    }

    #[test]
    fn neighbors_report_other_endpoint_both_ways() {
        let mut graph = MemoryGraph::new();
        let handle = graph.add_edge(VertexId(0), VertexId(1));

        let from_zero = graph.neighbors(VertexId(0)).expect("neighbors");
        let from_one = graph.neighbors(VertexId(1)).expect("neighbors");
        assert_eq!(
            from_zero,
            vec![Neighbor {
                vertex_id: VertexId(1),
                edge: handle
            }]
        );
        assert_eq!(
            from_one,
            vec![Neighbor {
                vertex_id: VertexId(0),
                edge: handle
            }]
        );
    }

    #[test]
    fn duplicate_edges_not_added() {
        let mut graph = MemoryGraph::new();
        let first = graph.add_edge(VertexId(1), VertexId(2));
        let second = graph.add_edge(VertexId(2), VertexId(1));
        assert_eq!(first, second);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn unknown_vertex_is_an_error() {
        let graph = MemoryGraph::from_edges(&[(1, 2)]);
        let err = graph.neighbors(VertexId(42)).expect_err("unknown vertex");
        assert!(matches!(err, StoreError::VertexNotFound(VertexId(42))));
    }

    #[test]
    fn delete_is_visible_and_second_delete_is_not_found() {
        let mut graph = MemoryGraph::from_edges(&[(0, 1), (1, 2)]);
        let handle = graph.neighbors(VertexId(0)).expect("neighbors")[0].edge;

        assert_eq!(
            graph.delete_edge(handle).expect("delete"),
            DeleteOutcome::Deleted
        );
        assert!(!graph.contains_edge(VertexId(0), VertexId(1)));
        assert!(graph.neighbors(VertexId(0)).expect("neighbors").is_empty());
        assert_eq!(
            graph.delete_edge(handle).expect("delete"),
            DeleteOutcome::NotFound
        );
        // The surviving edge keeps its handle.
        assert!(graph.contains_edge(VertexId(1), VertexId(2)));
    }

    #[test]
    fn deleted_handle_is_not_reissued_to_a_new_edge() {
        let mut graph = MemoryGraph::from_edges(&[(0, 1), (1, 2)]);
        let stale = graph.neighbors(VertexId(0)).expect("neighbors")[0].edge;
        assert_eq!(
            graph.delete_edge(stale).expect("delete"),
            DeleteOutcome::Deleted
        );

        let fresh = graph.add_edge(VertexId(5), VertexId(6));
        assert_ne!(fresh, stale);
        assert_eq!(
            graph.delete_edge(stale).expect("stale delete"),
            DeleteOutcome::NotFound
        );
        assert!(graph.contains_edge(VertexId(5), VertexId(6)));
        assert_eq!(graph.edge_count(), 2);
    }
}
