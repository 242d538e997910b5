//! Snapshot construction from a [`GraphView`].
//!
//! ## Induced Subgraph
//!
//! Only vertices carrying the requested label take part. An edge whose other
//! endpoint lacks the label is left out, so every neighbor in the snapshot is
//! itself a snapshot vertex and has its own adjacency entry.
//!
//! ## Simple Graph
//!
//! Self-loops are dropped and repeated neighbor entries collapse to the
//! first reported edge handle. Neighbor sets are ordered by vertex id, which
//! fixes the enumeration order every tie-break downstream relies on.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::instrument;

use crate::error::StoreError;
use crate::model::{EdgeHandle, VertexId};
use crate::store::GraphView;

/// Adjacency of the label-induced subgraph at one point in time.
#[derive(Debug, Clone, Default)]
pub struct AdjacencySnapshot {
    /// Vertices in store enumeration order.
    order: Vec<VertexId>,
    /// Neighbor id → edge handle, per vertex.
    adjacency: HashMap<VertexId, BTreeMap<VertexId, EdgeHandle>>,
}

impl AdjacencySnapshot {
    /// Read the label-induced subgraph from `view`.
    ///
    /// # Errors
    ///
    /// Propagates any [`StoreError`] raised by the store.
    #[instrument(skip(view))]
    pub fn from_view<V: GraphView + ?Sized>(view: &V, label: &str) -> Result<Self, StoreError> {
        let listed = view.vertices(label)?;

        let mut seen = HashSet::with_capacity(listed.len());
        let order: Vec<VertexId> = listed.into_iter().filter(|v| seen.insert(*v)).collect();

        let mut adjacency = HashMap::with_capacity(order.len());
        for &vertex in &order {
            let mut neighbors = BTreeMap::new();
            for neighbor in view.neighbors(vertex)? {
                if neighbor.vertex_id == vertex || !seen.contains(&neighbor.vertex_id) {
                    continue;
                }
                neighbors.entry(neighbor.vertex_id).or_insert(neighbor.edge);
            }
            adjacency.insert(vertex, neighbors);
        }

        Ok(Self { order, adjacency })
    }

    /// Build a snapshot straight from adjacency lists, bypassing a store.
    ///
    /// Edges are mirrored, so listing `a → b` is enough. Handles are
    /// assigned in order of first appearance.
    #[must_use]
    pub fn from_edges(vertices: &[u64], edges: &[(u64, u64)]) -> Self {
        let mut order = Vec::new();
        let mut adjacency: HashMap<VertexId, BTreeMap<VertexId, EdgeHandle>> = HashMap::new();
        let mut touch = |v: VertexId, order: &mut Vec<VertexId>| {
            adjacency.entry(v).or_insert_with(|| {
                order.push(v);
                BTreeMap::new()
            });
        };
        for &v in vertices {
            touch(VertexId(v), &mut order);
        }
        for &(a, b) in edges {
            touch(VertexId(a), &mut order);
            touch(VertexId(b), &mut order);
        }

        let mut next_handle = 0_u64;
        for &(a, b) in edges {
            let (a, b) = (VertexId(a), VertexId(b));
            if a == b || adjacency.get(&a).is_some_and(|n| n.contains_key(&b)) {
                continue;
            }
            let handle = EdgeHandle(next_handle);
            next_handle += 1;
            adjacency.entry(a).or_default().insert(b, handle);
            adjacency.entry(b).or_default().insert(a, handle);
        }

        Self { order, adjacency }
    }

    /// Vertices in store enumeration order.
    #[must_use]
    pub fn vertices(&self) -> &[VertexId] {
        &self.order
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.order.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.adjacency.contains_key(&vertex)
    }

    /// Neighbors of `vertex` in ascending id order (empty if unknown).
    pub fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency
            .get(&vertex)
            .into_iter()
            .flat_map(|n| n.keys().copied())
    }

    #[must_use]
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.adjacency.get(&vertex).map_or(0, BTreeMap::len)
    }

    #[must_use]
    pub fn contains_edge(&self, a: VertexId, b: VertexId) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|neighbors| neighbors.contains_key(&b))
    }

    /// Handle of the edge `{a, b}`, if present.
    #[must_use]
    pub fn edge(&self, a: VertexId, b: VertexId) -> Option<EdgeHandle> {
        self.adjacency.get(&a).and_then(|n| n.get(&b)).copied()
    }

    pub(crate) fn neighbor_set(&self, vertex: VertexId) -> Option<&BTreeMap<VertexId, EdgeHandle>> {
        self.adjacency.get(&vertex)
    }
}
