//! Exact per-vertex and per-edge triangle counts.
//!
//! Both counts intersect sorted neighbor sets, so the cost of a full pass is
//! bounded by the sum of squared degrees. There is no incremental update:
//! callers recount from a fresh snapshot after every mutation.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{instrument, trace};

use crate::graph::AdjacencySnapshot;
use crate::model::{EdgeHandle, VertexId, VertexTriangleCount};

// ---------------------------------------------------------------------------
// VertexTriangleCounts
// ---------------------------------------------------------------------------

/// Triangle count per vertex, in snapshot enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexTriangleCounts {
    order: Vec<VertexId>,
    counts: HashMap<VertexId, u64>,
}

impl VertexTriangleCounts {
    /// Count for `vertex`, or `None` if it was not in the snapshot.
    #[must_use]
    pub fn get(&self, vertex: VertexId) -> Option<u64> {
        self.counts.get(&vertex).copied()
    }

    /// Count for `vertex`, treating unknown vertices as zero.
    #[must_use]
    pub fn count(&self, vertex: VertexId) -> u64 {
        self.get(vertex).unwrap_or(0)
    }

    /// Largest count, or `None` for an empty graph.
    #[must_use]
    pub fn max(&self) -> Option<u64> {
        self.counts.values().copied().max()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(vertex, count)` pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, u64)> + '_ {
        self.order.iter().map(|&v| (v, self.count(v)))
    }

    /// Vertices whose count exceeds `bound`, in enumeration order.
    #[must_use]
    pub fn exceeding(&self, bound: u64) -> Vec<VertexId> {
        self.iter()
            .filter(|&(_, count)| count > bound)
            .map(|(v, _)| v)
            .collect()
    }

    /// Output records in enumeration order.
    #[must_use]
    pub fn to_records(&self) -> Vec<VertexTriangleCount> {
        self.iter()
            .map(|(vertex_id, triangle_count)| VertexTriangleCount {
                vertex_id,
                triangle_count,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// EdgeTriangleCounts
// ---------------------------------------------------------------------------

/// Common-neighbor count per ordered adjacent pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EdgeTriangleCounts {
    #[serde(serialize_with = "serialize_pairs")]
    counts: HashMap<(VertexId, VertexId), u64>,
}

impl EdgeTriangleCounts {
    /// Count for the ordered pair `(a, b)`, or `None` if `b` is not a
    /// neighbor of `a`.
    #[must_use]
    pub fn get(&self, a: VertexId, b: VertexId) -> Option<u64> {
        self.counts.get(&(a, b)).copied()
    }

    /// Number of ordered pairs (twice the undirected edge count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// All `((a, b), count)` entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = ((VertexId, VertexId), u64)> + '_ {
        self.counts.iter().map(|(&pair, &count)| (pair, count))
    }
}

fn serialize_pairs<S: serde::Serializer>(
    counts: &HashMap<(VertexId, VertexId), u64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;

    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_unstable_by_key(|(pair, _)| **pair);

    let mut seq = serializer.serialize_seq(Some(sorted.len()))?;
    for ((a, b), count) in sorted {
        seq.serialize_element(&(a, b, count))?;
    }
    seq.end()
}

// ---------------------------------------------------------------------------
// Oracle
// ---------------------------------------------------------------------------

/// Per-vertex triangle counts under the ordered attribution rule.
///
/// For each vertex `v` and each neighbor `u`, the neighbors `w` of `u` that
/// are also neighbors of `v` and satisfy `id(w) > id(u)` are counted. Since
/// `w` is ordered against `u` only, every triangle is counted once at each of
/// its three corners.
#[must_use]
#[instrument(skip(snapshot), fields(vertices = snapshot.vertex_count()))]
pub fn count_vertex_triangles(snapshot: &AdjacencySnapshot) -> VertexTriangleCounts {
    let mut counts = HashMap::with_capacity(snapshot.vertex_count());

    for &v in snapshot.vertices() {
        let count = snapshot
            .neighbor_set(v)
            .map_or(0, |nv| vertex_contribution(snapshot, nv));
        counts.insert(v, count);
    }

    trace!(vertices = counts.len(), "vertex triangle counts computed");
    VertexTriangleCounts {
        order: snapshot.vertices().to_vec(),
        counts,
    }
}

/// Common-neighbor counts for every ordered adjacent pair `(a, b)`.
#[must_use]
#[instrument(skip(snapshot), fields(edges = snapshot.edge_count()))]
pub fn count_edge_triangles(snapshot: &AdjacencySnapshot) -> EdgeTriangleCounts {
    let mut counts = HashMap::with_capacity(snapshot.edge_count() * 2);

    for &a in snapshot.vertices() {
        let Some(na) = snapshot.neighbor_set(a) else {
            continue;
        };
        for &b in na.keys() {
            let shared = snapshot
                .neighbor_set(b)
                .map_or(0, |nb| common_neighbors(na, nb));
            counts.insert((a, b), shared);
        }
    }

    EdgeTriangleCounts { counts }
}

/// Vertex and edge counts from the same snapshot.
#[must_use]
pub fn count_all(snapshot: &AdjacencySnapshot) -> (VertexTriangleCounts, EdgeTriangleCounts) {
    (
        count_vertex_triangles(snapshot),
        count_edge_triangles(snapshot),
    )
}

fn vertex_contribution(
    snapshot: &AdjacencySnapshot,
    nv: &BTreeMap<VertexId, EdgeHandle>,
) -> u64 {
    let mut total = 0_u64;
    for &u in nv.keys() {
        let Some(nu) = snapshot.neighbor_set(u) else {
            continue;
        };
        // Neighbor sets are sorted, so only the tail above `u` qualifies.
        let above = nu
            .range((std::ops::Bound::Excluded(u), std::ops::Bound::Unbounded))
            .filter(|(w, _)| nv.contains_key(w))
            .count();
        total += above as u64;
    }
    total
}

fn common_neighbors(
    na: &BTreeMap<VertexId, EdgeHandle>,
    nb: &BTreeMap<VertexId, EdgeHandle>,
) -> u64 {
    let (small, large) = if na.len() <= nb.len() { (na, nb) } else { (nb, na) };
    small.keys().filter(|w| large.contains_key(w)).count() as u64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
