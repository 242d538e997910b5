//! Triangle metrics over an [`AdjacencySnapshot`](crate::graph::AdjacencySnapshot).
//!
//! # Overview
//!
//! The oracle is stateless: every function takes a snapshot and returns
//! freshly derived counts. Two conventions coexist and are deliberately
//! kept apart:
//!
//! - **Vertex counts** (`count_vertex_triangles`): for vertex `v`, every
//!   neighbor `u` contributes the neighbors `w` of `u` that are also
//!   neighbors of `v` with `id(w) > id(u)`.
//! - **Edge counts** (`count_edge_triangles`): for an ordered pair `(a, b)`
//!   with `b` adjacent to `a`, the number of common neighbors. Only used as
//!   a ranking signal by the trimmer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tribound_core::graph::AdjacencySnapshot;
//! use tribound_core::metrics::triangles::{count_all, count_vertex_triangles};
//!
//! let snapshot = AdjacencySnapshot::from_view(&store, "Person")?;
//! let counts = count_vertex_triangles(&snapshot);
//! let (counts, edge_counts) = count_all(&snapshot);
//! ```

pub mod triangles;

pub use triangles::{
    EdgeTriangleCounts, VertexTriangleCounts, count_all, count_edge_triangles,
    count_vertex_triangles,
};
