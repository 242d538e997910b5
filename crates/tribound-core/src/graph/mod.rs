//! Point-in-time adjacency snapshots of the analysed graph.
//!
//! # Pipeline
//!
//! ```text
//! GraphView (store)
//!        ↓  snapshot::AdjacencySnapshot::from_view(view, label)
//! AdjacencySnapshot (label-induced simple graph, sorted neighbor sets)
//!        ↓  metrics::triangles
//! VertexTriangleCounts / EdgeTriangleCounts
//! ```
//!
//! A snapshot is stale the moment any edge is deleted; the trimming loop
//! rebuilds it after every deletion.

pub mod snapshot;

pub use snapshot::AdjacencySnapshot;
