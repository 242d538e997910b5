//! Collaborator interfaces over the graph store.
//!
//! # Overview
//!
//! The engine never owns the graph. It reads through [`GraphView`] and
//! removes edges through [`GraphMutator`]; everything else (persistence,
//! indexing, transactions) belongs to the store. A store must make each
//! deletion visible to subsequent reads before `delete_edge` returns.
//!
//! Two stores ship with the workspace:
//!
//! - [`memory::MemoryGraph`]: petgraph-backed, used by tests and benches.
//! - `tribound_sqlite::SqliteGraph`: SQLite tables, one transaction per
//!   deletion.
//!
//! Mutating runs hold the store as `&mut S`, which is the exclusive lease
//! for the whole run. [`lease::SharedGraph`] provides the same guarantee
//! for stores shared across threads.

pub mod lease;
pub mod memory;

use serde::Serialize;

use crate::error::StoreError;
use crate::model::{EdgeHandle, VertexId};

pub use lease::{GraphLease, SharedGraph};
pub use memory::MemoryGraph;

/// Vertex label analysed when the configuration does not name one.
pub const DEFAULT_LABEL: &str = "Person";

/// One incident edge as reported by [`GraphView::neighbors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Neighbor {
    pub vertex_id: VertexId,
    pub edge: EdgeHandle,
}

/// Result of a single edge deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The edge existed and is gone for every later read.
    Deleted,
    /// Nothing to delete: the edge was already removed or the handle is stale.
    NotFound,
}

/// Read access to the graph.
pub trait GraphView {
    /// Enumerate the ids of all vertices carrying `label`.
    ///
    /// The sequence is finite and restartable: calling again yields the
    /// vertices of the graph as it is at that moment.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be read.
    fn vertices(&self, label: &str) -> Result<Vec<VertexId>, StoreError>;

    /// Enumerate the edges incident to `vertex` with their other endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VertexNotFound`] for unknown vertices and
    /// [`StoreError::Backend`] for backend failures.
    fn neighbors(&self, vertex: VertexId) -> Result<Vec<Neighbor>, StoreError>;
}

/// Write access to the graph: the engine only ever deletes edges.
pub trait GraphMutator {
    /// Delete one edge, atomically visible to reads before returning.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] only for genuine backend failures; an edge
    /// that is already gone is reported as [`DeleteOutcome::NotFound`].
    fn delete_edge(&mut self, edge: EdgeHandle) -> Result<DeleteOutcome, StoreError>;
}

/// A store that can be both read and trimmed.
pub trait GraphStore: GraphView + GraphMutator {}

impl<T: GraphView + GraphMutator + ?Sized> GraphStore for T {}
