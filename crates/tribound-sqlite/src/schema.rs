//! Canonical SQL for the graph store schema.
//!
//! Vertex and edge ids are stored as SQLite `INTEGER` (signed 64-bit); ids
//! above `i64::MAX` are rejected at insert time.

/// v1: vertices keyed by id with a label, undirected edges keyed by a
/// monotonically assigned handle.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS vertices (
    vertex_id INTEGER PRIMARY KEY,
    label TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS edges (
    edge_id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL REFERENCES vertices(vertex_id) ON DELETE CASCADE,
    target_id INTEGER NOT NULL REFERENCES vertices(vertex_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_vertices_label ON vertices(label, vertex_id);
CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(source_id);
CREATE INDEX IF NOT EXISTS idx_edges_target ON edges(target_id);
";

/// Indexes every migrated database must carry.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_vertices_label",
    "idx_edges_source",
    "idx_edges_target",
];
