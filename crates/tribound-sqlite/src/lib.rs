#![forbid(unsafe_code)]
//! SQLite-backed [`GraphStore`] for tribound.
//!
//! Vertices live in `vertices(vertex_id, label)` and undirected edges in
//! `edges(edge_id, source_id, target_id)`; the edge id is the
//! [`EdgeHandle`]. Every deletion runs in its own transaction, so it is
//! durable and visible to the next read before `delete_edge` returns.
//!
//! ```no_run
//! use tribound_core::TriangleService;
//! use tribound_sqlite::SqliteGraph;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut graph = SqliteGraph::open(std::path::Path::new("graph.sqlite3"))?;
//! let secure = TriangleService::default().triangle_count_secure(&mut graph, 2)?;
//! println!("{} edges removed", secure.report.deletions);
//! # Ok(())
//! # }
//! ```

pub mod migrations;
pub mod schema;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use tribound_core::{
    DeleteOutcome, EdgeHandle, GraphMutator, GraphView, Neighbor, StoreError, VertexId,
};

/// Busy timeout applied to every connection.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A graph stored in a single SQLite database.
#[derive(Debug)]
pub struct SqliteGraph {
    conn: Connection,
}

impl SqliteGraph {
    /// Open (or create) the database at `path` and migrate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, configured or
    /// migrated, or was written by a newer schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create graph db directory {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("open graph database {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// Fresh private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate or migrate the database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory graph database")?;
        Self::from_connection(conn)
    }

    /// Configure and migrate an already opened connection.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or migration fails.
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .context("configure sqlite pragmas")?;
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)
            .context("configure sqlite busy timeout")?;

        let found = migrations::current_schema_version(&conn).context("read schema version")?;
        if found > migrations::LATEST_SCHEMA_VERSION {
            bail!(
                "graph database schema v{found} is newer than supported v{}",
                migrations::LATEST_SCHEMA_VERSION
            );
        }
        migrations::migrate(&mut conn).context("apply graph migrations")?;

        Ok(Self { conn })
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert a vertex, or relabel it if it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on SQLite failure or an id above
    /// `i64::MAX`.
    pub fn insert_vertex(&self, vertex: VertexId, label: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO vertices (vertex_id, label) VALUES (?1, ?2)
                 ON CONFLICT(vertex_id) DO UPDATE SET label = excluded.label",
                params![to_sql(vertex.0)?, label],
            )
            .map_err(StoreError::backend)?;
        Ok(())
    }

    /// Insert an undirected edge between two existing vertices.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VertexNotFound`] if either endpoint is missing,
    /// [`StoreError::Backend`] on SQLite failure.
    pub fn insert_edge(&self, a: VertexId, b: VertexId) -> Result<EdgeHandle, StoreError> {
        for vertex in [a, b] {
            if !self.contains_vertex(vertex)? {
                return Err(StoreError::VertexNotFound(vertex));
            }
        }
        self.conn
            .execute(
                "INSERT INTO edges (source_id, target_id) VALUES (?1, ?2)",
                params![to_sql(a.0)?, to_sql(b.0)?],
            )
            .map_err(StoreError::backend)?;
        from_sql(self.conn.last_insert_rowid()).map(EdgeHandle)
    }

    /// Number of stored edges, across all labels.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on SQLite failure.
    pub fn edge_count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM edges", [], |row| row.get(0))
            .map_err(StoreError::backend)?;
        from_sql(count)
    }

    fn contains_vertex(&self, vertex: VertexId) -> Result<bool, StoreError> {
        self.conn
            .query_row(
                "SELECT 1 FROM vertices WHERE vertex_id = ?1",
                [to_sql(vertex.0)?],
                |_| Ok(()),
            )
            .optional()
            .map(|found| found.is_some())
            .map_err(StoreError::backend)
    }
}

impl GraphView for SqliteGraph {
    fn vertices(&self, label: &str) -> Result<Vec<VertexId>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT vertex_id FROM vertices WHERE label = ?1 ORDER BY vertex_id")
            .map_err(StoreError::backend)?;
        let rows = stmt
            .query_map([label], |row| row.get::<_, i64>(0))
            .map_err(StoreError::backend)?;

        let mut vertices = Vec::new();
        for row in rows {
            vertices.push(VertexId(from_sql(row.map_err(StoreError::backend)?)?));
        }
        Ok(vertices)
    }

    fn neighbors(&self, vertex: VertexId) -> Result<Vec<Neighbor>, StoreError> {
        if !self.contains_vertex(vertex)? {
            return Err(StoreError::VertexNotFound(vertex));
        }

        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT target_id, edge_id FROM edges WHERE source_id = ?1
                 UNION ALL
                 SELECT source_id, edge_id FROM edges WHERE target_id = ?1
                 ORDER BY edge_id",
            )
            .map_err(StoreError::backend)?;
        let rows = stmt
            .query_map([to_sql(vertex.0)?], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(StoreError::backend)?;

        let mut neighbors = Vec::new();
        for row in rows {
            let (other, edge) = row.map_err(StoreError::backend)?;
            neighbors.push(Neighbor {
                vertex_id: VertexId(from_sql(other)?),
                edge: EdgeHandle(from_sql(edge)?),
            });
        }
        Ok(neighbors)
    }
}

impl GraphMutator for SqliteGraph {
    fn delete_edge(&mut self, edge: EdgeHandle) -> Result<DeleteOutcome, StoreError> {
        let Ok(id) = i64::try_from(edge.0) else {
            return Ok(DeleteOutcome::NotFound);
        };

        let tx = self.conn.transaction().map_err(StoreError::backend)?;
        let removed = tx
            .execute("DELETE FROM edges WHERE edge_id = ?1", [id])
            .map_err(StoreError::backend)?;
        tx.commit().map_err(StoreError::backend)?;

        debug!(%edge, removed, "sqlite edge delete");
        Ok(if removed == 0 {
            DeleteOutcome::NotFound
        } else {
            DeleteOutcome::Deleted
        })
    }
}

fn to_sql(id: u64) -> Result<i64, StoreError> {
    i64::try_from(id).map_err(StoreError::backend)
}

fn from_sql(value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(StoreError::backend)
}
