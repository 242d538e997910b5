//! Graph builders shared by the integration tests.
#![allow(dead_code)]

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tribound_core::store::MemoryGraph;

/// Install a test subscriber when `TRIBOUND_LOG` is set; repeated calls are
/// harmless.
pub fn init_tracing() {
    if let Ok(filter) = EnvFilter::try_from_env("TRIBOUND_LOG") {
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .compact()
            .try_init();
    }
}

/// `k` vertex-disjoint triangles on ids `3i, 3i + 1, 3i + 2`.
pub fn disjoint_triangles(k: u64) -> MemoryGraph {
    let edges: Vec<_> = (0..k)
        .flat_map(|i| {
            let base = 3 * i;
            [(base, base + 1), (base + 1, base + 2), (base + 2, base)]
        })
        .collect();
    MemoryGraph::from_edges(&edges)
}

/// Complete graph on ids `0..n`.
pub fn complete(n: u64) -> MemoryGraph {
    let edges: Vec<_> = (0..n)
        .flat_map(|a| ((a + 1)..n).map(move |b| (a, b)))
        .collect();
    MemoryGraph::from_edges(&edges)
}

/// Two triangles sharing vertex 0.
pub fn bowtie() -> MemoryGraph {
    MemoryGraph::from_edges(&[(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 0)])
}

/// Hub 0 joined to `leaves` leaves, no other edges.
pub fn star(leaves: u64) -> MemoryGraph {
    let edges: Vec<_> = (1..=leaves).map(|leaf| (0, leaf)).collect();
    MemoryGraph::from_edges(&edges)
}
