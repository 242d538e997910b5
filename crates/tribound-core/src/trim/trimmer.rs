//! The λ-bounding loop.
//!
//! ## Decision Policy
//!
//! For a vertex `v` with count `c > λ`, one iteration:
//!
//! 1. **Scanning**: find the neighbor with the highest vertex count (`best`,
//!    `temp`). Neighbors are visited in ascending id order and the first
//!    maximum wins.
//! 2. **Deciding**: if `temp ≥ λ`, the candidate is `best`. Otherwise the
//!    candidate is the neighbor whose edge count is closest to the excess
//!    `c − λ`, again first minimum in ascending id order. No candidate is
//!    `None`, never a vertex id.
//! 3. **Deleting**: remove the edge `{v, candidate}` through the store. A
//!    store answering `NotFound` is logged and the loop carries on.
//! 4. **Recounting**: rebuild the snapshot and recount every vertex and edge.
//!
//! ## Guarantee
//!
//! Deleting an edge never raises any vertex's count, so a vertex at or below
//! λ stays there for the rest of the run. The report lists a vertex as
//! unresolved exactly when its final count exceeds λ.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::policy::TrimPolicy;
use crate::error::TriboundError;
use crate::graph::AdjacencySnapshot;
use crate::metrics::{EdgeTriangleCounts, VertexTriangleCounts, count_all};
use crate::model::{EdgeHandle, Lambda, VertexId};
use crate::store::{DeleteOutcome, GraphStore};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Why a vertex could not be brought down to λ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedReason {
    /// Its last visit used up `max_iterations_per_vertex`.
    IterationBudget,
    /// The run deadline passed while it was still above λ.
    Deadline,
    /// No incident edge qualified for deletion.
    NoCandidate,
    /// It ended above λ without ever being visited over the bound, which
    /// only happens if the graph changed outside the run's lease.
    Unvisited,
}

/// A vertex left above λ at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedVertex {
    pub vertex_id: VertexId,
    pub triangle_count: u64,
    pub reason: UnresolvedReason,
}

/// Bookkeeping for one trimming run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimReport {
    pub lambda: u64,
    /// Passes over the vertex set.
    pub sweeps: usize,
    /// Loop iterations across all vertices.
    pub iterations: usize,
    /// Edges actually removed.
    pub deletions: usize,
    /// Deletions the store answered with `NotFound`.
    pub stale_deletions: usize,
    /// Full recounts after a deletion attempt.
    pub recounts: usize,
    /// Vertices above λ before any trimming.
    pub initial_over_bound: usize,
    /// `true` when no vertex is left above λ.
    pub converged: bool,
    pub elapsed: Duration,
    /// Vertices still above λ, in enumeration order.
    pub unresolved: Vec<UnresolvedVertex>,
}

/// Final counts plus the report of a trimming run.
#[derive(Debug, Clone)]
pub struct TrimOutcome {
    /// Counts recomputed after the last deletion.
    pub counts: VertexTriangleCounts,
    pub report: TrimReport,
}

// ---------------------------------------------------------------------------
// EdgeTrimmer
// ---------------------------------------------------------------------------

/// Brings every vertex's triangle count to at most λ by deleting edges.
#[derive(Debug, Clone, Copy)]
pub struct EdgeTrimmer<'a> {
    label: &'a str,
    lambda: Lambda,
    policy: &'a TrimPolicy,
}

impl<'a> EdgeTrimmer<'a> {
    #[must_use]
    pub const fn new(label: &'a str, lambda: Lambda, policy: &'a TrimPolicy) -> Self {
        Self {
            label,
            lambda,
            policy,
        }
    }

    /// Trim `store` until no vertex exceeds λ or the policy gives up.
    ///
    /// The caller's `&mut` borrow is the exclusive lease on the graph for
    /// the whole run.
    ///
    /// # Errors
    ///
    /// Returns [`TriboundError::Store`] for any backend failure; the run
    /// stops at that point and edges deleted so far stay deleted.
    #[instrument(skip(self, store), fields(lambda = self.lambda.get(), label = self.label))]
    pub fn trim<S: GraphStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<TrimOutcome, TriboundError> {
        let bound = self.lambda.get();
        let snapshot = AdjacencySnapshot::from_view(&*store, self.label)?;
        let (vertex_counts, edge_counts) = count_all(&snapshot);
        let initial_over_bound = vertex_counts.exceeding(bound).len();

        info!(
            vertices = snapshot.vertex_count(),
            edges = snapshot.edge_count(),
            initial_over_bound,
            "starting trimming run"
        );

        let mut run = TrimRun {
            store,
            label: self.label,
            bound,
            policy: self.policy,
            started: Instant::now(),
            snapshot,
            vertex_counts,
            edge_counts,
            iterations: 0,
            deletions: 0,
            stale_deletions: 0,
            recounts: 0,
            aborts: HashMap::new(),
        };

        let mut pending = run.snapshot.vertices().to_vec();
        let mut sweeps = 0;
        loop {
            sweeps += 1;
            let attempts_before = run.deletions + run.stale_deletions;

            for vertex in pending {
                match run.trim_vertex(vertex)? {
                    None => {
                        run.aborts.remove(&vertex);
                    }
                    Some(reason) => {
                        warn!(
                            %vertex,
                            count = run.vertex_counts.count(vertex),
                            ?reason,
                            sweep = sweeps,
                            "vertex left above bound"
                        );
                        run.aborts.insert(vertex, reason);
                    }
                }
            }

            pending = run.vertex_counts.exceeding(bound);
            if pending.is_empty() || sweeps >= self.policy.max_sweeps() {
                break;
            }
            if run.deletions + run.stale_deletions == attempts_before {
                debug!(sweep = sweeps, "sweep deleted nothing; stopping");
                break;
            }
            if run.deadline_passed() {
                break;
            }
        }

        Ok(run.finish(sweeps, initial_over_bound))
    }
}

// ---------------------------------------------------------------------------
// Run state
// ---------------------------------------------------------------------------

enum Phase {
    Scanning,
    Deciding {
        best: Option<(VertexId, u64)>,
        excess: u64,
    },
    Deleting {
        candidate: VertexId,
        edge: EdgeHandle,
    },
    Recounting,
}

struct TrimRun<'r, S: ?Sized> {
    store: &'r mut S,
    label: &'r str,
    bound: u64,
    policy: &'r TrimPolicy,
    started: Instant,
    snapshot: AdjacencySnapshot,
    vertex_counts: VertexTriangleCounts,
    edge_counts: EdgeTriangleCounts,
    iterations: usize,
    deletions: usize,
    stale_deletions: usize,
    recounts: usize,
    /// Last abort reason per vertex; cleared when a later visit resolves it.
    aborts: HashMap<VertexId, UnresolvedReason>,
}

impl<S: GraphStore + ?Sized> TrimRun<'_, S> {
    /// Run the state machine for one vertex. `None` means it is at or
    /// below λ.
    fn trim_vertex(
        &mut self,
        vertex: VertexId,
    ) -> Result<Option<UnresolvedReason>, TriboundError> {
        let mut visit_iterations = 0;
        let mut phase = Phase::Scanning;

        loop {
            phase = match phase {
                Phase::Scanning => {
                    let current = self.vertex_counts.count(vertex);
                    if current <= self.bound {
                        return Ok(None);
                    }
                    if visit_iterations >= self.policy.max_iterations_per_vertex {
                        return Ok(Some(UnresolvedReason::IterationBudget));
                    }
                    if self.deadline_passed() {
                        return Ok(Some(UnresolvedReason::Deadline));
                    }
                    visit_iterations += 1;
                    self.iterations += 1;
                    Phase::Deciding {
                        best: self.most_loaded_neighbor(vertex),
                        excess: current - self.bound,
                    }
                }
                Phase::Deciding { best, excess } => {
                    let chosen = self
                        .choose_candidate(vertex, best, excess)
                        .and_then(|c| self.snapshot.edge(vertex, c).map(|edge| (c, edge)));
                    match chosen {
                        Some((candidate, edge)) => Phase::Deleting { candidate, edge },
                        None => return Ok(Some(UnresolvedReason::NoCandidate)),
                    }
                }
                Phase::Deleting { candidate, edge } => {
                    match self.store.delete_edge(edge)? {
                        DeleteOutcome::Deleted => {
                            self.deletions += 1;
                            debug!(%vertex, neighbor = %candidate, %edge, "deleted edge");
                        }
                        DeleteOutcome::NotFound => {
                            self.stale_deletions += 1;
                            warn!(
                                %vertex,
                                neighbor = %candidate,
                                %edge,
                                "edge already gone; recounting"
                            );
                        }
                    }
                    Phase::Recounting
                }
                Phase::Recounting => {
                    self.recount()?;
                    Phase::Scanning
                }
            };
        }
    }

    /// Neighbor with the highest vertex count; first maximum wins.
    fn most_loaded_neighbor(&self, vertex: VertexId) -> Option<(VertexId, u64)> {
        let mut best: Option<(VertexId, u64)> = None;
        for neighbor in self.snapshot.neighbors(vertex) {
            let count = self.vertex_counts.count(neighbor);
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((neighbor, count));
            }
        }
        best
    }

    fn choose_candidate(
        &self,
        vertex: VertexId,
        best: Option<(VertexId, u64)>,
        excess: u64,
    ) -> Option<VertexId> {
        let (best, temp) = best?;
        if temp >= self.bound {
            return Some(best);
        }

        // Edge whose triangle contribution is closest to the excess.
        self.snapshot.neighbors(vertex).min_by_key(|&neighbor| {
            self.edge_counts
                .get(vertex, neighbor)
                .unwrap_or(0)
                .abs_diff(excess)
        })
    }

    fn recount(&mut self) -> Result<(), TriboundError> {
        self.snapshot = AdjacencySnapshot::from_view(&*self.store, self.label)?;
        (self.vertex_counts, self.edge_counts) = count_all(&self.snapshot);
        self.recounts += 1;
        Ok(())
    }

    fn deadline_passed(&self) -> bool {
        self.policy
            .deadline
            .is_some_and(|deadline| self.started.elapsed() >= deadline)
    }

    fn finish(self, sweeps: usize, initial_over_bound: usize) -> TrimOutcome {
        let unresolved: Vec<UnresolvedVertex> = self
            .vertex_counts
            .iter()
            .filter(|&(_, count)| count > self.bound)
            .map(|(vertex_id, triangle_count)| UnresolvedVertex {
                vertex_id,
                triangle_count,
                reason: self
                    .aborts
                    .get(&vertex_id)
                    .copied()
                    .unwrap_or(UnresolvedReason::Unvisited),
            })
            .collect();

        let report = TrimReport {
            lambda: self.bound,
            sweeps,
            iterations: self.iterations,
            deletions: self.deletions,
            stale_deletions: self.stale_deletions,
            recounts: self.recounts,
            initial_over_bound,
            converged: unresolved.is_empty(),
            elapsed: self.started.elapsed(),
            unresolved,
        };

        info!(
            sweeps = report.sweeps,
            deletions = report.deletions,
            stale = report.stale_deletions,
            unresolved = report.unresolved.len(),
            "trimming run finished"
        );

        TrimOutcome {
            counts: self.vertex_counts,
            report,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
