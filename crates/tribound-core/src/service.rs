//! Caller-facing operations.
//!
//! [`TriangleService`] owns the engine configuration and a noise mechanism and
//! sequences snapshot, oracle, trimmer and publisher for each operation. Every
//! operation takes the graph explicitly; the service holds no graph state.

use rand::RngCore;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::EngineConfig;
use crate::error::TriboundError;
use crate::graph::AdjacencySnapshot;
use crate::metrics::{
    EdgeTriangleCounts, VertexTriangleCounts, count_edge_triangles, count_vertex_triangles,
};
use crate::model::{Epsilon, Lambda, VertexTriangleCount};
use crate::publish::{
    Histogram, LaplaceMechanism, NoiseMechanism, build_histogram, noise_scale, perturb_histogram,
};
use crate::store::{GraphStore, GraphView};
use crate::trim::{EdgeTrimmer, TrimPolicy, TrimReport};

/// Result of [`TriangleService::triangle_count_secure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecureCounts {
    /// Per-vertex counts recomputed after trimming, in enumeration order.
    pub counts: Vec<VertexTriangleCount>,
    pub report: TrimReport,
}

/// Result of [`TriangleService::triangle_histogram_secure`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecureHistogram {
    /// Exactly λ + 1 noisy bins, steps `0..=λ`.
    pub histogram: Histogram<f64>,
    pub report: TrimReport,
}

#[derive(Debug, Clone)]
pub struct TriangleService<M = LaplaceMechanism> {
    config: EngineConfig,
    policy: TrimPolicy,
    mechanism: M,
}

impl TriangleService<LaplaceMechanism> {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_mechanism(config, LaplaceMechanism)
    }
}

impl Default for TriangleService<LaplaceMechanism> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<M: NoiseMechanism> TriangleService<M> {
    #[must_use]
    pub fn with_mechanism(config: EngineConfig, mechanism: M) -> Self {
        let policy = config.trim.policy();
        Self {
            config,
            policy,
            mechanism,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn policy(&self) -> &TrimPolicy {
        &self.policy
    }

    /// Exact per-vertex triangle counts, one record per labelled vertex.
    ///
    /// # Errors
    ///
    /// Propagates store failures unmodified.
    pub fn triangle_count<V: GraphView + ?Sized>(
        &self,
        graph: &V,
    ) -> Result<Vec<VertexTriangleCount>, TriboundError> {
        Ok(self.vertex_triangle_counts(graph)?.to_records())
    }

    /// Like [`Self::triangle_count`], keeping the indexed form.
    ///
    /// # Errors
    ///
    /// Propagates store failures unmodified.
    #[instrument(skip(self, graph), fields(label = %self.config.label))]
    pub fn vertex_triangle_counts<V: GraphView + ?Sized>(
        &self,
        graph: &V,
    ) -> Result<VertexTriangleCounts, TriboundError> {
        let snapshot = AdjacencySnapshot::from_view(graph, &self.config.label)?;
        let counts = count_vertex_triangles(&snapshot);
        info!(
            vertices = counts.len(),
            max = counts.max().unwrap_or(0),
            "counted triangles"
        );
        Ok(counts)
    }

    /// Triangles through each edge of the labelled subgraph.
    ///
    /// # Errors
    ///
    /// Propagates store failures unmodified.
    #[instrument(skip(self, graph), fields(label = %self.config.label))]
    pub fn edge_triangle_counts<V: GraphView + ?Sized>(
        &self,
        graph: &V,
    ) -> Result<EdgeTriangleCounts, TriboundError> {
        let snapshot = AdjacencySnapshot::from_view(graph, &self.config.label)?;
        Ok(count_edge_triangles(&snapshot))
    }

    /// Exact frequency of every count in `0..=max`; a single zero bin for an
    /// empty graph.
    ///
    /// # Errors
    ///
    /// Propagates store failures unmodified.
    pub fn triangle_histogram<V: GraphView + ?Sized>(
        &self,
        graph: &V,
    ) -> Result<Histogram<u64>, TriboundError> {
        let counts = self.vertex_triangle_counts(graph)?;
        build_histogram(&counts, counts.max().unwrap_or(0))
    }

    /// Trim the graph to λ and return the recomputed counts.
    ///
    /// Vertices still above λ are listed in `report.unresolved`, never
    /// silently returned as compliant.
    ///
    /// # Errors
    ///
    /// [`TriboundError::InvalidArgument`] when `lambda < 0` (checked before
    /// the graph is touched); store failures are propagated unmodified.
    pub fn triangle_count_secure<S: GraphStore + ?Sized>(
        &self,
        graph: &mut S,
        lambda: i64,
    ) -> Result<SecureCounts, TriboundError> {
        let lambda = Lambda::new(lambda)?;
        let (counts, report) = self.trim(graph, lambda)?;
        Ok(SecureCounts {
            counts: counts.to_records(),
            report,
        })
    }

    /// Trim to λ and release a noisy histogram over `0..=λ`.
    ///
    /// Noise comes from the configured seed, or OS entropy when none is set.
    ///
    /// # Errors
    ///
    /// See [`Self::triangle_histogram_secure_with_rng`].
    pub fn triangle_histogram_secure<S: GraphStore + ?Sized>(
        &self,
        graph: &mut S,
        lambda: i64,
        epsilon: f64,
    ) -> Result<SecureHistogram, TriboundError> {
        let mut rng = self.config.noise.rng();
        self.triangle_histogram_secure_with_rng(graph, lambda, epsilon, &mut rng)
    }

    /// [`Self::triangle_histogram_secure`] drawing noise from `rng`.
    ///
    /// # Errors
    ///
    /// [`TriboundError::InvalidArgument`] when `lambda < 0`, `epsilon` is
    /// not a positive finite number, or the mechanism's noise scale for them
    /// is not finite. All three are checked before any edge is deleted or
    /// noise drawn. Store failures are propagated unmodified.
    pub fn triangle_histogram_secure_with_rng<S: GraphStore + ?Sized>(
        &self,
        graph: &mut S,
        lambda: i64,
        epsilon: f64,
        rng: &mut dyn RngCore,
    ) -> Result<SecureHistogram, TriboundError> {
        let lambda = Lambda::new(lambda)?;
        let epsilon = Epsilon::new(epsilon)?;
        let scale = noise_scale(&self.mechanism, lambda, epsilon)?;
        let (counts, report) = self.trim(graph, lambda)?;
        let histogram = perturb_histogram(&counts, lambda, scale, &self.mechanism, rng)?;
        Ok(SecureHistogram { histogram, report })
    }

    #[instrument(skip_all, fields(lambda = lambda.get(), label = %self.config.label))]
    fn trim<S: GraphStore + ?Sized>(
        &self,
        graph: &mut S,
        lambda: Lambda,
    ) -> Result<(VertexTriangleCounts, TrimReport), TriboundError> {
        let outcome = EdgeTrimmer::new(&self.config.label, lambda, &self.policy).trim(graph)?;
        let report = outcome.report;
        if report.converged {
            info!(
                deletions = report.deletions,
                sweeps = report.sweeps,
                "graph bounded"
            );
        } else {
            warn!(
                unresolved = report.unresolved.len(),
                deletions = report.deletions,
                "graph left partially bounded"
            );
        }
        Ok((outcome.counts, report))
    }
}
