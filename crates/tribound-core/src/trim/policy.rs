//! Convergence policy for the trimming loop.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How many passes over the vertex set a trimming run may make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepMode {
    /// Visit every vertex once, in enumeration order.
    SinglePass,
    /// Keep re-visiting vertices that are still above λ until none are, a
    /// sweep deletes nothing, or `max_sweeps` passes have run.
    Fixpoint { max_sweeps: usize },
}

/// Limits and sweep behaviour for one trimming run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimPolicy {
    /// Deletion attempts allowed per vertex visit before it is abandoned.
    /// Default: 1024.
    pub max_iterations_per_vertex: usize,
    /// Default: `Fixpoint { max_sweeps: 8 }`.
    pub sweep: SweepMode,
    /// Wall-clock budget for the whole run. Default: none.
    pub deadline: Option<Duration>,
}

impl Default for TrimPolicy {
    fn default() -> Self {
        Self {
            max_iterations_per_vertex: 1024,
            sweep: SweepMode::Fixpoint { max_sweeps: 8 },
            deadline: None,
        }
    }
}

impl TrimPolicy {
    #[must_use]
    pub fn single_pass() -> Self {
        Self {
            sweep: SweepMode::SinglePass,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations_per_vertex: usize) -> Self {
        self.max_iterations_per_vertex = max_iterations_per_vertex;
        self
    }

    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Upper bound on passes over the vertex set (at least one).
    #[must_use]
    pub fn max_sweeps(&self) -> usize {
        match self.sweep {
            SweepMode::SinglePass => 1,
            SweepMode::Fixpoint { max_sweeps } => max_sweeps.max(1),
        }
    }
}
