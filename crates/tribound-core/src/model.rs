//! Identifiers, validated parameters and output records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TriboundError;

/// Stable, non-negative vertex identifier, unique within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub u64);

impl VertexId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VertexId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Opaque store-issued handle for one undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeHandle(pub u64);

impl fmt::Display for EdgeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Upper bound on the number of triangles any vertex may keep after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Lambda(u64);

impl Lambda {
    /// Validate a caller-supplied bound.
    ///
    /// # Errors
    ///
    /// Returns [`TriboundError::InvalidArgument`] when `raw` is negative.
    pub fn new(raw: i64) -> Result<Self, TriboundError> {
        u64::try_from(raw)
            .map(Self)
            .map_err(|_| TriboundError::invalid("lambda", format!("must be >= 0, got {raw}")))
    }

    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Differential-privacy budget. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Epsilon(f64);

impl Epsilon {
    /// Validate a caller-supplied privacy budget.
    ///
    /// # Errors
    ///
    /// Returns [`TriboundError::InvalidArgument`] when `raw` is not a
    /// positive finite number.
    pub fn new(raw: f64) -> Result<Self, TriboundError> {
        if raw.is_finite() && raw > 0.0 {
            Ok(Self(raw))
        } else {
            Err(TriboundError::invalid(
                "epsilon",
                format!("must be a positive finite number, got {raw}"),
            ))
        }
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

/// One row of the per-vertex triangle count output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexTriangleCount {
    pub vertex_id: VertexId,
    pub triangle_count: u64,
}
