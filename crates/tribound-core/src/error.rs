use std::fmt;
use std::time::Duration;

use crate::model::{EdgeHandle, VertexId};

/// Machine-readable error codes for callers that branch on failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidArgument,
    ConfigParseError,
    VertexNotFound,
    EdgeNotFound,
    StorageFailure,
    LeaseContention,
    LeasePoisoned,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidArgument => "E1001",
            Self::ConfigParseError => "E1002",
            Self::VertexNotFound => "E2001",
            Self::EdgeNotFound => "E2002",
            Self::StorageFailure => "E3001",
            Self::LeaseContention => "E5001",
            Self::LeasePoisoned => "E5002",
        }
    }

    /// Short human-facing summary for logs.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidArgument => "Invalid argument",
            Self::ConfigParseError => "Config parse error",
            Self::VertexNotFound => "Vertex not found",
            Self::EdgeNotFound => "Edge not found",
            Self::StorageFailure => "Graph store failure",
            Self::LeaseContention => "Graph lease contention",
            Self::LeasePoisoned => "Graph lease poisoned",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument => {
                Some("Use a non-negative triangle bound and a positive, finite epsilon.")
            }
            Self::ConfigParseError => Some("Fix syntax in the engine config TOML and retry."),
            Self::VertexNotFound | Self::EdgeNotFound => None,
            Self::StorageFailure => Some("Check the graph store; the run was not retried."),
            Self::LeaseContention => {
                Some("Retry after the other secure run releases its lease on the graph.")
            }
            Self::LeasePoisoned => {
                Some("A previous holder panicked mid-run; inspect the graph before reuse.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure reported by a graph store collaborator.
///
/// A delete that finds nothing to remove is not an error; see
/// [`crate::store::DeleteOutcome::NotFound`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store was asked about a vertex it does not hold.
    #[error("vertex {0} not found in graph store")]
    VertexNotFound(VertexId),
    /// The store addressed an edge handle it cannot resolve at all.
    #[error("edge {0} is not addressable in graph store")]
    EdgeNotFound(EdgeHandle),
    /// Connectivity, corruption or any other backend failure.
    #[error("graph store backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wrap an arbitrary backend error.
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::VertexNotFound(_) => ErrorCode::VertexNotFound,
            Self::EdgeNotFound(_) => ErrorCode::EdgeNotFound,
            Self::Backend(_) => ErrorCode::StorageFailure,
        }
    }
}

/// Errors returned by the triangle engine.
#[derive(Debug, thiserror::Error)]
pub enum TriboundError {
    /// A caller-supplied parameter violates the operation contract.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    /// Fatal storage failure, propagated as the store reported it.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Another run held the graph lease for longer than the caller waited.
    #[error("graph lease not acquired after {waited:?}")]
    LeaseTimeout { waited: Duration },
    /// The lease holder panicked while the graph was leased.
    #[error("graph lease poisoned by a panicked holder")]
    LeasePoisoned,
    /// Engine configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl TriboundError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::Store(err) => err.code(),
            Self::LeaseTimeout { .. } => ErrorCode::LeaseContention,
            Self::LeasePoisoned => ErrorCode::LeasePoisoned,
            Self::Config(_) => ErrorCode::ConfigParseError,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
