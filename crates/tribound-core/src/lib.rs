#![forbid(unsafe_code)]
//! tribound-core library.
//!
//! Per-vertex triangle counting over an externally owned graph, with a
//! privacy-preserving path that trims edges until no vertex participates in
//! more than λ triangles and then releases a Laplace-noised histogram.
//!
//! # Pipeline
//!
//! ```text
//! GraphView ──► graph::AdjacencySnapshot ──► metrics::triangles (oracle)
//!                      ▲                              │
//!                      │                              ▼
//!               GraphMutator ◄──────────── trim::EdgeTrimmer (λ loop)
//!                                                     │
//!                                                     ▼
//!                                   publish::histogram (+ publish::noise)
//! ```
//!
//! [`service::TriangleService`] sequences these stages for the plain and
//! the secure path.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::TriboundError`]; storage failures are carried
//!   unmodified in [`error::StoreError`].
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`). The library
//!   never installs a subscriber.

pub mod config;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod model;
pub mod publish;
pub mod service;
pub mod store;
pub mod trim;

pub use config::{EngineConfig, load_config};
pub use error::{ErrorCode, StoreError, TriboundError};
pub use model::{EdgeHandle, Epsilon, Lambda, VertexId, VertexTriangleCount};
pub use service::{SecureCounts, SecureHistogram, TriangleService};
pub use store::{DeleteOutcome, GraphMutator, GraphStore, GraphView, Neighbor};
