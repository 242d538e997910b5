//! λ-bounded edge trimming.
//!
//! # Overview
//!
//! For each vertex whose triangle count exceeds λ, the trimmer repeatedly
//! picks one incident edge, deletes it through the store, and recounts the
//! whole graph, until the vertex is at or below λ or an abort fires.
//!
//! ```text
//! Scanning ─► Deciding ─► Deleting ─► Recounting ─┐
//!    ▲                                            │ count > λ
//!    └────────────────────────────────────────────┘
//! ```
//!
//! [`TrimPolicy`] bounds each vertex visit by an iteration budget and the
//! whole run by an optional deadline. It also picks between one pass and
//! re-sweeping until the graph stops changing.

pub mod policy;
pub mod trimmer;

pub use policy::{SweepMode, TrimPolicy};
pub use trimmer::{EdgeTrimmer, TrimOutcome, TrimReport, UnresolvedReason, UnresolvedVertex};
