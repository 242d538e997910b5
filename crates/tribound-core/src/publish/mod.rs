//! Histogram publishing.
//!
//! Turns finished per-vertex counts into a step-indexed frequency table,
//! either exact ([`histogram::build_histogram`]) or perturbed by a
//! [`noise::NoiseMechanism`] ([`histogram::build_private_histogram`]).

pub mod histogram;
pub mod noise;

pub use histogram::{
    Histogram, HistogramBin, build_histogram, build_private_histogram, noise_scale,
    perturb_histogram,
};
pub use noise::{LaplaceMechanism, NoiseMechanism};
