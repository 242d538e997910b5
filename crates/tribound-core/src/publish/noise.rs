//! Noise calibration for private releases.
//!
//! A [`NoiseMechanism`] owns two decisions: the global sensitivity of the
//! released statistic for a given λ, and how a single noise value is drawn
//! for a given scale. Swapping mechanisms touches neither the oracle nor
//! the trimmer.

use rand::RngCore;
use rand_distr::{Distribution, Exp1};

use crate::model::{Epsilon, Lambda};

/// Additive noise calibrated to a sensitivity bound.
pub trait NoiseMechanism {
    /// Global sensitivity of the histogram released after λ-trimming.
    fn sensitivity(&self, lambda: Lambda) -> f64;

    /// Noise scale for the given bound and budget.
    fn scale(&self, lambda: Lambda, epsilon: Epsilon) -> f64 {
        self.sensitivity(lambda) / epsilon.get()
    }

    /// Draw one zero-mean noise value at `scale`.
    fn sample(&self, scale: f64, rng: &mut dyn RngCore) -> f64;
}

/// Laplace mechanism with the `4λ + 1` sensitivity of λ-bounded trimming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaplaceMechanism;

impl NoiseMechanism for LaplaceMechanism {
    #[allow(clippy::cast_precision_loss)]
    fn sensitivity(&self, lambda: Lambda) -> f64 {
        4.0_f64.mul_add(lambda.get() as f64, 1.0)
    }

    /// The difference of two unit exponentials is a unit Laplace variate.
    fn sample(&self, scale: f64, rng: &mut dyn RngCore) -> f64 {
        let a: f64 = Exp1.sample(&mut *rng);
        let b: f64 = Exp1.sample(&mut *rng);
        scale * (a - b)
    }
}
