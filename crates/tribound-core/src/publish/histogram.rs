//! Step-indexed triangle-count histograms.
//!
//! A histogram over `0..=max_step` always has `max_step + 1` bins, zero
//! filled where no vertex attains a step. Vertices whose count lies above
//! `max_step` fall outside every bin.
//!
//! Private histograms are explicitly allowed to hold negative or fractional
//! values; callers must not round or clamp them away.

use rand::RngCore;
use serde::Serialize;
use tracing::{debug, instrument};

use super::noise::NoiseMechanism;
use crate::error::TriboundError;
use crate::metrics::VertexTriangleCounts;
use crate::model::{Epsilon, Lambda};

/// One histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin<T> {
    pub step: u64,
    pub value: T,
}

/// Ordered `(step, value)` buckets for steps `0..=max_step`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Histogram<T> {
    bins: Vec<HistogramBin<T>>,
}

impl<T: Copy> Histogram<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    #[must_use]
    pub fn bins(&self) -> &[HistogramBin<T>] {
        &self.bins
    }

    /// Value at `step`, or `None` outside the step range.
    #[must_use]
    pub fn value(&self, step: u64) -> Option<T> {
        usize::try_from(step)
            .ok()
            .and_then(|idx| self.bins.get(idx))
            .map(|bin| bin.value)
    }

    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.bins.iter().map(|bin| bin.value)
    }

    #[must_use]
    pub fn into_bins(self) -> Vec<HistogramBin<T>> {
        self.bins
    }
}

/// Exact frequency of each count in `0..=max_step`.
///
/// # Errors
///
/// Returns [`TriboundError::InvalidArgument`] if `max_step + 1` bins cannot
/// be addressed on this platform.
#[instrument(skip(counts), fields(vertices = counts.len()))]
pub fn build_histogram(
    counts: &VertexTriangleCounts,
    max_step: u64,
) -> Result<Histogram<u64>, TriboundError> {
    let bins = frequencies(counts, max_step)?
        .into_iter()
        .zip(0_u64..)
        .map(|(value, step)| HistogramBin { step, value })
        .collect();
    Ok(Histogram { bins })
}

/// Noisy frequency of each count in `0..=λ`.
///
/// Both parameters are validated before any noise is drawn.
///
/// # Errors
///
/// Returns [`TriboundError::InvalidArgument`] when `lambda < 0`,
/// `epsilon <= 0` (or not finite), or the mechanism yields an unusable scale.
pub fn build_private_histogram<M: NoiseMechanism + ?Sized>(
    counts: &VertexTriangleCounts,
    lambda: i64,
    epsilon: f64,
    mechanism: &M,
    rng: &mut dyn RngCore,
) -> Result<Histogram<f64>, TriboundError> {
    let lambda = Lambda::new(lambda)?;
    let epsilon = Epsilon::new(epsilon)?;
    let scale = noise_scale(mechanism, lambda, epsilon)?;
    perturb_histogram(counts, lambda, scale, mechanism, rng)
}

/// Noise scale `mechanism` uses for `lambda` and `epsilon`.
///
/// A positive finite ε can still overflow the scale to infinity; callers
/// that mutate the graph before publishing resolve the scale first.
///
/// # Errors
///
/// Returns [`TriboundError::InvalidArgument`] if the scale is negative or
/// not finite.
pub fn noise_scale<M: NoiseMechanism + ?Sized>(
    mechanism: &M,
    lambda: Lambda,
    epsilon: Epsilon,
) -> Result<f64, TriboundError> {
    let scale = mechanism.scale(lambda, epsilon);
    if scale.is_finite() && scale >= 0.0 {
        Ok(scale)
    } else {
        Err(TriboundError::invalid(
            "epsilon",
            format!("noise scale {scale} is not a finite non-negative number"),
        ))
    }
}

/// Noisy frequencies over `0..=λ` at a scale from [`noise_scale`].
///
/// # Errors
///
/// Returns [`TriboundError::InvalidArgument`] if `scale` is negative or not
/// finite, or the bins cannot be addressed.
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(counts, mechanism, rng), fields(vertices = counts.len()))]
pub fn perturb_histogram<M: NoiseMechanism + ?Sized>(
    counts: &VertexTriangleCounts,
    lambda: Lambda,
    scale: f64,
    mechanism: &M,
    rng: &mut dyn RngCore,
) -> Result<Histogram<f64>, TriboundError> {
    if !(scale.is_finite() && scale >= 0.0) {
        return Err(TriboundError::invalid(
            "epsilon",
            format!("noise scale {scale} is not a finite non-negative number"),
        ));
    }
    let exact = frequencies(counts, lambda.get())?;
    debug!(scale, bins = exact.len(), "perturbing histogram");

    let bins = exact
        .into_iter()
        .zip(0_u64..)
        .map(|(frequency, step)| HistogramBin {
            step,
            value: frequency as f64 + mechanism.sample(scale, &mut *rng),
        })
        .collect();
    Ok(Histogram { bins })
}

fn frequencies(counts: &VertexTriangleCounts, max_step: u64) -> Result<Vec<u64>, TriboundError> {
    let len = usize::try_from(max_step)
        .ok()
        .and_then(|max| max.checked_add(1))
        .ok_or_else(|| {
            TriboundError::invalid("lambda", format!("{max_step} exceeds addressable steps"))
        })?;

    let mut tally = Vec::new();
    tally.try_reserve_exact(len).map_err(|err| {
        TriboundError::invalid("lambda", format!("cannot hold {len} histogram bins: {err}"))
    })?;
    tally.resize(len, 0_u64);
    for (_, count) in counts.iter() {
        if let Some(slot) = usize::try_from(count).ok().and_then(|idx| tally.get_mut(idx)) {
            *slot += 1;
        }
    }
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencySnapshot;
    use crate::metrics::count_vertex_triangles;
    use crate::publish::noise::LaplaceMechanism;
    use rand::{SeedableRng, rngs::StdRng};

    /// Triangle (0,1,2) with pendant 3 on vertex 2, plus isolated 4.
    fn sample_counts() -> VertexTriangleCounts {
        count_vertex_triangles(&AdjacencySnapshot::from_edges(
            &[4],
            &[(0, 1), (1, 2), (2, 0), (2, 3)],
        ))
    }

    /// Adds nothing, so private output equals the exact frequencies.
    struct Silent;

    impl NoiseMechanism for Silent {
        fn sensitivity(&self, _lambda: Lambda) -> f64 {
            1.0
        }

        fn sample(&self, _scale: f64, _rng: &mut dyn RngCore) -> f64 {
            0.0
        }
    }

    /// Fails the test if any noise is drawn.
    struct MustNotDraw;

    impl NoiseMechanism for MustNotDraw {
        fn sensitivity(&self, _lambda: Lambda) -> f64 {
            1.0
        }

        fn sample(&self, _scale: f64, _rng: &mut dyn RngCore) -> f64 {
            panic!("noise drawn before parameters were validated");
        }
    }

    #[test]
    fn exact_histogram_is_zero_filled() {
        let histogram = build_histogram(&sample_counts(), 3).expect("histogram");
        assert_eq!(histogram.len(), 4);
        assert_eq!(histogram.values().collect::<Vec<_>>(), vec![2, 3, 0, 0]);
        assert_eq!(histogram.bins()[3], HistogramBin { step: 3, value: 0 });
    }

    #[test]
    fn counts_above_range_are_left_out() {
        let histogram = build_histogram(&sample_counts(), 0).expect("histogram");
        assert_eq!(histogram.len(), 1);
        assert_eq!(histogram.value(0), Some(2));
        assert_eq!(histogram.value(1), None);
    }

    #[test]
    fn empty_counts_still_fill_every_step() {
        let histogram =
            build_histogram(&VertexTriangleCounts::default(), 2).expect("histogram");
        assert_eq!(histogram.values().collect::<Vec<_>>(), vec![0, 0, 0]);
    }

    #[test]
    fn private_histogram_has_lambda_plus_one_bins() {
        let mut rng = StdRng::seed_from_u64(1);
        for lambda in 0..5 {
            let histogram = build_private_histogram(
                &sample_counts(),
                lambda,
                1.0,
                &LaplaceMechanism,
                &mut rng,
            )
            .expect("histogram");
            assert_eq!(histogram.len(), usize::try_from(lambda + 1).expect("len"));
            let steps: Vec<u64> = histogram.bins().iter().map(|b| b.step).collect();
            assert_eq!(steps, (0..=u64::try_from(lambda).expect("step")).collect::<Vec<_>>());
        }
    }

    #[test]
    fn silent_mechanism_reproduces_exact_frequencies() {
        let mut rng = StdRng::seed_from_u64(1);
        let private = build_private_histogram(&sample_counts(), 2, 1.0, &Silent, &mut rng)
            .expect("histogram");
        let exact = build_histogram(&sample_counts(), 2).expect("histogram");
        for (p, e) in private.values().zip(exact.values()) {
            #[allow(clippy::cast_precision_loss)]
            let expected = e as f64;
            assert!((p - expected).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn invalid_parameters_rejected_before_noise() {
        let mut rng = StdRng::seed_from_u64(1);
        let counts = sample_counts();

        for (lambda, epsilon) in [(-1, 1.0), (2, 0.0), (2, -3.0), (2, f64::NAN), (-4, -4.0)] {
            let err = build_private_histogram(&counts, lambda, epsilon, &MustNotDraw, &mut rng)
                .expect_err("invalid parameters");
            assert!(matches!(err, TriboundError::InvalidArgument { .. }));
        }
    }

    #[test]
    fn subnormal_epsilon_yields_no_scale() {
        let lambda = Lambda::from_u64(0);
        let tiny = Epsilon::new(5e-324).expect("positive finite epsilon");
        let err = noise_scale(&LaplaceMechanism, lambda, tiny).expect_err("infinite scale");
        assert!(matches!(err, TriboundError::InvalidArgument { name: "epsilon", .. }));

        let ok = noise_scale(&LaplaceMechanism, lambda, Epsilon::new(0.5).expect("epsilon"));
        assert!((ok.expect("finite scale") - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn private_values_may_be_negative_or_fractional() {
        let mut rng = StdRng::seed_from_u64(3);
        let histogram =
            build_private_histogram(&sample_counts(), 10, 0.1, &LaplaceMechanism, &mut rng)
                .expect("histogram");
        assert!(histogram.values().any(|v| v < 0.0));
        assert!(histogram.values().any(|v| v.fract() != 0.0));
    }

    #[test]
    fn histogram_serializes_as_step_value_rows() {
        let histogram = build_histogram(&sample_counts(), 1).expect("histogram");
        let json = serde_json::to_string(&histogram).expect("serialize");
        assert_eq!(json, r#"[{"step":0,"value":2},{"step":1,"value":3}]"#);
    }
}
