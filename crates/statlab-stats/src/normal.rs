//! Standard normal distribution helpers.
//!
//! p-values throughout the games use the normal approximation of the
//! t-distribution. That is exact enough for the sample sizes involved and keeps
//! the feedback loop free of special-function tables.

use std::f64::consts::{PI, SQRT_2};

// Abramowitz and Stegun, formula 7.1.26
const P: f64 = 0.327_591_1;
const A1: f64 = 0.254_829_592;
const A2: f64 = -0.284_496_736;
const A3: f64 = 1.421_413_741;
const A4: f64 = -1.453_152_027;
const A5: f64 = 1.061_405_429;

/// Approximates the Gauss error function.
///
/// Uses Abramowitz and Stegun formula 7.1.26, with a maximum absolute error of
/// about `1.5e-7`. The function is odd, and saturates to `±1` for infinite input.
///
/// # Examples
///
/// ```
/// use statlab_stats::normal::erf;
///
/// assert!(erf(0.0).abs() < 1e-8);
/// assert!((erf(1.0) - 0.842_700_79).abs() < 2e-7);
/// assert_eq!(erf(f64::INFINITY), 1.0);
/// ```
#[must_use]
pub fn erf(x: f64) -> f64 {
    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Cumulative distribution function of the standard normal distribution.
#[must_use]
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / SQRT_2))
}

/// Density of a normal distribution with the given mean and standard deviation.
///
/// A non-positive `sd` yields `0` everywhere.
///
/// ```
/// use statlab_stats::normal::normal_pdf;
///
/// assert!((normal_pdf(0.0, 0.0, 1.0) - 0.398_942_28).abs() < 1e-8);
/// assert_eq!(normal_pdf(12.0, 10.0, 2.0), normal_pdf(8.0, 10.0, 2.0));
/// assert_eq!(normal_pdf(1.0, 0.0, 0.0), 0.0);
/// ```
#[must_use]
pub fn normal_pdf(x: f64, mean: f64, sd: f64) -> f64 {
    if sd <= 0.0 {
        return 0.0;
    }
    let z = (x - mean) / sd;
    (-0.5 * z * z).exp() / (sd * (2.0 * PI).sqrt())
}

/// Two-tailed p-value of a z (or large-sample t) statistic.
///
/// The result is clamped to `[0, 1]` and is `0` for an infinite statistic.
///
/// ```
/// use statlab_stats::normal::two_tailed_p;
///
/// assert!((two_tailed_p(1.96) - 0.05).abs() < 1e-3);
/// assert!((two_tailed_p(0.0) - 1.0).abs() < 1e-8);
/// assert_eq!(two_tailed_p(f64::INFINITY), 0.0);
/// ```
#[must_use]
pub fn two_tailed_p(z: f64) -> f64 {
    (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_erf_reference_values() {
        let cases = [
            (0.5, 0.520_499_877_8),
            (1.0, 0.842_700_792_9),
            (2.0, 0.995_322_265_0),
            (3.0, 0.999_977_909_5),
        ];
        for (x, expected) in cases {
            assert!((erf(x) - expected).abs() < 2e-7, "erf({x})");
            assert!((erf(-x) + expected).abs() < 2e-7, "erf(-{x})");
        }
    }

    #[test]
    fn test_cdf_symmetry() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-8);
        assert!((normal_cdf(1.3) + normal_cdf(-1.3) - 1.0).abs() < 1e-7);
    }

    #[test]
    fn test_p_decreases_with_z() {
        let ps = [0.0, 0.5, 1.0, 2.0, 3.0, 5.0].map(two_tailed_p);
        assert!(ps.is_sorted_by(|a, b| a >= b));
    }

    proptest! {
        #[test]
        fn prop_erf_odd_and_bounded(x in -50.0..50.0_f64) {
            let y = erf(x);
            prop_assert!((-1.0..=1.0).contains(&y));
            prop_assert!((y + erf(-x)).abs() < 1e-12 || x == 0.0);
        }

        #[test]
        fn prop_p_in_unit_interval(z in -1e3..1e3_f64) {
            let p = two_tailed_p(z);
            prop_assert!((0.0..=1.0).contains(&p));
            prop_assert!((p - two_tailed_p(-z)).abs() < 1e-12);
        }
    }
}
