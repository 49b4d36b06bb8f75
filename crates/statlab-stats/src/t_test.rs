//! t-statistics for comparing two groups.
//!
//! Three flavours are provided:
//!
//! - [`pooled_t`]: from summary values, assuming equal group sizes and a shared
//!   standard deviation. Used when the user drives the summary values directly.
//! - [`independent_t`]: from two samples, with the unpooled (Welch-style)
//!   standard error `sqrt(v1/n1 + v2/n2)`.
//! - [`paired_t`]: from matched samples, analysing the per-subject differences.
//!
//! p-values use the normal approximation ([`two_tailed_p`]).

use serde::Serialize;

use crate::{
    descriptive::{mean, sample_variance},
    normal::two_tailed_p,
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TTestError {
    #[display("t-test needs at least two observations per group, got {count}")]
    TooFewObservations { count: usize },
    #[display("paired samples differ in length ({before} before, {after} after)")]
    LengthMismatch { before: usize, after: usize },
}

/// Outcome of a t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTest {
    /// The (absolute) t-statistic.
    pub t: f64,
    /// Degrees of freedom, reported for display.
    pub df: usize,
    /// Two-tailed p-value.
    pub p: f64,
}

impl TTest {
    #[must_use]
    pub fn new(t: f64, df: usize) -> Self {
        Self {
            t,
            df,
            p: two_tailed_p(t),
        }
    }

    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p < alpha
    }
}

/// Returns `diff / se`, treating a zero standard error explicitly.
///
/// A zero difference over a zero standard error is `0` (nothing to detect); any
/// other difference over a zero standard error is `+inf`.
fn ratio(diff: f64, se: f64) -> f64 {
    if se > 0.0 {
        diff / se
    } else if diff == 0.0 {
        0.0
    } else {
        f64::INFINITY.copysign(diff)
    }
}

/// t-statistic from summary values of two equal-sized groups with a shared standard deviation.
///
/// `t = mean_diff / (sd * sqrt(2 / n))`. Returns `0` when the standard error is zero.
///
/// # Examples
///
/// ```
/// use statlab_stats::t_test::pooled_t;
///
/// assert_eq!(pooled_t(0.0, 20.0, 30), 0.0);
/// assert_eq!(pooled_t(5.0, 0.0, 30), 0.0);
/// assert!((pooled_t(10.0, 10.0, 2) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn pooled_t(mean_diff: f64, sd: f64, n: u32) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let se = sd * (2.0 / f64::from(n)).sqrt();
    if se == 0.0 {
        return 0.0;
    }
    mean_diff / se
}

/// Independent two-sample t-test with unpooled standard error.
///
/// The reported degrees of freedom are `n1 + n2 - 2`.
#[expect(clippy::cast_precision_loss)]
pub fn independent_t(a: &[f64], b: &[f64]) -> Result<TTest, TTestError> {
    let (m1, v1) = mean_and_variance(a)?;
    let (m2, v2) = mean_and_variance(b)?;
    let se = (v1 / a.len() as f64 + v2 / b.len() as f64).sqrt();
    let t = ratio((m1 - m2).abs(), se);
    Ok(TTest::new(t, a.len() + b.len() - 2))
}

/// Paired t-test on the differences `after - before`.
///
/// The reported degrees of freedom are `n - 1`.
///
/// # Examples
///
/// ```
/// use statlab_stats::t_test::paired_t;
///
/// let before = [10.0, 20.0, 30.0, 40.0];
/// let after = [12.0, 21.0, 33.0, 42.0];
/// let test = paired_t(&before, &after).unwrap();
/// assert_eq!(test.df, 3);
/// assert!(test.is_significant(0.05));
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn paired_t(before: &[f64], after: &[f64]) -> Result<TTest, TTestError> {
    if before.len() != after.len() {
        return Err(TTestError::LengthMismatch {
            before: before.len(),
            after: after.len(),
        });
    }
    let diffs = before
        .iter()
        .zip(after)
        .map(|(b, a)| a - b)
        .collect::<Vec<_>>();
    let (mean_diff, var_diff) = mean_and_variance(&diffs)?;
    let se = var_diff.sqrt() / (diffs.len() as f64).sqrt();
    let t = ratio(mean_diff.abs(), se);
    Ok(TTest::new(t, diffs.len() - 1))
}

fn mean_and_variance(values: &[f64]) -> Result<(f64, f64), TTestError> {
    let too_few = || TTestError::TooFewObservations {
        count: values.len(),
    };
    let variance = sample_variance(values).ok_or_else(too_few)?;
    let mean = mean(values).ok_or_else(too_few)?;
    Ok((mean, variance))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_pooled_t_reference() {
        // 15 / (40 * sqrt(2/30))
        let t = pooled_t(15.0, 40.0, 30);
        assert!((t - 1.452_368_754).abs() < 1e-6);
        assert!(!TTest::new(t, 58).is_significant(0.05));
    }

    #[test]
    fn test_too_few_observations() {
        assert_eq!(
            independent_t(&[1.0], &[1.0, 2.0]),
            Err(TTestError::TooFewObservations { count: 1 })
        );
        assert_eq!(
            paired_t(&[], &[]),
            Err(TTestError::TooFewObservations { count: 0 })
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            paired_t(&[1.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(TTestError::LengthMismatch {
                before: 2,
                after: 3
            })
        );
    }

    #[test]
    fn test_constant_shift_is_infinitely_significant() {
        let before = [50.0, 30.0, 70.0, 45.0];
        let after = before.map(|v| v + 5.0);
        let test = paired_t(&before, &after).unwrap();
        assert_eq!(test.t, f64::INFINITY);
        assert_eq!(test.p, 0.0);
    }

    #[test]
    fn test_identical_samples() {
        let values = [3.0, 3.0, 3.0];
        let test = paired_t(&values, &values).unwrap();
        assert_eq!(test.t, 0.0);
        let test = independent_t(&values, &values).unwrap();
        assert_eq!(test.t, 0.0);
        assert!((test.p - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_paired_detects_what_independent_misses() {
        let before = [20.0, 80.0, 35.0, 65.0, 50.0, 95.0, 10.0, 40.0];
        let after = before.map(|v| v + 4.0 + (v % 3.0) * 0.1);
        let independent = independent_t(&before, &after).unwrap();
        let paired = paired_t(&before, &after).unwrap();
        assert!(!independent.is_significant(0.05));
        assert!(paired.is_significant(0.05));
        assert_eq!(independent.df, 14);
        assert_eq!(paired.df, 7);
    }

    proptest! {
        #[test]
        fn prop_equal_means_give_zero_t(sd in 0.1..100.0_f64, n in 2u32..500) {
            prop_assert_eq!(pooled_t(0.0, sd, n), 0.0);
        }

        #[test]
        fn prop_same_sample_has_zero_t(
            values in prop::collection::vec(-100.0..100.0_f64, 2..40),
        ) {
            let independent = independent_t(&values, &values).unwrap();
            let paired = paired_t(&values, &values).unwrap();
            prop_assert_eq!(independent.t, 0.0);
            prop_assert_eq!(paired.t, 0.0);
        }
    }
}
