//! One-way analysis of variance from group summaries.
//!
//! The F-ratio compares how far the group means spread around the grand mean
//! (between-group mean square) with how noisy each group is (within-group mean
//! square). The games never hold raw observations for ANOVA, so the test is
//! computed from per-group mean, standard deviation and size.

use serde::{Deserialize, Serialize};

/// Smallest standard deviation used in the within-group variance.
///
/// Keeps the F-ratio finite when a group has no spread at all.
pub const MIN_SD: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AnovaError {
    #[display("one-way ANOVA needs at least two groups, got {count}")]
    TooFewGroups { count: usize },
    #[display("group {index} has no observations")]
    EmptyGroup { index: usize },
}

/// Mean, standard deviation and size of one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub mean: f64,
    pub sd: f64,
    pub n: u32,
}

impl GroupSummary {
    #[must_use]
    pub const fn new(mean: f64, sd: f64, n: u32) -> Self {
        Self { mean, sd, n }
    }
}

/// Result of a one-way ANOVA.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneWayAnova {
    pub grand_mean: f64,
    pub ss_between: f64,
    pub df_between: u32,
    pub ms_between: f64,
    pub ms_within: f64,
    pub df_within: u32,
    pub f_ratio: f64,
}

impl OneWayAnova {
    /// Computes the ANOVA table from group summaries.
    ///
    /// Each group's standard deviation is clamped to at least [`MIN_SD`] before
    /// pooling, so the within-group mean square is never zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use statlab_stats::anova::{GroupSummary, OneWayAnova};
    ///
    /// let groups = [
    ///     GroupSummary::new(-8.0, 20.0, 20),
    ///     GroupSummary::new(0.0, 20.0, 20),
    ///     GroupSummary::new(8.0, 20.0, 20),
    /// ];
    /// let anova = OneWayAnova::from_summaries(&groups).unwrap();
    /// // n * offset^2 / sd^2
    /// assert!((anova.f_ratio - 20.0 * 64.0 / 400.0).abs() < 1e-9);
    /// assert_eq!(anova.df_between, 2);
    /// assert_eq!(anova.df_within, 57);
    /// ```
    pub fn from_summaries(groups: &[GroupSummary]) -> Result<Self, AnovaError> {
        if groups.len() < 2 {
            return Err(AnovaError::TooFewGroups {
                count: groups.len(),
            });
        }
        if let Some(index) = groups.iter().position(|g| g.n == 0) {
            return Err(AnovaError::EmptyGroup { index });
        }

        let total_n = groups.iter().map(|g| g.n).sum::<u32>();
        let k = u32::try_from(groups.len()).unwrap_or(u32::MAX);
        let grand_mean = groups
            .iter()
            .map(|g| g.mean * f64::from(g.n))
            .sum::<f64>()
            / f64::from(total_n);

        let ss_between = groups
            .iter()
            .map(|g| f64::from(g.n) * (g.mean - grand_mean).powi(2))
            .sum::<f64>();
        let df_between = k - 1;
        let ms_between = ss_between / f64::from(df_between);

        // Pooled variance. With a single observation per group there are no
        // within-group degrees of freedom, so fall back to the plain average.
        let df_within = total_n.saturating_sub(k);
        let ss_within = groups
            .iter()
            .map(|g| f64::from(g.n.saturating_sub(1)) * g.sd.max(MIN_SD).powi(2))
            .sum::<f64>();
        let ms_within = if df_within == 0 {
            groups.iter().map(|g| g.sd.max(MIN_SD).powi(2)).sum::<f64>() / f64::from(k)
        } else {
            ss_within / f64::from(df_within)
        };

        Ok(Self {
            grand_mean,
            ss_between,
            df_between,
            ms_between,
            ms_within,
            df_within,
            f_ratio: ms_between / ms_within,
        })
    }

    /// Returns whether the F-ratio exceeds `critical_f`.
    #[must_use]
    pub fn exceeds(&self, critical_f: f64) -> bool {
        self.f_ratio > critical_f
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn symmetric(offset: f64, sd: f64, n: u32) -> [GroupSummary; 3] {
        [
            GroupSummary::new(-offset, sd, n),
            GroupSummary::new(0.0, sd, n),
            GroupSummary::new(offset, sd, n),
        ]
    }

    #[test]
    fn test_too_few_groups() {
        assert_eq!(
            OneWayAnova::from_summaries(&[GroupSummary::new(0.0, 1.0, 5)]),
            Err(AnovaError::TooFewGroups { count: 1 })
        );
    }

    #[test]
    fn test_empty_group() {
        let groups = [GroupSummary::new(0.0, 1.0, 5), GroupSummary::new(1.0, 1.0, 0)];
        assert_eq!(
            OneWayAnova::from_summaries(&groups),
            Err(AnovaError::EmptyGroup { index: 1 })
        );
    }

    #[test]
    fn test_equal_means_give_zero_f() {
        let anova = OneWayAnova::from_summaries(&symmetric(0.0, 10.0, 20)).unwrap();
        assert_eq!(anova.f_ratio, 0.0);
        assert!(!anova.exceeds(3.2));
    }

    #[test]
    fn test_zero_sd_is_clamped() {
        let anova = OneWayAnova::from_summaries(&symmetric(5.0, 0.0, 20)).unwrap();
        assert!(anova.f_ratio.is_finite());
        assert!((anova.f_ratio - 20.0 * 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_unequal_group_sizes() {
        let groups = [GroupSummary::new(10.0, 2.0, 10), GroupSummary::new(20.0, 4.0, 30)];
        let anova = OneWayAnova::from_summaries(&groups).unwrap();
        assert!((anova.grand_mean - 17.5).abs() < 1e-12);
        // 10 * 7.5^2 + 30 * 2.5^2
        assert!((anova.ss_between - 750.0).abs() < 1e-9);
        // (9 * 4 + 29 * 16) / 38
        assert!((anova.ms_within - 500.0 / 38.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_matches_closed_form(offset in 0.0..80.0_f64, sd in 0.0..60.0_f64, n in 2u32..100) {
            let anova = OneWayAnova::from_summaries(&symmetric(offset, sd, n)).unwrap();
            let expected = f64::from(n) * offset.powi(2) / sd.max(MIN_SD).powi(2);
            prop_assert!((anova.f_ratio - expected).abs() <= 1e-9 * (1.0 + expected));
            prop_assert!(anova.f_ratio.is_finite());
        }
    }
}
