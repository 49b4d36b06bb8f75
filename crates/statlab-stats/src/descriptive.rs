/// Descriptive statistics summarizing a dataset.
///
/// This structure contains the measures of central tendency and dispersion
/// the games need for a dataset of `f64` values. Both the population variance
/// (divide by `n`) and the sample variance (divide by `n - 1`) are kept, since
/// the projection games use the former and the t-tests use the latter.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// The number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The population variance (sum of squared deviations divided by `n`).
    pub population_variance: f64,
    /// The sample variance (sum of squared deviations divided by `n - 1`).
    ///
    /// Zero for a single value.
    pub sample_variance: f64,
    /// The sample standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use statlab_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(stats.mean, 5.0);
    /// assert_eq!(stats.population_variance, 4.0);
    /// assert_eq!(stats.min, 2.0);
    /// assert_eq!(stats.max, 9.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        let mean = mean(&values)?;
        let min = values.iter().copied().min_by(f64::total_cmp)?;
        let max = values.iter().copied().max_by(f64::total_cmp)?;
        let population_variance = population_variance(&values)?;
        let sample_variance = sample_variance(&values).unwrap_or(0.0);

        Some(Self {
            count: values.len(),
            min,
            max,
            mean,
            population_variance,
            sample_variance,
            std_dev: sample_variance.sqrt(),
        })
    }
}

/// Returns the arithmetic mean, or `None` for an empty slice.
///
/// ```
/// # use statlab_stats::descriptive;
/// assert_eq!(descriptive::mean(&[1.0, 2.0, 3.0]), Some(2.0));
/// assert_eq!(descriptive::mean(&[]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Returns the population variance (divide by `n`), or `None` for an empty slice.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    Some(sum_of_squares(values, mean) / values.len() as f64)
}

/// Returns the sample variance (divide by `n - 1`).
///
/// Returns `None` when fewer than two values are given, since the estimator is
/// undefined there.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    Some(sum_of_squares(values, mean) / (values.len() - 1) as f64)
}

fn sum_of_squares(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(DescriptiveStats::new([]).is_none());
        assert_eq!(population_variance(&[]), None);
        assert_eq!(sample_variance(&[]), None);
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.population_variance, 0.0);
        assert_eq!(stats.sample_variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(sample_variance(&[42.0]), None);
    }

    #[test]
    fn test_sample_vs_population_variance() {
        let values = [1.0, 2.0, 3.0, 4.0];
        // Squared deviations from 2.5 sum to 5.0
        assert!((population_variance(&values).unwrap() - 1.25).abs() < 1e-12);
        assert!((sample_variance(&values).unwrap() - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_unsorted_min_max() {
        let stats = DescriptiveStats::new([3.0, -1.0, 7.5, 0.0]).unwrap();
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.max, 7.5);
    }
}
