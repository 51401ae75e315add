//! Descriptive statistics for numeric samples.
//!
//! This module summarizes a sample of `f64` values with measures of central
//! tendency, dispersion, shape, and robust spread. Quantiles use linear
//! interpolation between order statistics (the "type 7" convention), which
//! guarantees `min <= q25 <= median <= q75 <= max`.

/// Descriptive statistics summarizing a numeric sample.
///
/// Variance and standard deviation use the sample (n-1) denominator.
/// Skewness and excess kurtosis use the moment (biased) definitions and are
/// `None` when the sample has fewer than three values or zero variance.
///
/// # Examples
///
/// ```
/// use statqa_stats::descriptive::DescriptiveStats;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let stats = DescriptiveStats::new(&values).unwrap();
/// assert_eq!(stats.n, 5);
/// assert_eq!(stats.mean, 3.0);
/// assert!((stats.std_dev - 1.5811).abs() < 1e-3);
/// assert_eq!(stats.q25, 2.0);
/// assert_eq!(stats.q75, 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    /// Number of values in the sample.
    pub n: usize,
    /// The minimum value.
    pub min: f64,
    /// The maximum value.
    pub max: f64,
    /// The arithmetic mean.
    pub mean: f64,
    /// The median (50th percentile).
    pub median: f64,
    /// The first quartile (25th percentile).
    pub q25: f64,
    /// The third quartile (75th percentile).
    pub q75: f64,
    /// Sample variance (n-1 denominator); zero for a single value.
    pub variance: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Moment skewness, or `None` when undefined.
    pub skewness: Option<f64>,
    /// Excess kurtosis (normal = 0), or `None` when undefined.
    pub kurtosis: Option<f64>,
    /// Median absolute deviation from the median.
    pub mad: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// Returns `None` when the sample is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use statqa_stats::descriptive::DescriptiveStats;
    ///
    /// assert!(DescriptiveStats::new(&[]).is_none());
    /// let stats = DescriptiveStats::new(&[2.0]).unwrap();
    /// assert_eq!(stats.std_dev, 0.0);
    /// ```
    #[must_use]
    pub fn new(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = quantile(sorted_values, 0.5);
        let q25 = quantile(sorted_values, 0.25);
        let q75 = quantile(sorted_values, 0.75);

        let variance = if count > 1 {
            sorted_values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        let std_dev = variance.sqrt();

        let m2 = sorted_values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let (skewness, kurtosis) = if count >= 3 && m2 > 0.0 {
            let m3 = sorted_values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / n;
            let m4 = sorted_values.iter().map(|v| (v - mean).powi(4)).sum::<f64>() / n;
            (Some(m3 / m2.powf(1.5)), Some(m4 / (m2 * m2) - 3.0))
        } else {
            (None, None)
        };

        let mut abs_dev = sorted_values.iter().map(|v| (v - median).abs()).collect::<Vec<_>>();
        abs_dev.sort_by(f64::total_cmp);
        let mad = quantile(&abs_dev, 0.5);

        Some(Self {
            n: count,
            min,
            max,
            mean,
            median,
            q25,
            q75,
            variance,
            std_dev,
            skewness,
            kurtosis,
            mad,
        })
    }

    /// Counts outliers using the MAD-based robust z-score (modified
    /// z-score, `0.6745 * (x - median) / MAD`).
    ///
    /// A value is an outlier when its robust z-score exceeds `threshold` in
    /// absolute value. When the MAD is zero the score is undefined and no
    /// value is flagged.
    ///
    /// # Examples
    ///
    /// ```
    /// use statqa_stats::descriptive::DescriptiveStats;
    ///
    /// let values = [10.0, 11.0, 10.5, 9.5, 10.2, 9.8, 10.1, 9.9, 10.3, 9.7, 500.0];
    /// let stats = DescriptiveStats::new(&values).unwrap();
    /// assert_eq!(stats.count_outliers(&values, 3.5), 1);
    /// ```
    #[must_use]
    pub fn count_outliers(&self, values: &[f64], threshold: f64) -> usize {
        if self.mad == 0.0 {
            return 0;
        }
        values
            .iter()
            .filter(|v| (0.6745 * (*v - self.median) / self.mad).abs() > threshold)
            .count()
    }
}

/// Computes a quantile from sorted data using linear interpolation.
///
/// `p` is the quantile level in `[0, 1]`. For a sample of size n the
/// quantile sits at rank `h = (n - 1) * p` and is interpolated between the
/// neighboring order statistics.
///
/// # Returns
///
/// The interpolated quantile. Returns `f64::NAN` for an empty slice.
///
/// # Examples
///
/// ```
/// use statqa_stats::descriptive::quantile;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(quantile(&values, 0.5), 3.0);
/// assert_eq!(quantile(&values, 0.25), 2.0);
/// assert_eq!(quantile(&values, 1.0), 5.0);
/// ```
#[expect(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
#[must_use]
pub fn quantile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let h = (sorted_values.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - h.floor();
    sorted_values[lo] + (sorted_values[hi] - sorted_values[lo]) * frac
}
