//! Mann-Kendall trend test and mean-shift change-point detection.
//!
//! The Mann-Kendall test detects a monotonic trend without assuming
//! linearity, which suits yearly survey aggregates full of ties and
//! plateaus. The change-point detector finds the single split of a series
//! that maximizes the between-segment sum of squares.

use crate::distribution::normal_sf;

/// Result of the Mann-Kendall monotonic trend test.
#[derive(Debug, Clone, PartialEq)]
pub struct MannKendallTest {
    /// The S statistic (sum of pairwise signs).
    pub s: i64,
    /// Normal approximation z-score with continuity correction.
    pub z: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Mann-Kendall test over a series in time order.
///
/// The variance of S is corrected for ties. Requires at least 3
/// observations; returns `None` below that or when the tie-corrected
/// variance is zero (all values identical).
///
/// # Examples
///
/// ```
/// use statqa_stats::trend::mann_kendall;
///
/// let rising = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
/// let test = mann_kendall(&rising).unwrap();
/// assert!(test.s > 0);
/// assert!(test.p_value < 0.05);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mann_kendall(values: &[f64]) -> Option<MannKendallTest> {
    let n = values.len();
    if n < 3 {
        return None;
    }

    let mut s: i64 = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            s += match values[j].partial_cmp(&values[i])? {
                std::cmp::Ordering::Greater => 1,
                std::cmp::Ordering::Less => -1,
                std::cmp::Ordering::Equal => 0,
            };
        }
    }

    // Tie correction: subtract sum t(t-1)(2t+5) over tie groups.
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let nf = n as f64;
    let mut variance = nf * (nf - 1.0) * (2.0 * nf + 5.0);
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && sorted[j + 1] == sorted[i] {
            j += 1;
        }
        let t = (j - i + 1) as f64;
        if t > 1.0 {
            variance -= t * (t - 1.0) * (2.0 * t + 5.0);
        }
        i = j + 1;
    }
    variance /= 18.0;
    if variance <= 0.0 {
        return None;
    }

    let sd = variance.sqrt();
    let z = match s.cmp(&0) {
        std::cmp::Ordering::Greater => (s as f64 - 1.0) / sd,
        std::cmp::Ordering::Less => (s as f64 + 1.0) / sd,
        std::cmp::Ordering::Equal => 0.0,
    };
    Some(MannKendallTest {
        s,
        z,
        p_value: 2.0 * normal_sf(z.abs()),
    })
}

/// A detected change point in a series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangePoint {
    /// Index of the first observation of the second segment.
    pub index: usize,
    /// Between-segment sum of squares at the chosen split.
    pub score: f64,
}

/// Finds the split maximizing the between-segment sum of squares.
///
/// Every split leaving at least 2 observations on each side is scored by
/// `n_left * (mean_left - mean)^2 + n_right * (mean_right - mean)^2`; the
/// highest-scoring split wins, earliest index on ties. Returns `None` for
/// series shorter than 4 or with no variance.
///
/// # Examples
///
/// ```
/// use statqa_stats::trend::mean_shift_change_point;
///
/// let series = [1.0, 1.0, 1.0, 1.0, 9.0, 9.0, 9.0, 9.0];
/// let cp = mean_shift_change_point(&series).unwrap();
/// assert_eq!(cp.index, 4);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean_shift_change_point(values: &[f64]) -> Option<ChangePoint> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let total: f64 = values.iter().sum();
    let grand_mean = total / n as f64;
    if values.iter().all(|v| *v == grand_mean) {
        return None;
    }

    let mut best: Option<ChangePoint> = None;
    let mut left_sum = values[0] + values[1];
    for split in 2..=(n - 2) {
        let left_n = split as f64;
        let right_n = (n - split) as f64;
        let left_mean = left_sum / left_n;
        let right_mean = (total - left_sum) / right_n;
        let score = left_n * (left_mean - grand_mean).powi(2)
            + right_n * (right_mean - grand_mean).powi(2);
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(ChangePoint { index: split, score });
        }
        left_sum += values[split];
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mann_kendall_increasing() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let test = mann_kendall(&values).unwrap();
        assert_eq!(test.s, 45);
        assert!(test.z > 0.0);
        assert!(test.p_value < 0.01);
    }

    #[test]
    fn test_mann_kendall_decreasing() {
        let values: Vec<f64> = (1..=10).rev().map(f64::from).collect();
        let test = mann_kendall(&values).unwrap();
        assert_eq!(test.s, -45);
        assert!(test.p_value < 0.01);
    }

    #[test]
    fn test_mann_kendall_no_trend() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 2.0, 3.0, 4.0];
        let test = mann_kendall(&values).unwrap();
        assert!(test.p_value > 0.05);
    }

    #[test]
    fn test_mann_kendall_all_ties() {
        assert!(mann_kendall(&[2.0, 2.0, 2.0, 2.0]).is_none());
    }

    #[test]
    fn test_mann_kendall_robust_to_nonlinearity() {
        // Monotone but saturating: S is still the maximum possible
        let values = [1.0, 10.0, 15.0, 17.0, 18.0, 18.5, 18.8, 18.9];
        let test = mann_kendall(&values).unwrap();
        assert_eq!(test.s, 28);
    }

    #[test]
    fn test_change_point_detects_shift() {
        let series = [2.0, 2.1, 1.9, 2.0, 8.0, 8.1, 7.9, 8.0];
        let cp = mean_shift_change_point(&series).unwrap();
        assert_eq!(cp.index, 4);
        assert!(cp.score > 0.0);
    }

    #[test]
    fn test_change_point_constant_series() {
        assert!(mean_shift_change_point(&[5.0, 5.0, 5.0, 5.0, 5.0]).is_none());
    }

    #[test]
    fn test_change_point_too_short() {
        assert!(mean_shift_change_point(&[1.0, 2.0, 3.0]).is_none());
    }
}
