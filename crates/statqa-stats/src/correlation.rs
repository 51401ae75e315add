//! Pearson and Spearman correlation with asymptotic p-values.
//!
//! P-values use the t transform `t = r * sqrt((n - 2) / (1 - r^2))` with
//! `n - 2` degrees of freedom for both coefficients. A perfect correlation
//! maps to a p-value of exactly 0. Both coefficients are symmetric in their
//! arguments: swapping `x` and `y` changes nothing.

use crate::distribution::student_t_two_sided;

/// A correlation coefficient with its sample size and p-value.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlation {
    /// The correlation coefficient in `[-1, 1]`.
    pub r: f64,
    /// Two-sided asymptotic p-value.
    pub p_value: f64,
    /// Number of paired observations.
    pub n: usize,
}

/// Computes the Pearson product-moment correlation.
///
/// Returns `None` when fewer than 3 pairs are given, when the slices differ
/// in length, or when either variable has zero variance (the coefficient is
/// undefined).
///
/// # Examples
///
/// ```
/// use statqa_stats::correlation::pearson;
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [2.0, 4.0, 6.0];
/// let corr = pearson(&x, &y).unwrap();
/// assert!((corr.r - 1.0).abs() < 1e-12);
/// assert_eq!(corr.p_value, 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> Option<Correlation> {
    if x.len() != y.len() || x.len() < 3 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    let r = (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0);
    Some(Correlation {
        r,
        p_value: correlation_p_value(r, x.len()),
        n: x.len(),
    })
}

/// Computes the Spearman rank correlation.
///
/// Values are converted to average ranks (ties share the mean of the ranks
/// they span) and the Pearson coefficient of the ranks is returned. Same
/// `None` conditions as [`pearson`].
///
/// # Examples
///
/// ```
/// use statqa_stats::correlation::spearman;
///
/// // Monotone but non-linear: Spearman sees a perfect relationship
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [1.0, 8.0, 27.0, 64.0];
/// let corr = spearman(&x, &y).unwrap();
/// assert!((corr.r - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn spearman(x: &[f64], y: &[f64]) -> Option<Correlation> {
    if x.len() != y.len() || x.len() < 3 {
        return None;
    }
    let rx = average_ranks(x);
    let ry = average_ranks(y);
    pearson(&rx, &ry)
}

/// Assigns average ranks (1-based) to values, sharing ranks across ties.
///
/// # Examples
///
/// ```
/// use statqa_stats::correlation::average_ranks;
///
/// let ranks = average_ranks(&[10.0, 20.0, 20.0, 30.0]);
/// assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Positions i..=j are tied; assign the mean of ranks i+1..=j+1.
        let rank = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}

#[expect(clippy::cast_precision_loss)]
fn correlation_p_value(r: f64, n: usize) -> f64 {
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= f64::EPSILON {
        return 0.0;
    }
    let t = r * (df / denom).sqrt();
    student_t_two_sided(t, df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_positive_correlation() {
        let x = [1.0, 2.0, 3.0];
        let y = [2.0, 4.0, 6.0];
        let corr = pearson(&x, &y).unwrap();
        assert!((corr.r - 1.0).abs() < 1e-12);
        assert_eq!(corr.p_value, 0.0);
        assert_eq!(corr.n, 3);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [8.0, 6.0, 4.0, 2.0];
        let corr = pearson(&x, &y).unwrap();
        assert!((corr.r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetry() {
        let x = [1.0, 4.0, 2.0, 8.0, 5.0, 7.0];
        let y = [2.0, 3.0, 1.0, 7.0, 6.0, 5.0];
        let ab = pearson(&x, &y).unwrap();
        let ba = pearson(&y, &x).unwrap();
        assert!((ab.r - ba.r).abs() < 1e-12);
        assert!((ab.p_value - ba.p_value).abs() < 1e-12);

        let ab = spearman(&x, &y).unwrap();
        let ba = spearman(&y, &x).unwrap();
        assert!((ab.r - ba.r).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_is_undefined() {
        let x = [1.0, 1.0, 1.0, 1.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!(pearson(&x, &y).is_none());
        assert!(spearman(&x, &y).is_none());
    }

    #[test]
    fn test_too_few_pairs() {
        assert!(pearson(&[1.0, 2.0], &[3.0, 4.0]).is_none());
        assert!(pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_pearson_reference_value() {
        // Anscombe's first quartet
        let x = [10.0, 8.0, 13.0, 9.0, 11.0, 14.0, 6.0, 4.0, 12.0, 7.0, 5.0];
        let y = [
            8.04, 6.95, 7.58, 8.81, 8.33, 9.96, 7.24, 4.26, 10.84, 4.82, 5.68,
        ];
        let corr = pearson(&x, &y).unwrap();
        assert!((corr.r - 0.816_42).abs() < 1e-4);
        assert!(corr.p_value < 0.01);
    }

    #[test]
    fn test_spearman_handles_ties() {
        let x = [1.0, 2.0, 2.0, 3.0, 4.0];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let corr = spearman(&x, &y).unwrap();
        assert!(corr.r > 0.9);
        assert!(corr.r < 1.0);
    }

    #[test]
    fn test_average_ranks_all_tied() {
        let ranks = average_ranks(&[5.0, 5.0, 5.0]);
        assert_eq!(ranks, vec![2.0, 2.0, 2.0]);
    }
}
