//! Significance tests and multiple-testing correction.
//!
//! Each test returns `None` when its preconditions are not met (too few
//! observations, zero variance where a variance is required, degenerate
//! contingency tables) instead of producing NaN statistics. P-values come
//! from the asymptotic reference distributions in [`crate::distribution`].

use crate::{
    descriptive::DescriptiveStats,
    distribution::{chi_square_sf, f_sf, student_t_two_sided},
};

/// Result of Welch's unequal-variances t-test.
#[derive(Debug, Clone, PartialEq)]
pub struct TTestResult {
    /// The t statistic.
    pub statistic: f64,
    /// Welch-Satterthwaite degrees of freedom (fractional).
    pub df: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Welch's t-test for a difference in means between two groups.
///
/// Returns `None` when either group has fewer than 2 values or both groups
/// have zero variance (the statistic is undefined).
///
/// # Examples
///
/// ```
/// use statqa_stats::hypothesis::welch_t_test;
///
/// let a = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let b = [20.0, 21.0, 22.0, 23.0, 24.0];
/// let test = welch_t_test(&a, &b).unwrap();
/// assert!(test.statistic < 0.0);
/// assert!(test.p_value < 0.001);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Option<TTestResult> {
    if a.len() < 2 || b.len() < 2 {
        return None;
    }
    let sa = DescriptiveStats::new(a)?;
    let sb = DescriptiveStats::new(b)?;
    let na = a.len() as f64;
    let nb = b.len() as f64;
    let va = sa.variance / na;
    let vb = sb.variance / nb;
    let se = (va + vb).sqrt();
    if se == 0.0 {
        return None;
    }
    let statistic = (sa.mean - sb.mean) / se;
    let df = (va + vb).powi(2) / (va * va / (na - 1.0) + vb * vb / (nb - 1.0));
    Some(TTestResult {
        statistic,
        df,
        p_value: student_t_two_sided(statistic, df),
    })
}

/// Cohen's d effect size for two groups, using the pooled standard
/// deviation.
///
/// Returns `None` when either group has fewer than 2 values or the pooled
/// standard deviation is zero.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn cohen_d(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() < 2 || b.len() < 2 {
        return None;
    }
    let sa = DescriptiveStats::new(a)?;
    let sb = DescriptiveStats::new(b)?;
    let na = a.len() as f64;
    let nb = b.len() as f64;
    let pooled =
        (((na - 1.0) * sa.variance + (nb - 1.0) * sb.variance) / (na + nb - 2.0)).sqrt();
    if pooled == 0.0 {
        return None;
    }
    Some((sa.mean - sb.mean) / pooled)
}

/// Result of a one-way analysis of variance.
#[derive(Debug, Clone, PartialEq)]
pub struct AnovaResult {
    /// The F statistic.
    pub f_statistic: f64,
    /// Between-groups degrees of freedom (`k - 1`).
    pub df_between: f64,
    /// Within-groups degrees of freedom (`n - k`).
    pub df_within: f64,
    /// Upper-tail p-value.
    pub p_value: f64,
    /// Eta-squared effect size (`SS_between / SS_total`).
    pub eta_squared: f64,
}

/// One-way ANOVA across two or more groups.
///
/// Returns `None` when fewer than 2 groups are given, any group is empty,
/// the within-group degrees of freedom are zero, or all values are
/// identical.
///
/// # Examples
///
/// ```
/// use statqa_stats::hypothesis::one_way_anova;
///
/// let groups = vec![
///     vec![1.0, 2.0, 3.0],
///     vec![4.0, 5.0, 6.0],
///     vec![9.0, 10.0, 11.0],
/// ];
/// let anova = one_way_anova(&groups).unwrap();
/// assert!(anova.p_value < 0.01);
/// assert!(anova.eta_squared > 0.8);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn one_way_anova(groups: &[Vec<f64>]) -> Option<AnovaResult> {
    let k = groups.len();
    if k < 2 || groups.iter().any(Vec::is_empty) {
        return None;
    }
    let n: usize = groups.iter().map(Vec::len).sum();
    if n <= k {
        return None;
    }

    let grand_mean = groups.iter().flatten().sum::<f64>() / n as f64;
    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let gn = group.len() as f64;
        let mean = group.iter().sum::<f64>() / gn;
        ss_between += gn * (mean - grand_mean).powi(2);
        ss_within += group.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    }
    let ss_total = ss_between + ss_within;
    if ss_total == 0.0 || ss_within == 0.0 {
        return None;
    }

    let df_between = (k - 1) as f64;
    let df_within = (n - k) as f64;
    let f_statistic = (ss_between / df_between) / (ss_within / df_within);
    Some(AnovaResult {
        f_statistic,
        df_between,
        df_within,
        p_value: f_sf(f_statistic, df_between, df_within),
        eta_squared: ss_between / ss_total,
    })
}

/// Result of a chi-square test of independence.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiSquareResult {
    /// The chi-square statistic.
    pub statistic: f64,
    /// Degrees of freedom `(rows - 1) * (cols - 1)`.
    pub df: usize,
    /// Upper-tail p-value.
    pub p_value: f64,
    /// Cramer's V effect size in `[0, 1]`.
    pub cramers_v: f64,
}

/// Chi-square test of independence on a contingency table of counts.
///
/// `table[i][j]` is the observed count for row category `i` and column
/// category `j`. Returns `None` for tables with fewer than 2 rows or
/// columns, ragged rows, zero total, or a zero row/column margin.
///
/// # Examples
///
/// ```
/// use statqa_stats::hypothesis::chi_square_independence;
///
/// // Strong association between row and column
/// let table = vec![vec![30.0, 5.0], vec![5.0, 30.0]];
/// let test = chi_square_independence(&table).unwrap();
/// assert_eq!(test.df, 1);
/// assert!(test.p_value < 0.001);
/// assert!(test.cramers_v > 0.5);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn chi_square_independence(table: &[Vec<f64>]) -> Option<ChiSquareResult> {
    let rows = table.len();
    let cols = table.first()?.len();
    if rows < 2 || cols < 2 || table.iter().any(|row| row.len() != cols) {
        return None;
    }

    let row_totals: Vec<f64> = table.iter().map(|row| row.iter().sum()).collect();
    let col_totals: Vec<f64> = (0..cols)
        .map(|j| table.iter().map(|row| row[j]).sum())
        .collect();
    let total: f64 = row_totals.iter().sum();
    if total == 0.0
        || row_totals.iter().any(|&t| t == 0.0)
        || col_totals.iter().any(|&t| t == 0.0)
    {
        return None;
    }

    let mut statistic = 0.0;
    for (i, row) in table.iter().enumerate() {
        for (j, &observed) in row.iter().enumerate() {
            let expected = row_totals[i] * col_totals[j] / total;
            statistic += (observed - expected).powi(2) / expected;
        }
    }

    let df = (rows - 1) * (cols - 1);
    let min_dim = (rows - 1).min(cols - 1) as f64;
    Some(ChiSquareResult {
        statistic,
        df,
        p_value: chi_square_sf(statistic, df as f64),
        cramers_v: (statistic / (total * min_dim)).sqrt().min(1.0),
    })
}

/// Result of a normality test.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalityTest {
    /// The test statistic.
    pub statistic: f64,
    /// Upper-tail p-value against the normal null.
    pub p_value: f64,
}

/// Jarque-Bera test of normality.
///
/// The statistic `n/6 * (S^2 + K^2/4)` combines sample skewness `S` and
/// excess kurtosis `K` and is referred to a chi-square distribution with 2
/// degrees of freedom. Requires at least 8 values (the asymptotic reference
/// is unusable below that) and a non-degenerate variance.
///
/// # Examples
///
/// ```
/// use statqa_stats::hypothesis::jarque_bera;
///
/// // Heavily skewed sample
/// let mut values = vec![1.0; 30];
/// values.extend([50.0, 60.0, 70.0, 2.0, 3.0, 1.5, 2.5, 1.2]);
/// let test = jarque_bera(&values).unwrap();
/// assert!(test.p_value < 0.05);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn jarque_bera(values: &[f64]) -> Option<NormalityTest> {
    if values.len() < 8 {
        return None;
    }
    let stats = DescriptiveStats::new(values)?;
    let skew = stats.skewness?;
    let kurt = stats.kurtosis?;
    let n = values.len() as f64;
    let statistic = n / 6.0 * (skew * skew + kurt * kurt / 4.0);
    Some(NormalityTest {
        statistic,
        p_value: chi_square_sf(statistic, 2.0),
    })
}

/// Benjamini-Hochberg false-discovery-rate adjustment.
///
/// Returns adjusted p-values in the input order. The adjustment is the
/// standard step-up procedure: `p_(i) * m / i`, made monotone from the
/// largest rank downward and capped at 1.
///
/// # Examples
///
/// ```
/// use statqa_stats::hypothesis::benjamini_hochberg;
///
/// let adjusted = benjamini_hochberg(&[0.01, 0.04, 0.03, 0.005]);
/// assert_eq!(adjusted.len(), 4);
/// assert!(adjusted.iter().all(|&p| (0.0..=1.0).contains(&p)));
/// // The smallest raw p-value stays the smallest adjusted one
/// assert!(adjusted[3] <= adjusted[1]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    if m == 0 {
        return vec![];
    }
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut adjusted = vec![0.0; m];
    let mut running_min = 1.0_f64;
    for rank in (0..m).rev() {
        let idx = order[rank];
        let scaled = p_values[idx] * m as f64 / (rank + 1) as f64;
        running_min = running_min.min(scaled).min(1.0);
        adjusted[idx] = running_min;
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welch_identical_groups() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let test = welch_t_test(&a, &a).unwrap();
        assert!(test.statistic.abs() < 1e-12);
        assert!((test.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_welch_reference_value() {
        // Compared against scipy.stats.ttest_ind(equal_var=False)
        let a = [27.5, 21.0, 19.0, 23.6, 17.0, 17.9, 16.9, 20.1, 21.9, 22.6];
        let b = [27.1, 22.0, 20.8, 23.4, 23.4, 23.5, 25.8, 22.0, 24.8, 20.2];
        let test = welch_t_test(&a, &b).unwrap();
        assert!((test.statistic - (-2.036)).abs() < 0.01);
        assert!((test.p_value - 0.059).abs() < 0.005);
    }

    #[test]
    fn test_welch_constant_groups_undefined() {
        assert!(welch_t_test(&[1.0, 1.0], &[1.0, 1.0]).is_none());
    }

    #[test]
    fn test_cohen_d_sign_and_magnitude() {
        let a = [2.0, 3.0, 4.0];
        let b = [4.0, 5.0, 6.0];
        let d = cohen_d(&a, &b).unwrap();
        assert!((d + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_anova_no_group_difference() {
        let groups = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]];
        let anova = one_way_anova(&groups).unwrap();
        assert!(anova.f_statistic.abs() < 1e-12);
        assert!((anova.p_value - 1.0).abs() < 1e-9);
        assert!(anova.eta_squared.abs() < 1e-12);
    }

    #[test]
    fn test_anova_requires_within_variance() {
        let groups = vec![vec![1.0, 1.0], vec![2.0, 2.0]];
        assert!(one_way_anova(&groups).is_none());
    }

    #[test]
    fn test_anova_eta_squared_bounds() {
        let groups = vec![
            vec![1.0, 2.0, 3.0, 2.0],
            vec![2.0, 3.0, 4.0, 3.0],
            vec![5.0, 6.0, 7.0, 6.0],
        ];
        let anova = one_way_anova(&groups).unwrap();
        assert!(anova.eta_squared > 0.0);
        assert!(anova.eta_squared < 1.0);
    }

    #[test]
    fn test_chi_square_independent_table() {
        // Rows proportional to columns: statistic is 0
        let table = vec![vec![10.0, 20.0], vec![20.0, 40.0]];
        let test = chi_square_independence(&table).unwrap();
        assert!(test.statistic.abs() < 1e-12);
        assert!((test.p_value - 1.0).abs() < 1e-9);
        assert!(test.cramers_v.abs() < 1e-6);
    }

    #[test]
    fn test_chi_square_degenerate_margins() {
        let table = vec![vec![0.0, 0.0], vec![5.0, 5.0]];
        assert!(chi_square_independence(&table).is_none());
    }

    #[test]
    fn test_chi_square_rejects_single_row() {
        let table = vec![vec![5.0, 5.0]];
        assert!(chi_square_independence(&table).is_none());
    }

    #[test]
    fn test_jarque_bera_small_sample() {
        assert!(jarque_bera(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_none());
    }

    #[test]
    fn test_jarque_bera_symmetric_sample() {
        // Symmetric, light-tailed data should not reject normality
        let values: Vec<f64> = (-10..=10).map(f64::from).collect();
        let test = jarque_bera(&values).unwrap();
        assert!(test.p_value > 0.05);
    }

    #[test]
    fn test_benjamini_hochberg_monotone() {
        let raw = [0.001, 0.008, 0.039, 0.041, 0.042, 0.06, 0.074, 0.205];
        let adjusted = benjamini_hochberg(&raw);
        // Adjusted values are monotone in the raw ordering
        for window in adjusted.windows(2) {
            assert!(window[0] <= window[1] + 1e-12);
        }
        assert!(adjusted.iter().all(|&p| p <= 1.0));
        assert!(adjusted[0] >= raw[0]);
    }

    #[test]
    fn test_benjamini_hochberg_empty() {
        assert!(benjamini_hochberg(&[]).is_empty());
    }
}
