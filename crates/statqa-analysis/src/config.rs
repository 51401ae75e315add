//! Analyzer thresholds.

/// Tunable thresholds shared by all analyzers.
///
/// The defaults are the fixed values used throughout the pipeline; tests
/// override individual fields to exercise threshold behavior
/// deterministically.
///
/// # Examples
///
/// ```
/// use statqa_analysis::AnalyzerConfig;
///
/// let config = AnalyzerConfig::default();
/// assert_eq!(config.significance_level, 0.05);
///
/// let strict = AnalyzerConfig {
///     significance_level: 0.01,
///     ..AnalyzerConfig::default()
/// };
/// assert_eq!(strict.outlier_z_threshold, 3.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    /// Two-sided p-value threshold below which a test is flagged
    /// significant.
    pub significance_level: f64,
    /// Modified z-score (MAD-based) above which a numeric value counts
    /// as an outlier.
    pub outlier_z_threshold: f64,
    /// Normalized-entropy threshold at or above which a categorical
    /// variable is flagged high-diversity.
    pub high_diversity_threshold: f64,
    /// Minimum valid paired observations for any bivariate or temporal
    /// test.
    pub min_paired_n: usize,
    /// Minimum observations per group for group-comparison tests.
    pub min_group_n: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            outlier_z_threshold: 3.5,
            high_diversity_threshold: 0.75,
            min_paired_n: 3,
            min_group_n: 2,
        }
    }
}

impl AnalyzerConfig {
    /// Whether a p-value counts as significant under this configuration.
    #[must_use]
    pub fn is_significant(&self, p_value: f64) -> bool {
        p_value < self.significance_level
    }
}
