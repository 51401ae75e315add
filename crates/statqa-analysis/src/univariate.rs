//! Single-column descriptive analysis.
//!
//! The analyzer drops null and declared-missing values, then branches on
//! the variable's semantic type: numeric types (and datetime, treated as
//! numeric) get moment statistics, quantiles, a normality check, and a
//! robust outlier count; categorical types (and free text, treated as
//! nominal) get a frequency table, mode, and entropy-based diversity.

use statqa_codebook::{DataValue, Variable};
use statqa_stats::{descriptive::DescriptiveStats, frequency::FrequencyTable, hypothesis};

use crate::{
    config::AnalyzerConfig,
    error::AnalysisError,
    result::{
        CategoricalSummary, CategoryCount, NormalityReport, NumericSummary, UnivariateResult,
        VariableSummary,
    },
};

/// Computes descriptive statistics for one column.
///
/// # Examples
///
/// ```
/// use statqa_analysis::{AnalyzerConfig, UnivariateAnalyzer, result::VariableSummary};
/// use statqa_codebook::{DataValue, SemanticType, Variable};
///
/// let analyzer = UnivariateAnalyzer::new(AnalyzerConfig::default());
/// let variable = Variable::new("score", SemanticType::NumericContinuous)
///     .with_label("Score");
/// let values: Vec<DataValue> = [1.0, 2.0, 3.0, 4.0, 5.0]
///     .map(DataValue::Number)
///     .to_vec();
///
/// let result = analyzer.analyze(&values, &variable).unwrap();
/// assert_eq!(result.n, 5);
/// let VariableSummary::Numeric(summary) = &result.summary else {
///     unreachable!()
/// };
/// assert_eq!(summary.mean, 3.0);
/// assert_eq!(summary.median, 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct UnivariateAnalyzer {
    config: AnalyzerConfig,
}

impl UnivariateAnalyzer {
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Analyzes one column of values under its variable descriptor.
    ///
    /// `values` must be aligned 1:1 with the table's rows. Returns
    /// [`AnalysisError::InsufficientData`] when no valid observation
    /// remains after missing-value exclusion.
    pub fn analyze(
        &self,
        values: &[DataValue],
        variable: &Variable,
    ) -> Result<UnivariateResult, AnalysisError> {
        let valid: Vec<&DataValue> = values
            .iter()
            .filter(|v| !variable.is_missing(v))
            .collect();
        let excluded = values.len() - valid.len();

        if valid.is_empty() {
            return Err(AnalysisError::InsufficientData {
                variable: variable.name.clone(),
                valid_n: 0,
            });
        }

        let mut log = vec![format!(
            "excluded {excluded} of {} values as null or declared-missing",
            values.len()
        )];

        // Datetime columns arrive as numeric time buckets (e.g. years);
        // free text falls back to nominal treatment.
        let ty = variable.semantic_type;
        let (summary, n) = if ty.is_numeric() || ty == statqa_codebook::SemanticType::Datetime {
            self.numeric_summary(&valid, variable, &mut log)?
        } else {
            self.categorical_summary(&valid, variable, &mut log)?
        };

        Ok(UnivariateResult {
            variable: variable.name.clone(),
            label: variable.display_label().to_string(),
            n,
            excluded: values.len() - n,
            summary,
            computation_log: log,
        })
    }

    fn numeric_summary(
        &self,
        valid: &[&DataValue],
        variable: &Variable,
        log: &mut Vec<String>,
    ) -> Result<(VariableSummary, usize), AnalysisError> {
        let numeric: Vec<f64> = valid.iter().filter_map(|v| v.as_number()).collect();
        let Some(stats) = DescriptiveStats::new(&numeric) else {
            return Err(AnalysisError::InsufficientData {
                variable: variable.name.clone(),
                valid_n: 0,
            });
        };

        let normality = hypothesis::jarque_bera(&numeric).map(|test| NormalityReport {
            statistic: test.statistic,
            p_value: test.p_value,
            non_normal: self.config.is_significant(test.p_value),
        });
        let outlier_count = stats.count_outliers(&numeric, self.config.outlier_z_threshold);

        log.push(format!(
            "mean = sum({:.4}) / {} = {:.4}",
            numeric.iter().sum::<f64>(),
            stats.n,
            stats.mean
        ));
        log.push(format!(
            "std_dev = sqrt(sample variance {:.4}) = {:.4}",
            stats.variance, stats.std_dev
        ));
        log.push(format!(
            "quartiles by linear interpolation: q25={:.4}, median={:.4}, q75={:.4}",
            stats.q25, stats.median, stats.q75
        ));
        if outlier_count > 0 {
            log.push(format!(
                "{outlier_count} value(s) with |0.6745 * (x - median) / MAD| > {}",
                self.config.outlier_z_threshold
            ));
        }

        Ok((
            VariableSummary::Numeric(NumericSummary {
                mean: stats.mean,
                median: stats.median,
                std_dev: stats.std_dev,
                min: stats.min,
                max: stats.max,
                q25: stats.q25,
                q75: stats.q75,
                mad: stats.mad,
                skewness: stats.skewness,
                kurtosis: stats.kurtosis,
                normality,
                outlier_count,
            }),
            stats.n,
        ))
    }

    fn categorical_summary(
        &self,
        valid: &[&DataValue],
        variable: &Variable,
        log: &mut Vec<String>,
    ) -> Result<(VariableSummary, usize), AnalysisError> {
        let codes: Vec<String> = valid.iter().filter_map(|v| v.as_category_code()).collect();
        let Some(table) = FrequencyTable::new(codes) else {
            return Err(AnalysisError::InsufficientData {
                variable: variable.name.clone(),
                valid_n: 0,
            });
        };

        let categories: Vec<CategoryCount> = table
            .entries
            .iter()
            .map(|entry| CategoryCount {
                code: entry.category.clone(),
                label: variable.value_label(&entry.category).map(String::from),
                count: entry.count,
                percentage: entry.percentage,
            })
            .collect();

        let mode_entry = table.mode();
        let mode = CategoryCount {
            code: mode_entry.category.clone(),
            label: variable.value_label(&mode_entry.category).map(String::from),
            count: mode_entry.count,
            percentage: mode_entry.percentage,
        };

        let entropy = table.entropy();
        let normalized_entropy = table.normalized_entropy();
        let high_diversity = normalized_entropy >= self.config.high_diversity_threshold;

        log.push(format!(
            "frequency table over {} categories, mode '{}' at {:.2}%",
            categories.len(),
            mode.code,
            mode.percentage
        ));
        log.push(format!(
            "normalized entropy = {normalized_entropy:.4} ({} diversity)",
            if high_diversity { "high" } else { "low" }
        ));

        Ok((
            VariableSummary::Categorical(CategoricalSummary {
                categories,
                mode,
                entropy,
                normalized_entropy,
                high_diversity,
            }),
            table.n,
        ))
    }
}

#[cfg(test)]
mod tests {
    use statqa_codebook::SemanticType;

    use super::*;

    fn analyzer() -> UnivariateAnalyzer {
        UnivariateAnalyzer::new(AnalyzerConfig::default())
    }

    fn numbers(values: &[f64]) -> Vec<DataValue> {
        values.iter().copied().map(DataValue::Number).collect()
    }

    #[test]
    fn test_numeric_summary_for_small_sample() {
        let variable =
            Variable::new("score", SemanticType::NumericContinuous).with_label("Score");
        let result = analyzer()
            .analyze(&numbers(&[1.0, 2.0, 3.0, 4.0, 5.0]), &variable)
            .unwrap();

        assert_eq!(result.n, 5);
        assert_eq!(result.label, "Score");
        let VariableSummary::Numeric(summary) = &result.summary else {
            panic!("expected numeric summary");
        };
        assert_eq!(summary.mean, 3.0);
        assert_eq!(summary.median, 3.0);
        assert!((summary.std_dev - 1.5811).abs() < 1e-3);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
    }

    #[test]
    fn test_quartile_ordering() {
        let variable = Variable::new("x", SemanticType::NumericContinuous);
        let result = analyzer()
            .analyze(&numbers(&[9.0, 1.0, 4.0, 7.0, 2.0, 8.0, 3.0]), &variable)
            .unwrap();
        let VariableSummary::Numeric(s) = &result.summary else {
            panic!("expected numeric summary");
        };
        assert!(s.min <= s.q25 && s.q25 <= s.median && s.median <= s.q75 && s.q75 <= s.max);
    }

    #[test]
    fn test_missing_codes_are_excluded() {
        let variable = Variable::new("x", SemanticType::NumericContinuous)
            .with_missing_code(DataValue::Number(999.0));
        let mut values = numbers(&[1.0, 2.0, 3.0]);
        values.push(DataValue::Number(999.0));
        values.push(DataValue::Null);

        let result = analyzer().analyze(&values, &variable).unwrap();
        assert_eq!(result.n, 3);
        assert_eq!(result.excluded, 2);
    }

    #[test]
    fn test_all_missing_is_insufficient_data() {
        let variable = Variable::new("x", SemanticType::NumericContinuous)
            .with_missing_code(DataValue::Number(-1.0));
        let err = analyzer()
            .analyze(&numbers(&[-1.0, -1.0, -1.0]), &variable)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientData { valid_n: 0, .. }
        ));
    }

    #[test]
    fn test_categorical_frequencies_and_mode() {
        let variable = Variable::new("grade", SemanticType::CategoricalNominal);
        let values: Vec<DataValue> = ["A", "A", "A", "B"].map(DataValue::from).to_vec();
        let result = analyzer().analyze(&values, &variable).unwrap();

        assert_eq!(result.n, 4);
        let VariableSummary::Categorical(s) = &result.summary else {
            panic!("expected categorical summary");
        };
        assert_eq!(s.mode.code, "A");
        assert_eq!(s.mode.percentage, 75.0);
        let total: f64 = s.categories.iter().map(|c| c.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_labels_are_attached() {
        let variable = Variable::new("gender", SemanticType::CategoricalNominal)
            .with_value_label("1", "Male")
            .with_value_label("2", "Female");
        let values = numbers(&[1.0, 2.0, 2.0]);
        let result = analyzer().analyze(&values, &variable).unwrap();

        let VariableSummary::Categorical(s) = &result.summary else {
            panic!("expected categorical summary");
        };
        assert_eq!(s.mode.code, "2");
        assert_eq!(s.mode.label.as_deref(), Some("Female"));
        assert_eq!(s.categories[0].label.as_deref(), Some("Male"));
    }

    #[test]
    fn test_determinism_across_calls() {
        let variable = Variable::new("x", SemanticType::CategoricalNominal);
        let values: Vec<DataValue> = ["B", "A", "C", "A", "B", "A"].map(DataValue::from).to_vec();
        let first = analyzer().analyze(&values, &variable).unwrap();
        let second = analyzer().analyze(&values, &variable).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_outliers_counted_with_robust_z() {
        let variable = Variable::new("x", SemanticType::NumericContinuous);
        let values = numbers(&[
            10.0, 11.0, 10.5, 9.5, 10.2, 9.8, 10.1, 9.9, 10.3, 9.7, 500.0,
        ]);
        let result = analyzer().analyze(&values, &variable).unwrap();
        let VariableSummary::Numeric(s) = &result.summary else {
            panic!("expected numeric summary");
        };
        assert_eq!(s.outlier_count, 1);
    }

    #[test]
    fn test_text_takes_the_categorical_branch() {
        let variable = Variable::new("notes", SemanticType::Text);
        let values: Vec<DataValue> = ["yes", "no", "yes"].map(DataValue::from).to_vec();
        let result = analyzer().analyze(&values, &variable).unwrap();
        assert!(matches!(result.summary, VariableSummary::Categorical(_)));
    }
}
