//! Pairwise relationship analysis.
//!
//! Dispatch is by the pair's semantic types, collapsed to two families:
//! numeric (continuous, discrete) and categorical (nominal, ordinal,
//! boolean). Datetime and text columns have no pairwise test and fail
//! with [`AnalysisError::UnsupportedTypeCombination`].
//!
//! The analyzer is best-effort across many pairs: below-floor samples
//! return `Ok(None)` rather than an error, so one thin pair never aborts
//! a batch.

use std::collections::BTreeMap;

use statqa_codebook::{DataTable, DataValue, Variable};
use statqa_stats::{correlation, descriptive::DescriptiveStats, hypothesis};

use crate::{
    config::AnalyzerConfig,
    effect_size::EffectSize,
    error::AnalysisError,
    result::{
        AssociationTest, BivariateResult, CorrelationTest, GroupComparisonTest, GroupSummary,
        GroupTest, PairTest,
    },
};

/// A chosen test with its computation log, or `None` below the sample
/// floor, plus the valid paired count either way.
type TestOutcome = (Option<(PairTest, Vec<String>)>, usize);

/// Computes relationship statistics for a pair of columns.
///
/// # Examples
///
/// ```
/// use statqa_analysis::{AnalyzerConfig, BivariateAnalyzer, result::PairTest};
/// use statqa_codebook::{DataTable, DataValue, SemanticType, Variable};
///
/// let table = DataTable::from_columns(vec![
///     ("x".to_string(), [1.0, 2.0, 3.0].map(DataValue::Number).to_vec()),
///     ("y".to_string(), [2.0, 4.0, 6.0].map(DataValue::Number).to_vec()),
/// ])
/// .unwrap();
/// let x = Variable::new("x", SemanticType::NumericContinuous);
/// let y = Variable::new("y", SemanticType::NumericContinuous);
///
/// let analyzer = BivariateAnalyzer::new(AnalyzerConfig::default());
/// let result = analyzer.analyze(&table, &x, &y).unwrap().unwrap();
/// let PairTest::Correlation(test) = &result.test else { unreachable!() };
/// assert!((test.pearson_r - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct BivariateAnalyzer {
    config: AnalyzerConfig,
}

impl BivariateAnalyzer {
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Analyzes the relationship between two columns.
    ///
    /// Returns `Ok(None)` when the valid paired sample is below the
    /// configured floor or a test's own minimum; returns an error only
    /// for missing columns and unsupported type pairings.
    pub fn analyze(
        &self,
        table: &DataTable,
        variable_a: &Variable,
        variable_b: &Variable,
    ) -> Result<Option<BivariateResult>, AnalysisError> {
        let pairs = paired_values(table, variable_a, variable_b)?;

        let a_ty = variable_a.semantic_type;
        let b_ty = variable_b.semantic_type;
        let (test, n) = match (
            a_ty.is_numeric(),
            a_ty.is_categorical(),
            b_ty.is_numeric(),
            b_ty.is_categorical(),
        ) {
            (true, _, true, _) => self.correlation(&pairs),
            (_, true, _, true) => self.association(&pairs),
            (_, true, true, _) => self.group_comparison(&pairs, variable_a, variable_b),
            (true, _, _, true) => {
                // Swap so the categorical variable always defines the groups.
                let swapped: Vec<_> = pairs.iter().map(|(a, b)| (b.clone(), a.clone())).collect();
                self.group_comparison(&swapped, variable_b, variable_a)
            }
            _ => {
                return Err(AnalysisError::UnsupportedTypeCombination {
                    left: a_ty,
                    right: b_ty,
                });
            }
        };

        Ok(test.map(|(test, log)| BivariateResult {
            variable_a: variable_a.name.clone(),
            label_a: variable_a.display_label().to_string(),
            variable_b: variable_b.name.clone(),
            label_b: variable_b.display_label().to_string(),
            n,
            test,
            computation_log: log,
        }))
    }

    fn correlation(&self, pairs: &[(DataValue, DataValue)]) -> TestOutcome {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs
            .iter()
            .filter_map(|(a, b)| Some((a.as_number()?, b.as_number()?)))
            .unzip();
        let n = x.len();
        if n < self.config.min_paired_n {
            return (None, n);
        }
        let Some(pearson) = correlation::pearson(&x, &y) else {
            return (None, n);
        };
        let Some(spearman) = correlation::spearman(&x, &y) else {
            return (None, n);
        };

        let effect_size = EffectSize::from_correlation(pearson.r);
        let log = vec![
            format!("pearson r = {:.4} over {n} pairs, p = {:.4}", pearson.r, pearson.p_value),
            format!("spearman rho = {:.4}, p = {:.4}", spearman.r, spearman.p_value),
        ];
        let test = PairTest::Correlation(CorrelationTest {
            pearson_r: pearson.r,
            pearson_p: pearson.p_value,
            spearman_rho: spearman.r,
            spearman_p: spearman.p_value,
            effect_size,
            significant: self.config.is_significant(pearson.p_value),
        });
        (Some((test, log)), n)
    }

    fn association(&self, pairs: &[(DataValue, DataValue)]) -> TestOutcome {
        let coded: Vec<(String, String)> = pairs
            .iter()
            .filter_map(|(a, b)| Some((a.as_category_code()?, b.as_category_code()?)))
            .collect();
        let n = coded.len();
        if n < self.config.min_paired_n {
            return (None, n);
        }

        // Contingency table with BTreeMap keys for a deterministic layout.
        let mut row_codes = BTreeMap::new();
        let mut col_codes = BTreeMap::new();
        for (a, b) in &coded {
            let next = row_codes.len();
            row_codes.entry(a.clone()).or_insert(next);
            let next = col_codes.len();
            col_codes.entry(b.clone()).or_insert(next);
        }
        let mut counts = vec![vec![0.0; col_codes.len()]; row_codes.len()];
        for (a, b) in &coded {
            counts[row_codes[a]][col_codes[b]] += 1.0;
        }

        let Some(chi) = hypothesis::chi_square_independence(&counts) else {
            return (None, n);
        };

        let effect_size = EffectSize::from_cramers_v(chi.cramers_v);
        let log = vec![
            format!(
                "chi-square = {:.4} on {} df over a {}x{} table of {n} observations",
                chi.statistic,
                chi.df,
                row_codes.len(),
                col_codes.len()
            ),
            format!("cramers v = {:.4}", chi.cramers_v),
        ];
        let test = PairTest::Association(AssociationTest {
            chi_square: chi.statistic,
            df: chi.df,
            p_value: chi.p_value,
            cramers_v: chi.cramers_v,
            effect_size,
            significant: self.config.is_significant(chi.p_value),
        });
        (Some((test, log)), n)
    }

    /// `pairs` must already be ordered (category, value).
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn group_comparison(
        &self,
        pairs: &[(DataValue, DataValue)],
        group_variable: &Variable,
        value_variable: &Variable,
    ) -> TestOutcome {
        let mut by_group: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (category, value) in pairs {
            let (Some(code), Some(v)) = (category.as_category_code(), value.as_number()) else {
                continue;
            };
            by_group.entry(code).or_default().push(v);
        }

        // Thin groups cannot support a variance estimate.
        by_group.retain(|_, values| values.len() >= self.config.min_group_n);
        let n: usize = by_group.values().map(Vec::len).sum();
        if by_group.len() < 2 || n < self.config.min_paired_n {
            return (None, n);
        }

        let groups: Vec<GroupSummary> = by_group
            .iter()
            .map(|(code, values)| {
                let stats = DescriptiveStats::new(values)
                    .unwrap_or_else(|| unreachable!("groups are non-empty"));
                GroupSummary {
                    category: code.clone(),
                    label: group_variable.value_label(code).map(String::from),
                    n: values.len(),
                    mean: stats.mean,
                    std_dev: stats.std_dev,
                }
            })
            .collect();

        let samples: Vec<Vec<f64>> = by_group.into_values().collect();
        let mut log = vec![format!(
            "grouped '{}' by '{}' into {} groups ({n} observations)",
            value_variable.name,
            group_variable.name,
            samples.len()
        )];

        let (method, p_value, effect_size) = if samples.len() == 2 {
            let Some(t) = hypothesis::welch_t_test(&samples[0], &samples[1]) else {
                return (None, n);
            };
            let Some(d) = hypothesis::cohen_d(&samples[0], &samples[1]) else {
                return (None, n);
            };
            log.push(format!(
                "welch t = {:.4} on {:.2} df, p = {:.4}, cohen d = {:.4}",
                t.statistic, t.df, t.p_value, d
            ));
            (
                GroupTest::WelchT {
                    statistic: t.statistic,
                    df: t.df,
                    p_value: t.p_value,
                    cohen_d: d,
                },
                t.p_value,
                EffectSize::from_cohen_d(d),
            )
        } else {
            let Some(anova) = hypothesis::one_way_anova(&samples) else {
                return (None, n);
            };
            log.push(format!(
                "anova f = {:.4} on ({}, {}) df, p = {:.4}, eta^2 = {:.4}",
                anova.f_statistic, anova.df_between, anova.df_within, anova.p_value,
                anova.eta_squared
            ));
            (
                GroupTest::Anova {
                    f_statistic: anova.f_statistic,
                    // `k - 1` and `n - k` are exact integers.
                    df_between: anova.df_between as usize,
                    df_within: anova.df_within as usize,
                    p_value: anova.p_value,
                    eta_squared: anova.eta_squared,
                },
                anova.p_value,
                EffectSize::from_eta_squared(anova.eta_squared),
            )
        };

        let test = PairTest::GroupComparison(GroupComparisonTest {
            group_variable: group_variable.name.clone(),
            value_variable: value_variable.name.clone(),
            groups,
            method,
            effect_size,
            significant: self.config.is_significant(p_value),
        });
        (Some((test, log)), n)
    }
}

/// Extracts row-aligned pairs where both variables are valid.
fn paired_values(
    table: &DataTable,
    variable_a: &Variable,
    variable_b: &Variable,
) -> Result<Vec<(DataValue, DataValue)>, AnalysisError> {
    let column_a = table
        .column(&variable_a.name)
        .ok_or_else(|| AnalysisError::MissingColumn {
            name: variable_a.name.clone(),
        })?;
    let column_b = table
        .column(&variable_b.name)
        .ok_or_else(|| AnalysisError::MissingColumn {
            name: variable_b.name.clone(),
        })?;

    Ok(column_a
        .iter()
        .zip(column_b)
        .filter(|(a, b)| !variable_a.is_missing(a) && !variable_b.is_missing(b))
        .map(|(a, b)| (a.clone(), b.clone()))
        .collect())
}
