//! Structured analysis results.
//!
//! Each analyzer returns one of these immutable records. They carry the
//! variable labels and per-group summaries the downstream formatter
//! needs, so rendering never has to reach back into the table, plus a
//! `computation_log` of the literal numeric operations behind the
//! headline statistics for provenance stamping.

use serde::Serialize;

use crate::effect_size::EffectSize;

/// Result of one analyzer invocation, tagged by analysis family.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum AnalysisResult {
    Univariate(UnivariateResult),
    Bivariate(BivariateResult),
    Temporal(TemporalResult),
    Causal(CausalResult),
}

impl AnalysisResult {
    /// The analysis family's canonical name, matching the serialized
    /// `analysis` tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Univariate(_) => "univariate",
            Self::Bivariate(_) => "bivariate",
            Self::Temporal(_) => "temporal",
            Self::Causal(_) => "causal",
        }
    }

    /// Names of the variables involved, in role order.
    #[must_use]
    pub fn variable_names(&self) -> Vec<&str> {
        match self {
            Self::Univariate(r) => vec![r.variable.as_str()],
            Self::Bivariate(r) => vec![r.variable_a.as_str(), r.variable_b.as_str()],
            Self::Temporal(r) => vec![r.time_variable.as_str(), r.target_variable.as_str()],
            Self::Causal(r) => {
                let mut names = vec![r.treatment.as_str(), r.outcome.as_str()];
                names.extend(r.confounders.iter().map(String::as_str));
                names
            }
        }
    }

    /// The recorded numeric operations behind this result.
    #[must_use]
    pub fn computation_log(&self) -> &[String] {
        match self {
            Self::Univariate(r) => &r.computation_log,
            Self::Bivariate(r) => &r.computation_log,
            Self::Temporal(r) => &r.computation_log,
            Self::Causal(r) => &r.computation_log,
        }
    }

    /// Valid sample size after missing-value exclusion.
    #[must_use]
    pub fn n(&self) -> usize {
        match self {
            Self::Univariate(r) => r.n,
            Self::Bivariate(r) => r.n,
            Self::Temporal(r) => r.n,
            Self::Causal(r) => r.n,
        }
    }
}

/// Descriptive statistics for one column.
#[derive(Debug, Clone, Serialize)]
pub struct UnivariateResult {
    /// Column name.
    pub variable: String,
    /// Display label (falls back to the name).
    pub label: String,
    /// Valid observations after missing-value exclusion.
    pub n: usize,
    /// Observations dropped as null or declared-missing.
    pub excluded: usize,
    /// Branch-specific summary.
    pub summary: VariableSummary,
    /// Numeric operations behind the summary.
    pub computation_log: Vec<String>,
}

/// Numeric or categorical summary, selected by the variable's semantic
/// type.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VariableSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Numeric-branch descriptives.
#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
    /// Median absolute deviation.
    pub mad: f64,
    /// Sample skewness; `None` below 3 observations or at zero variance.
    pub skewness: Option<f64>,
    /// Excess kurtosis; `None` below 4 observations or at zero variance.
    pub kurtosis: Option<f64>,
    /// Jarque-Bera normality check; `None` below 8 observations.
    pub normality: Option<NormalityReport>,
    /// Values whose MAD-based modified z-score exceeds the configured
    /// threshold.
    pub outlier_count: usize,
}

/// Normality test outcome.
#[derive(Debug, Clone, Serialize)]
pub struct NormalityReport {
    pub statistic: f64,
    pub p_value: f64,
    /// Whether the null of normality was rejected at the configured
    /// significance level.
    pub non_normal: bool,
}

/// Categorical-branch descriptives.
#[derive(Debug, Clone, Serialize)]
pub struct CategoricalSummary {
    /// One row per category, sorted by code.
    pub categories: Vec<CategoryCount>,
    /// Most frequent category; ties break to the smallest code.
    pub mode: CategoryCount,
    /// Shannon entropy in nats.
    pub entropy: f64,
    /// Entropy normalized to [0, 1] by the category count.
    pub normalized_entropy: f64,
    /// Whether normalized entropy meets the configured diversity
    /// threshold.
    pub high_diversity: bool,
}

/// One category's count, percentage, and display label.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    /// Raw category code.
    pub code: String,
    /// Display label from the codebook, when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub count: usize,
    pub percentage: f64,
}

impl CategoryCount {
    /// The label when present, otherwise the raw code.
    #[must_use]
    pub fn display(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.code)
    }
}

/// Relationship statistics for a pair of columns.
#[derive(Debug, Clone, Serialize)]
pub struct BivariateResult {
    pub variable_a: String,
    pub label_a: String,
    pub variable_b: String,
    pub label_b: String,
    /// Valid paired observations.
    pub n: usize,
    pub test: PairTest,
    pub computation_log: Vec<String>,
}

impl BivariateResult {
    /// The primary p-value of whichever test ran, for multiple-testing
    /// adjustment across a batch of pairs.
    #[must_use]
    pub fn p_value(&self) -> f64 {
        match &self.test {
            PairTest::Correlation(t) => t.pearson_p,
            PairTest::Association(t) => t.p_value,
            PairTest::GroupComparison(t) => match &t.method {
                GroupTest::WelchT { p_value, .. } | GroupTest::Anova { p_value, .. } => *p_value,
            },
        }
    }

    /// Effect-size label of whichever test ran.
    #[must_use]
    pub fn effect_size(&self) -> EffectSize {
        match &self.test {
            PairTest::Correlation(t) => t.effect_size,
            PairTest::Association(t) => t.effect_size,
            PairTest::GroupComparison(t) => t.effect_size,
        }
    }
}

/// Test family chosen by the pair's semantic types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum PairTest {
    /// numeric x numeric.
    Correlation(CorrelationTest),
    /// categorical x categorical.
    Association(AssociationTest),
    /// categorical x numeric.
    GroupComparison(GroupComparisonTest),
}

/// Pearson and Spearman correlation with asymptotic p-values.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationTest {
    pub pearson_r: f64,
    pub pearson_p: f64,
    pub spearman_rho: f64,
    pub spearman_p: f64,
    /// Labeled from |Pearson r|.
    pub effect_size: EffectSize,
    pub significant: bool,
}

/// Chi-square independence test with Cramér's V.
#[derive(Debug, Clone, Serialize)]
pub struct AssociationTest {
    pub chi_square: f64,
    pub df: usize,
    pub p_value: f64,
    pub cramers_v: f64,
    pub effect_size: EffectSize,
    pub significant: bool,
}

/// Group-mean comparison of a numeric variable across categories.
#[derive(Debug, Clone, Serialize)]
pub struct GroupComparisonTest {
    /// The categorical variable defining the groups.
    pub group_variable: String,
    /// The numeric variable compared across groups.
    pub value_variable: String,
    /// Per-group descriptives, sorted by category code.
    pub groups: Vec<GroupSummary>,
    pub method: GroupTest,
    pub effect_size: EffectSize,
    pub significant: bool,
}

/// Per-group mean and spread.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl GroupSummary {
    /// The label when present, otherwise the raw code.
    #[must_use]
    pub fn display(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.category)
    }
}

/// Two-group Welch t-test or multi-group one-way ANOVA.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum GroupTest {
    WelchT {
        statistic: f64,
        df: f64,
        p_value: f64,
        cohen_d: f64,
    },
    Anova {
        f_statistic: f64,
        df_between: usize,
        df_within: usize,
        p_value: f64,
        eta_squared: f64,
    },
}

/// Trend and change-point statistics over a (time, value) pair.
#[derive(Debug, Clone, Serialize)]
pub struct TemporalResult {
    pub time_variable: String,
    pub time_label: String,
    pub target_variable: String,
    pub target_label: String,
    /// Valid paired observations, in time order.
    pub n: usize,
    /// Mann-Kendall trend test; `None` when the series is too short or
    /// constant.
    pub trend: Option<TrendReport>,
    /// Best mean-shift split, when one exists.
    pub change_point: Option<ChangePointReport>,
    /// Change in the target's mean between consecutive time buckets.
    pub deltas: Vec<PeriodDelta>,
    pub computation_log: Vec<String>,
}

/// Mann-Kendall monotonic trend outcome.
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    /// Sum of pairwise signs.
    pub s: i64,
    pub z: f64,
    pub p_value: f64,
    pub direction: TrendDirection,
    pub significant: bool,
}

/// Sign of the detected trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    #[display("increasing")]
    Increasing,
    #[display("decreasing")]
    Decreasing,
    #[display("stable")]
    Stable,
}

/// A detected shift in the target's mean.
#[derive(Debug, Clone, Serialize)]
pub struct ChangePointReport {
    /// Time value at which the second segment starts.
    pub time: f64,
    /// Between-segment sum of squares at the chosen split.
    pub score: f64,
}

/// Change in the target's mean between two consecutive time buckets.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodDelta {
    pub from_time: f64,
    pub to_time: f64,
    pub from_value: f64,
    pub to_value: f64,
    pub absolute_change: f64,
    /// `None` when the earlier value is zero.
    pub percent_change: Option<f64>,
}

/// Confounder-adjusted regression effect estimate.
///
/// The estimate is an association under the stated control set only;
/// omitted-confounder bias is not quantified, and generated text must
/// qualify any "effect" language accordingly.
#[derive(Debug, Clone, Serialize)]
pub struct CausalResult {
    pub treatment: String,
    pub treatment_label: String,
    pub outcome: String,
    pub outcome_label: String,
    /// Confounder variable names in specification order.
    pub confounders: Vec<String>,
    /// Complete cases across treatment, outcome, and confounders.
    pub n: usize,
    pub model: ModelKind,
    /// Treatment coefficient controlling for the confounders.
    pub adjusted: EffectEstimate,
    /// Treatment coefficient from the outcome-on-treatment fit alone.
    pub unadjusted: EffectEstimate,
    /// Whether the iterative solver converged (always `true` for the
    /// linear model).
    pub converged: bool,
    pub computation_log: Vec<String>,
}

/// Regression family, chosen by the outcome's semantic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[display("linear")]
    Linear,
    #[display("logistic")]
    Logistic,
}

/// One regression coefficient with its uncertainty.
#[derive(Debug, Clone, Serialize)]
pub struct EffectEstimate {
    pub coefficient: f64,
    pub standard_error: f64,
    /// Two-sided confidence level of the interval, as a fraction (0.95
    /// under the default significance level).
    pub confidence_level: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub p_value: f64,
    pub significant: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bivariate() -> BivariateResult {
        BivariateResult {
            variable_a: "income".to_string(),
            label_a: "Income".to_string(),
            variable_b: "education".to_string(),
            label_b: "Education".to_string(),
            n: 100,
            test: PairTest::Correlation(CorrelationTest {
                pearson_r: 0.42,
                pearson_p: 0.001,
                spearman_rho: 0.40,
                spearman_p: 0.002,
                effect_size: EffectSize::Medium,
                significant: true,
            }),
            computation_log: vec!["pearson r = 0.42 over 100 pairs".to_string()],
        }
    }

    #[test]
    fn test_primary_p_value_tracks_the_test() {
        assert_eq!(sample_bivariate().p_value(), 0.001);
    }

    #[test]
    fn test_variable_names_in_role_order() {
        let result = AnalysisResult::Bivariate(sample_bivariate());
        assert_eq!(result.variable_names(), ["income", "education"]);
    }

    #[test]
    fn test_serialization_tags() {
        let json =
            serde_json::to_value(AnalysisResult::Bivariate(sample_bivariate())).unwrap();
        assert_eq!(json["analysis"], "bivariate");
        assert_eq!(json["test"]["test"], "correlation");
        assert_eq!(json["test"]["effect_size"], "medium");
    }
}
