//! Natural-language rendering of analysis results.
//!
//! Each function is a pure function of its result: no I/O, no
//! randomness, byte-identical output on repeated calls. Statistics
//! render with 2 decimals and thousands separators, ranges as
//! `[min, max]`, and p-values below 0.001 as `p<0.001`. Variables
//! appear under their display label, never their internal name.

use statqa_analysis::result::{
    AnalysisResult, BivariateResult, CausalResult, GroupTest, ModelKind, PairTest, TemporalResult,
    TrendDirection, UnivariateResult, VariableSummary,
};

/// Renders any analysis result.
#[must_use]
pub fn format_result(result: &AnalysisResult) -> String {
    match result {
        AnalysisResult::Univariate(r) => format_univariate(r),
        AnalysisResult::Bivariate(r) => format_bivariate(r),
        AnalysisResult::Temporal(r) => format_temporal(r),
        AnalysisResult::Causal(r) => format_causal(r),
    }
}

/// Renders a univariate result.
///
/// # Examples
///
/// ```
/// use statqa_analysis::{AnalyzerConfig, UnivariateAnalyzer};
/// use statqa_codebook::{DataValue, SemanticType, Variable};
/// use statqa_insight::formatter::format_univariate;
///
/// let variable = Variable::new("score", SemanticType::NumericContinuous)
///     .with_label("Score");
/// let values: Vec<DataValue> = [1.0, 2.0, 3.0, 4.0, 5.0]
///     .map(DataValue::Number)
///     .to_vec();
/// let result = UnivariateAnalyzer::new(AnalyzerConfig::default())
///     .analyze(&values, &variable)
///     .unwrap();
///
/// let text = format_univariate(&result);
/// assert!(text.contains("Score"));
/// assert!(text.contains("mean=3.00"));
/// ```
#[must_use]
pub fn format_univariate(result: &UnivariateResult) -> String {
    match &result.summary {
        VariableSummary::Numeric(s) => {
            let mut text = format!(
                "{} has mean={} (SD={}), median={} (IQR {}-{}), range [{}, {}] across {} valid observations",
                result.label,
                num(s.mean),
                num(s.std_dev),
                num(s.median),
                num(s.q25),
                num(s.q75),
                num(s.min),
                num(s.max),
                count(result.n),
            );
            if let Some(normality) = &s.normality
                && normality.non_normal
            {
                text.push_str(&format!(
                    "; the distribution departs from normality ({})",
                    p_value(normality.p_value)
                ));
            }
            if s.outlier_count > 0 {
                text.push_str(&format!(
                    "; {} outlying value(s) detected",
                    count(s.outlier_count)
                ));
            }
            text.push('.');
            text
        }
        VariableSummary::Categorical(s) => {
            let mut text = format!(
                "{} is most often '{}' ({}% of {} valid responses) across {} categories",
                result.label,
                s.mode.display(),
                num(s.mode.percentage),
                count(result.n),
                s.categories.len(),
            );
            text.push_str(&format!(
                "; responses show {} diversity (normalized entropy {})",
                if s.high_diversity { "high" } else { "low" },
                num(s.normalized_entropy)
            ));
            text.push('.');
            text
        }
    }
}

/// Renders a bivariate result.
#[must_use]
pub fn format_bivariate(result: &BivariateResult) -> String {
    match &result.test {
        PairTest::Correlation(t) => {
            let direction = if t.pearson_r >= 0.0 {
                "positive"
            } else {
                "negative"
            };
            format!(
                "{} and {} show a {} {} correlation (Pearson r={}, {}; Spearman rho={}), {} at n={}.",
                result.label_a,
                result.label_b,
                t.effect_size,
                direction,
                num(t.pearson_r),
                p_value(t.pearson_p),
                num(t.spearman_rho),
                significance(t.significant),
                count(result.n),
            )
        }
        PairTest::Association(t) => format!(
            "{} and {} show a {} association (chi-square={}, df={}, {}; Cramer's V={}), {} at n={}.",
            result.label_a,
            result.label_b,
            t.effect_size,
            num(t.chi_square),
            t.df,
            p_value(t.p_value),
            num(t.cramers_v),
            significance(t.significant),
            count(result.n),
        ),
        PairTest::GroupComparison(t) => {
            let groups = t
                .groups
                .iter()
                .map(|g| {
                    format!(
                        "{} (M={}, SD={}, n={})",
                        g.display(),
                        num(g.mean),
                        num(g.std_dev),
                        count(g.n)
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            let test = match &t.method {
                GroupTest::WelchT {
                    statistic,
                    df,
                    p_value: p,
                    cohen_d,
                } => format!(
                    "Welch t={} (df={}, {}), Cohen's d={}",
                    num(*statistic),
                    num(*df),
                    p_value(*p),
                    num(*cohen_d)
                ),
                GroupTest::Anova {
                    f_statistic,
                    df_between,
                    df_within,
                    p_value: p,
                    eta_squared,
                } => format!(
                    "F({df_between}, {df_within})={} ({}), eta-squared={}",
                    num(*f_statistic),
                    p_value(*p),
                    num(*eta_squared)
                ),
            };
            format!(
                "Mean {} differs across {} groups: {}; {}, a {} effect, {}.",
                result_value_label(result, t.value_variable.as_str()),
                t.groups.len(),
                groups,
                test,
                t.effect_size,
                significance(t.significant),
            )
        }
    }
}

/// Renders a temporal result.
#[must_use]
pub fn format_temporal(result: &TemporalResult) -> String {
    let mut text = match &result.trend {
        Some(trend) => {
            let qualifier = match (trend.significant, trend.direction) {
                (_, TrendDirection::Stable) => "no monotonic trend".to_string(),
                (true, direction) => format!("a significant {direction} trend"),
                (false, direction) => {
                    format!("a non-significant {direction} tendency")
                }
            };
            format!(
                "{} shows {} over {} (Mann-Kendall z={}, {}) across {} observations",
                result.target_label,
                qualifier,
                result.time_label,
                num(trend.z),
                p_value(trend.p_value),
                count(result.n),
            )
        }
        None => format!(
            "{} shows no testable trend over {} across {} observations",
            result.target_label,
            result.time_label,
            count(result.n),
        ),
    };

    if let Some(change_point) = &result.change_point {
        text.push_str(&format!(
            "; the mean level shifts at {}={}",
            result.time_label,
            num(change_point.time)
        ));
    }
    if let Some(last) = result.deltas.last() {
        let pct = last
            .percent_change
            .map(|p| format!(" ({}{}%)", sign(p), num(p.abs())))
            .unwrap_or_default();
        text.push_str(&format!(
            "; the latest period moved from {} to {}{}",
            num(last.from_value),
            num(last.to_value),
            pct
        ));
    }
    text.push('.');
    text
}

/// Renders a causal result.
///
/// The wording stays associational: the estimate holds only under the
/// stated control set, so "effect" language is always qualified.
#[must_use]
pub fn format_causal(result: &CausalResult) -> String {
    let unit = match result.model {
        ModelKind::Linear => "unit change in",
        ModelKind::Logistic => "log-odds change in",
    };
    let controls = match result.confounders.len() {
        0 => "without confounder adjustment".to_string(),
        1 => "adjusting for 1 confounder".to_string(),
        k => format!("adjusting for {k} confounders"),
    };
    let mut text = format!(
        "{}, {} is associated with a {} {} {} ({}% CI [{}, {}], {}; unadjusted estimate {}), {} at n={}",
        capitalize(&controls),
        result.treatment_label,
        num(result.adjusted.coefficient),
        unit,
        result.outcome_label,
        percent(result.adjusted.confidence_level),
        num(result.adjusted.ci_low),
        num(result.adjusted.ci_high),
        p_value(result.adjusted.p_value),
        num(result.unadjusted.coefficient),
        significance(result.adjusted.significant),
        count(result.n),
    );
    if !result.converged {
        text.push_str("; the model did not converge and the estimate is unreliable");
    }
    text.push_str(
        ". This is an association under the stated controls, not evidence of causation.",
    );
    text
}

fn result_value_label<'a>(result: &'a BivariateResult, value_variable: &str) -> &'a str {
    if result.variable_a == value_variable {
        &result.label_a
    } else {
        &result.label_b
    }
}

/// Formats a statistic with 2 decimals and thousands separators.
#[must_use]
pub fn num(value: f64) -> String {
    group_thousands(&format!("{value:.2}"))
}

/// Formats a count with thousands separators.
#[must_use]
pub fn count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Formats a p-value as `p=0.013` (3 decimals), or `p<0.001` below that.
#[must_use]
pub fn p_value(p: f64) -> String {
    if p < 0.001 {
        "p<0.001".to_string()
    } else {
        format!("p={p:.3}")
    }
}

/// Renders a fraction as a whole-number percentage (`0.95` -> `"95"`).
fn percent(fraction: f64) -> String {
    format!("{:.0}", 100.0 * fraction)
}

fn significance(significant: bool) -> &'static str {
    if significant {
        "statistically significant"
    } else {
        "not statistically significant"
    }
}

fn sign(value: f64) -> &'static str {
    if value >= 0.0 { "+" } else { "-" }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = formatted
        .strip_prefix('-')
        .map_or(("", formatted), |r| ("-", r));
    let (int_part, frac_part) = rest
        .split_once('.')
        .map_or((rest, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use statqa_analysis::{
        effect_size::EffectSize,
        result::{
            CategoricalSummary, CategoryCount, CorrelationTest, EffectEstimate, NumericSummary,
            PairTest,
        },
    };

    use super::*;

    fn numeric_result() -> UnivariateResult {
        UnivariateResult {
            variable: "score".to_string(),
            label: "Score".to_string(),
            n: 5,
            excluded: 0,
            summary: VariableSummary::Numeric(NumericSummary {
                mean: 3.0,
                median: 3.0,
                std_dev: 1.5811,
                min: 1.0,
                max: 5.0,
                q25: 2.0,
                q75: 4.0,
                mad: 1.0,
                skewness: Some(0.0),
                kurtosis: Some(-1.3),
                normality: None,
                outlier_count: 0,
            }),
            computation_log: vec![],
        }
    }

    #[test]
    fn test_numeric_insight_contains_label_and_mean() {
        let text = format_univariate(&numeric_result());
        assert!(text.contains("Score"));
        assert!(text.contains("mean=3.00"));
        assert!(text.contains("[1.00, 5.00]"));
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let result = numeric_result();
        assert_eq!(format_univariate(&result), format_univariate(&result));
    }

    #[test]
    fn test_categorical_insight_names_the_mode_label() {
        let result = UnivariateResult {
            variable: "grade".to_string(),
            label: "Grade".to_string(),
            n: 4,
            excluded: 0,
            summary: VariableSummary::Categorical(CategoricalSummary {
                categories: vec![
                    CategoryCount {
                        code: "1".to_string(),
                        label: Some("Pass".to_string()),
                        count: 3,
                        percentage: 75.0,
                    },
                    CategoryCount {
                        code: "2".to_string(),
                        label: Some("Fail".to_string()),
                        count: 1,
                        percentage: 25.0,
                    },
                ],
                mode: CategoryCount {
                    code: "1".to_string(),
                    label: Some("Pass".to_string()),
                    count: 3,
                    percentage: 75.0,
                },
                entropy: 0.562,
                normalized_entropy: 0.811,
                high_diversity: true,
            }),
            computation_log: vec![],
        };
        let text = format_univariate(&result);
        assert!(text.contains("'Pass'"));
        assert!(text.contains("75.00%"));
        assert!(text.contains("high diversity"));
    }

    #[test]
    fn test_correlation_insight_uses_effect_label_and_p() {
        let result = BivariateResult {
            variable_a: "income".to_string(),
            label_a: "Income".to_string(),
            variable_b: "education".to_string(),
            label_b: "Education".to_string(),
            n: 1500,
            test: PairTest::Correlation(CorrelationTest {
                pearson_r: 0.72,
                pearson_p: 0.0002,
                spearman_rho: 0.70,
                spearman_p: 0.0003,
                effect_size: EffectSize::VeryLarge,
                significant: true,
            }),
            computation_log: vec![],
        };
        let text = format_bivariate(&result);
        assert!(text.contains("very large positive correlation"));
        assert!(text.contains("p<0.001"));
        assert!(text.contains("n=1,500"));
        assert!(text.contains("statistically significant"));
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(num(1234567.891), "1,234,567.89");
        assert_eq!(num(-4321.5), "-4,321.50");
        assert_eq!(num(3.0), "3.00");
        assert_eq!(count(1000), "1,000");
        assert_eq!(count(999), "999");
    }

    fn estimate(coefficient: f64, confidence_level: f64) -> EffectEstimate {
        EffectEstimate {
            coefficient,
            standard_error: 0.3,
            confidence_level,
            ci_low: coefficient - 0.6,
            ci_high: coefficient + 0.6,
            p_value: 0.004,
            significant: true,
        }
    }

    #[test]
    fn test_causal_insight_labels_the_interval_level() {
        let mut result = CausalResult {
            treatment: "program".to_string(),
            treatment_label: "Job Program".to_string(),
            outcome: "income".to_string(),
            outcome_label: "Income".to_string(),
            confounders: vec!["age".to_string()],
            n: 200,
            model: ModelKind::Linear,
            adjusted: estimate(2.0, 0.95),
            unadjusted: estimate(2.8, 0.95),
            converged: true,
            computation_log: vec![],
        };
        let text = format_causal(&result);
        assert!(text.contains("95% CI"));
        assert!(text.contains("not evidence of causation"));

        result.adjusted = estimate(2.0, 0.99);
        assert!(format_causal(&result).contains("99% CI"));
    }

    #[test]
    fn test_p_value_floor() {
        assert_eq!(p_value(0.0005), "p<0.001");
        assert_eq!(p_value(0.013), "p=0.013");
        assert_eq!(p_value(0.05), "p=0.050");
    }
}
