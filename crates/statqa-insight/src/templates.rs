//! Fixed question templates keyed by analysis type.
//!
//! Each analysis family maps to a small fixed set of question templates
//! with blanks filled from variable display labels. Variants differing
//! only in grammatical number (two groups vs several, one confounder vs
//! many) are selected by count, so no valid label produces broken text.

use serde::Serialize;
use statqa_analysis::result::{
    AnalysisResult, BivariateResult, CausalResult, PairTest, TemporalResult, UnivariateResult,
    VariableSummary,
};

/// Category of a generated question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[display("descriptive")]
    Descriptive,
    #[display("distributional")]
    Distributional,
    #[display("correlational")]
    Correlational,
    #[display("comparative")]
    Comparative,
    #[display("temporal")]
    Temporal,
    #[display("causal")]
    Causal,
}

/// A typed question with its blanks already filled.
#[derive(Debug, Clone)]
pub struct TemplateQuestion {
    pub question_type: QuestionType,
    pub text: String,
}

fn question(question_type: QuestionType, text: String) -> TemplateQuestion {
    TemplateQuestion {
        question_type,
        text,
    }
}

/// Fills the template set for one analysis result.
#[must_use]
pub fn questions_for(result: &AnalysisResult) -> Vec<TemplateQuestion> {
    match result {
        AnalysisResult::Univariate(r) => univariate_questions(r),
        AnalysisResult::Bivariate(r) => bivariate_questions(r),
        AnalysisResult::Temporal(r) => temporal_questions(r),
        AnalysisResult::Causal(r) => causal_questions(r),
    }
}

fn univariate_questions(result: &UnivariateResult) -> Vec<TemplateQuestion> {
    let label = &result.label;
    match &result.summary {
        VariableSummary::Numeric(_) => vec![
            question(
                QuestionType::Distributional,
                format!("How is {label} distributed in this dataset?"),
            ),
            question(
                QuestionType::Descriptive,
                format!("What is the average value of {label}?"),
            ),
            question(
                QuestionType::Descriptive,
                format!("What range of values does {label} take?"),
            ),
        ],
        VariableSummary::Categorical(summary) => {
            let mut questions = vec![question(
                QuestionType::Descriptive,
                format!("What is the most common value of {label}?"),
            )];
            // A single category leaves nothing to distribute over.
            if summary.categories.len() > 1 {
                questions.push(question(
                    QuestionType::Distributional,
                    format!("How are responses distributed across the categories of {label}?"),
                ));
            }
            questions
        }
    }
}

fn bivariate_questions(result: &BivariateResult) -> Vec<TemplateQuestion> {
    match &result.test {
        PairTest::Correlation(_) => vec![
            question(
                QuestionType::Correlational,
                format!(
                    "Is there a relationship between {} and {}?",
                    result.label_a, result.label_b
                ),
            ),
            question(
                QuestionType::Correlational,
                format!(
                    "How strongly are {} and {} correlated?",
                    result.label_a, result.label_b
                ),
            ),
        ],
        PairTest::Association(_) => vec![question(
            QuestionType::Correlational,
            format!(
                "Are {} and {} associated?",
                result.label_a, result.label_b
            ),
        )],
        PairTest::GroupComparison(t) => {
            let group_label = if result.variable_a == t.group_variable {
                &result.label_a
            } else {
                &result.label_b
            };
            let value_label = if result.variable_a == t.value_variable {
                &result.label_a
            } else {
                &result.label_b
            };
            // Singular/plural template variant by group count.
            let text = if t.groups.len() == 2 {
                format!("How does {value_label} differ between the two {group_label} groups?")
            } else {
                format!(
                    "How does {value_label} differ across the {} {group_label} groups?",
                    t.groups.len()
                )
            };
            vec![
                question(QuestionType::Comparative, text),
                question(
                    QuestionType::Comparative,
                    format!("Does {value_label} depend on {group_label}?"),
                ),
            ]
        }
    }
}

fn temporal_questions(result: &TemporalResult) -> Vec<TemplateQuestion> {
    vec![
        question(
            QuestionType::Temporal,
            format!(
                "How has {} changed over {}?",
                result.target_label, result.time_label
            ),
        ),
        question(
            QuestionType::Temporal,
            format!("Is there a trend in {} over time?", result.target_label),
        ),
    ]
}

fn causal_questions(result: &CausalResult) -> Vec<TemplateQuestion> {
    let text = match result.confounders.len() {
        0 => format!(
            "What is the association between {} and {}?",
            result.treatment_label, result.outcome_label
        ),
        1 => format!(
            "What is the association between {} and {}, adjusting for the listed confounder?",
            result.treatment_label, result.outcome_label
        ),
        _ => format!(
            "What is the association between {} and {}, adjusting for the listed confounders?",
            result.treatment_label, result.outcome_label
        ),
    };
    vec![question(QuestionType::Causal, text)]
}
