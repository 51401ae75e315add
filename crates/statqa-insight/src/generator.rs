//! Provenance-stamped question/answer pair generation.
//!
//! The generator fills the fixed templates for a result, pairs every
//! question with the formatted insight as its answer, and stamps each
//! pair with provenance (timestamp, tool version, generation method,
//! variables, and the analyzer's computation log).
//!
//! Paraphrasing is an injected capability behind the [`Paraphrase`]
//! trait. The answer is the single source of truth: a paraphraser only
//! ever rewrites questions, and any failure at that boundary degrades to
//! template-only output with a note in provenance, never an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statqa_analysis::result::AnalysisResult;

use crate::templates::{self, QuestionType};

/// One generated question/answer pair, serialized verbatim by the
/// export layer.
#[derive(Debug, Clone, Serialize)]
pub struct QAPair {
    pub question: String,
    pub answer: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual: Option<VisualData>,
    pub vars: Vec<String>,
}

/// How and when a pair was produced.
#[derive(Debug, Clone, Serialize)]
pub struct Provenance {
    /// Capture time of generation (not analysis time).
    pub timestamp: DateTime<Utc>,
    pub tool_version: String,
    pub method: GenerationMethod,
    /// Analysis family the answer derives from.
    pub analysis: String,
    /// Variables involved, in role order.
    pub variables: Vec<String>,
    /// The analyzer's recorded numeric operations.
    pub computations: Vec<String>,
    /// Degradation note, e.g. when paraphrasing was unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Whether a question came straight from a template or from the
/// paraphraser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    #[display("template")]
    Template,
    #[display("llm_paraphrase")]
    LlmParaphrase,
}

/// Plot metadata produced by an external visualization step and carried
/// through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualData {
    pub plot_type: String,
    pub caption: String,
    pub alt_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Failure of the external paraphrasing service.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("paraphrasing service failed: {reason}")]
pub struct ExternalServiceError {
    pub reason: String,
}

/// Read-only context handed to a paraphraser alongside the questions.
#[derive(Debug, Clone, Copy)]
pub struct ParaphraseContext<'a> {
    /// Analysis family of the underlying result.
    pub analysis: &'a str,
    /// Variables involved.
    pub variables: &'a [String],
}

/// An injected question-rewriting capability.
///
/// Implementations take the template questions and return additional
/// paraphrases; they must not touch answers. Errors are caught at the
/// generator boundary.
pub trait Paraphrase {
    fn paraphrase(
        &self,
        questions: &[String],
        context: &ParaphraseContext<'_>,
    ) -> Result<Vec<String>, ExternalServiceError>;
}

/// The template-only mode: contributes no paraphrases and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParaphrase;

impl Paraphrase for NoParaphrase {
    fn paraphrase(
        &self,
        _questions: &[String],
        _context: &ParaphraseContext<'_>,
    ) -> Result<Vec<String>, ExternalServiceError> {
        Ok(Vec::new())
    }
}

/// Generates question/answer pairs from analysis results.
pub struct QAGenerator {
    paraphraser: Box<dyn Paraphrase>,
    /// Upper bound on paraphrased pairs per result, to cap the cost of
    /// a large batch.
    max_paraphrase_pairs: usize,
}

impl Default for QAGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl QAGenerator {
    /// Template-only generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            paraphraser: Box::new(NoParaphrase),
            max_paraphrase_pairs: 0,
        }
    }

    /// Generator with an injected paraphraser, producing at most
    /// `max_paraphrase_pairs` additional pairs per result.
    #[must_use]
    pub fn with_paraphraser(
        paraphraser: Box<dyn Paraphrase>,
        max_paraphrase_pairs: usize,
    ) -> Self {
        Self {
            paraphraser,
            max_paraphrase_pairs,
        }
    }

    /// Generates all pairs for one result and its formatted insight.
    ///
    /// `formatted_answer` becomes the answer of every pair, template and
    /// paraphrase alike. `visual` is attached verbatim to each pair when
    /// supplied.
    #[must_use]
    pub fn generate_qa_pairs(
        &self,
        result: &AnalysisResult,
        formatted_answer: &str,
        visual: Option<&VisualData>,
    ) -> Vec<QAPair> {
        let timestamp = Utc::now();
        let variables: Vec<String> = result
            .variable_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let stamp = |method: GenerationMethod, note: Option<String>| Provenance {
            timestamp,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            method,
            analysis: result.kind().to_string(),
            variables: variables.clone(),
            computations: result.computation_log().to_vec(),
            note,
        };

        let questions = templates::questions_for(result);
        let mut pairs: Vec<QAPair> = questions
            .iter()
            .map(|q| QAPair {
                question: q.text.clone(),
                answer: formatted_answer.to_string(),
                question_type: q.question_type,
                provenance: stamp(GenerationMethod::Template, None),
                visual: visual.cloned(),
                vars: variables.clone(),
            })
            .collect();
        if pairs.is_empty() || self.max_paraphrase_pairs == 0 {
            return pairs;
        }

        let texts: Vec<String> = questions.iter().map(|q| q.text.clone()).collect();
        let context = ParaphraseContext {
            analysis: result.kind(),
            variables: &variables,
        };
        match self.paraphraser.paraphrase(&texts, &context) {
            Ok(rewrites) => {
                // Paraphrase i belongs to template question i mod N; the
                // answer is carried over untouched.
                let extra: Vec<QAPair> = rewrites
                    .into_iter()
                    .take(self.max_paraphrase_pairs)
                    .enumerate()
                    .map(|(i, question)| QAPair {
                        question,
                        answer: formatted_answer.to_string(),
                        question_type: questions[i % questions.len()].question_type,
                        provenance: stamp(GenerationMethod::LlmParaphrase, None),
                        visual: visual.cloned(),
                        vars: variables.clone(),
                    })
                    .collect();
                pairs.extend(extra);
            }
            Err(err) => {
                // Degrade to template-only output; the failure is
                // recorded on the pairs it affected.
                let note = format!("paraphrasing unavailable: {err}");
                for pair in &mut pairs {
                    pair.provenance.note = Some(note.clone());
                }
            }
        }
        pairs
    }
}
