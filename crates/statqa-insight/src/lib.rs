//! Insight text and question/answer generation
//!
//! Turns structured analysis results into publication-style sentences
//! and template-based question/answer pairs for language-model training
//! data:
//!
//! - [`formatter`]: deterministic natural-language rendering of each
//!   analysis family
//! - [`templates`]: fixed question templates keyed by analysis type
//! - [`generator`]: assembles provenance-stamped [`QAPair`]s, with an
//!   optional pluggable paraphraser
//! - [`export`]: JSONL, OpenAI fine-tuning, and Anthropic line formats
//!
//! Formatting is a pure function of the result: the same result always
//! renders to byte-identical text.

pub mod export;
pub mod formatter;
pub mod generator;
pub mod templates;

pub use self::{
    export::ExportFormat,
    generator::{GenerationMethod, NoParaphrase, Paraphrase, Provenance, QAGenerator, QAPair},
    templates::QuestionType,
};
