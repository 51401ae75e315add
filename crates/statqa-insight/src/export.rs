//! Line-oriented export formats for generated pairs.
//!
//! Every format writes one JSON object per line. The plain JSONL format
//! serializes pairs verbatim (required keys `question`, `answer`,
//! `type`; `provenance`, `visual`, and `vars` pass through unchanged);
//! the OpenAI and Anthropic formats reshape each pair into the
//! respective fine-tuning schema.

use std::io::Write;

use serde_json::json;

use crate::generator::QAPair;

/// System message for the OpenAI chat fine-tuning format.
const OPENAI_SYSTEM_PROMPT: &str =
    "You are a data analyst answering questions about statistical findings.";

/// Supported export schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pairs serialized verbatim, one per line.
    Jsonl,
    /// OpenAI chat fine-tuning messages.
    Openai,
    /// Anthropic prompt/completion records.
    Anthropic,
}

impl ExportFormat {
    /// Canonical lowercase name, as accepted on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jsonl => "jsonl",
            Self::Openai => "openai",
            Self::Anthropic => "anthropic",
        }
    }
}

/// Unknown export format name.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown export format '{name}' (expected jsonl, openai, or anthropic)")]
pub struct UnknownExportFormat {
    pub name: String,
}

impl std::str::FromStr for ExportFormat {
    type Err = UnknownExportFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jsonl" => Ok(Self::Jsonl),
            "openai" => Ok(Self::Openai),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(UnknownExportFormat {
                name: s.to_string(),
            }),
        }
    }
}

/// Export failure: serialization or the underlying writer.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ExportError {
    #[display("failed to serialize pair: {_0}")]
    Serialize(serde_json::Error),
    #[display("failed to write output: {_0}")]
    Io(std::io::Error),
}

/// Writes all pairs to `writer` in the given format, one JSON object
/// per line.
pub fn write_pairs<W: Write>(
    writer: &mut W,
    pairs: &[QAPair],
    format: ExportFormat,
) -> Result<(), ExportError> {
    for pair in pairs {
        let line = match format {
            ExportFormat::Jsonl => serde_json::to_string(pair)?,
            ExportFormat::Openai => serde_json::to_string(&json!({
                "messages": [
                    { "role": "system", "content": OPENAI_SYSTEM_PROMPT },
                    { "role": "user", "content": pair.question },
                    { "role": "assistant", "content": pair.answer },
                ],
            }))?,
            ExportFormat::Anthropic => serde_json::to_string(&json!({
                "prompt": format!("\n\nHuman: {}\n\nAssistant:", pair.question),
                "completion": format!(" {}", pair.answer),
            }))?,
        };
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
