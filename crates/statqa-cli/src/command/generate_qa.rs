use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use statqa_analysis::{AnalyzerConfig, batch};
use statqa_insight::{ExportFormat, QAGenerator, export, formatter, generator::QAPair};

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub struct GenerateQaArg {
    /// Dataset file (JSON array of row objects)
    #[arg(long)]
    data: PathBuf,
    /// Codebook file (.json, or the plain-text format otherwise)
    #[arg(long)]
    codebook: PathBuf,
    /// Also generate pairs from pairwise analyses
    #[arg(long)]
    pairs: bool,
    /// Export format: jsonl, openai, or anthropic
    #[arg(long, default_value = "jsonl")]
    format: ExportFormat,
    /// Stop after this many question/answer pairs
    #[arg(long)]
    max_pairs: Option<usize>,
    /// Significance threshold for all tests
    #[arg(long, default_value_t = 0.05)]
    alpha: f64,
    /// Output file (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn run(arg: &GenerateQaArg) -> anyhow::Result<()> {
    let table = util::load_table(&arg.data)?;
    let codebook = util::load_codebook(&arg.codebook)?;
    let config = AnalyzerConfig {
        significance_level: arg.alpha,
        ..AnalyzerConfig::default()
    };

    let mut reports = vec![batch::analyze_columns(&table, &codebook, config)];
    if arg.pairs {
        reports.push(batch::analyze_pairs(&table, &codebook, config));
    }
    let succeeded: usize = reports.iter().map(batch::BatchReport::succeeded).sum();
    let skipped: usize = reports.iter().map(batch::BatchReport::skipped).sum();
    let failed: usize = reports.iter().map(batch::BatchReport::failed).sum();
    eprintln!("Analyses: {succeeded} succeeded, {skipped} skipped, {failed} failed");

    let generator = QAGenerator::new();
    let mut pairs: Vec<QAPair> = Vec::new();
    'outer: for report in &reports {
        for (_, result) in report.results() {
            let answer = formatter::format_result(result);
            for pair in generator.generate_qa_pairs(result, &answer, None) {
                if arg.max_pairs.is_some_and(|max| pairs.len() >= max) {
                    break 'outer;
                }
                pairs.push(pair);
            }
        }
    }

    let mut output = Output::from_output_path(arg.output.clone())?;
    export::write_pairs(&mut output, &pairs, arg.format)
        .with_context(|| format!("Failed to export pairs to {}", output.display_path()))?;
    eprintln!(
        "Wrote {} {} pair(s) to {}",
        pairs.len(),
        arg.format.as_str(),
        output.display_path()
    );
    Ok(())
}
