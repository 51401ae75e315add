use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use statqa_analysis::{
    AnalyzerConfig, CausalAnalyzer, TemporalAnalyzer, batch,
    batch::BatchReport,
    result::{CausalResult, TemporalResult},
};
use statqa_codebook::Variable;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub struct AnalyzeArg {
    /// Dataset file (JSON array of row objects)
    #[arg(long)]
    data: PathBuf,
    /// Codebook file (.json, or the plain-text format otherwise)
    #[arg(long)]
    codebook: PathBuf,
    /// Also analyze every variable pair
    #[arg(long)]
    pairs: bool,
    /// Run a temporal analysis over two variables: time, then target
    #[arg(long, num_args = 2, value_names = ["TIME", "TARGET"])]
    temporal: Option<Vec<String>>,
    /// Run a causal analysis using the codebook's role flags
    #[arg(long)]
    causal: bool,
    /// Significance threshold for all tests
    #[arg(long, default_value_t = 0.05)]
    alpha: f64,
    /// Output file for the JSON report (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct AnalyzeReport {
    columns: BatchReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pairs: Option<BatchReport>,
    /// Benjamini-Hochberg adjusted p-values for the successful pairs.
    #[serde(skip_serializing_if = "Option::is_none")]
    adjusted_pair_p_values: Option<Vec<(String, f64)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temporal: Option<TemporalResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    causal: Option<CausalResult>,
}

pub fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let table = util::load_table(&arg.data)?;
    let codebook = util::load_codebook(&arg.codebook)?;
    let config = AnalyzerConfig {
        significance_level: arg.alpha,
        ..AnalyzerConfig::default()
    };

    let columns = batch::analyze_columns(&table, &codebook, config);
    eprintln!(
        "Analyzed {} column(s): {} succeeded, {} skipped, {} failed",
        columns.records.len(),
        columns.succeeded(),
        columns.skipped(),
        columns.failed()
    );

    let (pairs, adjusted_pair_p_values) = if arg.pairs {
        let report = batch::analyze_pairs(&table, &codebook, config);
        eprintln!(
            "Analyzed {} pair(s): {} succeeded, {} skipped, {} failed",
            report.records.len(),
            report.succeeded(),
            report.skipped(),
            report.failed()
        );
        let adjusted = batch::adjusted_pair_p_values(&report);
        (Some(report), Some(adjusted))
    } else {
        (None, None)
    };

    let temporal = arg
        .temporal
        .as_deref()
        .map(|names| {
            let time = util::require_variable(&codebook, &names[0])?;
            let target = util::require_variable(&codebook, &names[1])?;
            TemporalAnalyzer::new(config)
                .analyze(&table, time, target)
                .with_context(|| {
                    format!("Temporal analysis of '{}' over '{}' failed", names[1], names[0])
                })
        })
        .transpose()?;

    let causal = arg
        .causal
        .then(|| {
            let treatment = codebook
                .treatment()
                .context("Codebook flags no single treatment variable")?;
            let outcome = codebook
                .outcome()
                .context("Codebook flags no single outcome variable")?;
            let confounders: Vec<&Variable> = codebook.confounders().collect();
            CausalAnalyzer::new(config)
                .analyze(&table, treatment, outcome, &confounders)
                .with_context(|| {
                    format!(
                        "Causal analysis of '{}' on '{}' failed",
                        outcome.name, treatment.name
                    )
                })
        })
        .transpose()?;

    let report = AnalyzeReport {
        columns,
        pairs,
        adjusted_pair_p_values,
        temporal,
        causal,
    };
    Output::save_json(&report, arg.output.clone())?;
    Ok(())
}
