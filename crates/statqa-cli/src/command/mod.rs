use clap::{Parser, Subcommand};

use self::{
    analyze::AnalyzeArg, generate_qa::GenerateQaArg, show_codebook::ShowCodebookArg,
};

mod analyze;
mod generate_qa;
mod show_codebook;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Analyze a dataset against its codebook
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Generate question/answer pairs from analysis results
    GenerateQa(#[clap(flatten)] GenerateQaArg),
    /// Show the variables of a codebook
    ShowCodebook(#[clap(flatten)] ShowCodebookArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::GenerateQa(arg) => generate_qa::run(&arg)?,
        Mode::ShowCodebook(arg) => show_codebook::run(&arg)?,
    }
    Ok(())
}
