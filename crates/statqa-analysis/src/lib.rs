//! Statistical analyzers over codebook-described tabular data
//!
//! This crate turns columns of a [`DataTable`](statqa_codebook::DataTable)
//! plus their [`Variable`](statqa_codebook::Variable) descriptors into
//! structured analysis results, dispatching on semantic type:
//!
//! - [`univariate`]: descriptive statistics for one column
//! - [`bivariate`]: relationship tests for a pair of columns
//! - [`temporal`]: trend and change-point statistics over a time series
//! - [`causal`]: confounder-adjusted regression effect estimates
//! - [`batch`]: sequential, order-preserving analysis over many columns
//!
//! Every analyzer is stateless apart from its [`AnalyzerConfig`], never
//! mutates its inputs, and returns the same result for the same input.
//! Thresholds and effect-size cut points live in [`config`] and
//! [`effect_size`] so nothing is hard-coded at a call site.

pub mod batch;
pub mod bivariate;
pub mod causal;
pub mod config;
pub mod effect_size;
pub mod error;
pub mod result;
pub mod temporal;
pub mod univariate;

pub use self::{
    bivariate::BivariateAnalyzer, causal::CausalAnalyzer, config::AnalyzerConfig,
    effect_size::EffectSize, error::AnalysisError, result::AnalysisResult,
    temporal::TemporalAnalyzer, univariate::UnivariateAnalyzer,
};
