//! Order-preserving batch analysis.
//!
//! A batch is a sequential loop over independent per-column (or
//! per-pair) analyses with no shared state between iterations. Output
//! order always matches codebook declaration order, so repeated runs
//! diff cleanly. One bad column never aborts a batch: each failure
//! becomes a per-item record instead.

use serde::Serialize;
use statqa_codebook::{Codebook, DataTable};
use statqa_stats::hypothesis;

use crate::{
    bivariate::BivariateAnalyzer, config::AnalyzerConfig, result::AnalysisResult,
    univariate::UnivariateAnalyzer,
};

/// Outcome of one item in a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchStatus {
    Success(Box<AnalysisResult>),
    /// The analysis was not applicable (below sample floor).
    Skipped { reason: String },
    /// The analysis failed with a typed error.
    Failed { reason: String },
}

/// One analyzed column or pair.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    /// Column name, or `"a x b"` for a pair.
    pub subject: String,
    #[serde(flatten)]
    pub status: BatchStatus,
}

/// All records of one batch run, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub records: Vec<BatchRecord>,
}

impl BatchReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results().count()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.status, BatchStatus::Skipped { .. }))
            .count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.status, BatchStatus::Failed { .. }))
            .count()
    }

    /// Successful results in input order.
    pub fn results(&self) -> impl Iterator<Item = (&str, &AnalysisResult)> {
        self.records.iter().filter_map(|r| match &r.status {
            BatchStatus::Success(result) => Some((r.subject.as_str(), result.as_ref())),
            _ => None,
        })
    }
}

/// Runs the univariate analyzer over every codebook variable in
/// declaration order.
#[must_use]
pub fn analyze_columns(table: &DataTable, codebook: &Codebook, config: AnalyzerConfig) -> BatchReport {
    let analyzer = UnivariateAnalyzer::new(config);
    let mut report = BatchReport::default();
    for variable in &codebook.variables {
        let status = match table.column(&variable.name) {
            None => BatchStatus::Skipped {
                reason: format!("table has no column named '{}'", variable.name),
            },
            Some(column) => match analyzer.analyze(column, variable) {
                Ok(result) => BatchStatus::Success(Box::new(AnalysisResult::Univariate(result))),
                Err(err) => BatchStatus::Failed {
                    reason: err.to_string(),
                },
            },
        };
        report.records.push(BatchRecord {
            subject: variable.name.clone(),
            status,
        });
    }
    report
}

/// Runs the bivariate analyzer over every unordered variable pair, in
/// declaration order of the first then the second variable.
///
/// Pairs below the sample floor are recorded as skipped; unsupported
/// type pairings and other typed errors as failed.
#[must_use]
pub fn analyze_pairs(table: &DataTable, codebook: &Codebook, config: AnalyzerConfig) -> BatchReport {
    let analyzer = BivariateAnalyzer::new(config);
    let mut report = BatchReport::default();
    for (i, variable_a) in codebook.variables.iter().enumerate() {
        for variable_b in &codebook.variables[i + 1..] {
            let subject = format!("{} x {}", variable_a.name, variable_b.name);
            let status = match analyzer.analyze(table, variable_a, variable_b) {
                Ok(Some(result)) => {
                    BatchStatus::Success(Box::new(AnalysisResult::Bivariate(result)))
                }
                Ok(None) => BatchStatus::Skipped {
                    reason: "not enough valid paired observations".to_string(),
                },
                Err(err) => BatchStatus::Failed {
                    reason: err.to_string(),
                },
            };
            report.records.push(BatchRecord { subject, status });
        }
    }
    report
}

/// Benjamini-Hochberg adjusted p-values for the successful bivariate
/// records of a pair batch, in record order.
///
/// Running many pairwise tests inflates the false-discovery rate; the
/// adjusted values are what batch tooling should threshold instead of
/// the raw per-pair p-values.
#[must_use]
pub fn adjusted_pair_p_values(report: &BatchReport) -> Vec<(String, f64)> {
    let raw: Vec<(String, f64)> = report
        .results()
        .filter_map(|(subject, result)| match result {
            AnalysisResult::Bivariate(r) => Some((subject.to_string(), r.p_value())),
            _ => None,
        })
        .collect();

    let adjusted = hypothesis::benjamini_hochberg(
        &raw.iter().map(|(_, p)| *p).collect::<Vec<_>>(),
    );
    raw.into_iter()
        .zip(adjusted)
        .map(|((subject, _), p)| (subject, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use statqa_codebook::{DataValue, SemanticType, Variable};

    use super::*;

    fn sample() -> (DataTable, Codebook) {
        let table = DataTable::from_columns(vec![
            (
                "age".to_string(),
                [25.0, 30.0, 35.0, 40.0, 45.0].map(DataValue::Number).to_vec(),
            ),
            (
                "income".to_string(),
                [30.0, 40.0, 50.0, 55.0, 70.0].map(DataValue::Number).to_vec(),
            ),
            (
                "empty".to_string(),
                vec![DataValue::Null; 5],
            ),
        ])
        .unwrap();
        let mut codebook = Codebook::new();
        codebook
            .variables
            .push(Variable::new("age", SemanticType::NumericContinuous));
        codebook
            .variables
            .push(Variable::new("income", SemanticType::NumericContinuous));
        codebook
            .variables
            .push(Variable::new("empty", SemanticType::NumericContinuous));
        (table, codebook)
    }

    #[test]
    fn test_column_batch_preserves_order_and_counts() {
        let (table, codebook) = sample();
        let report = analyze_columns(&table, &codebook, AnalyzerConfig::default());

        let subjects: Vec<_> = report.records.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, ["age", "income", "empty"]);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 0);
    }

    #[test]
    fn test_one_bad_column_does_not_abort() {
        let (table, codebook) = sample();
        let report = analyze_columns(&table, &codebook, AnalyzerConfig::default());
        assert!(matches!(
            report.records[2].status,
            BatchStatus::Failed { .. }
        ));
        assert!(matches!(
            report.records[1].status,
            BatchStatus::Success(_)
        ));
    }

    #[test]
    fn test_pair_batch_subjects() {
        let (table, codebook) = sample();
        let report = analyze_pairs(&table, &codebook, AnalyzerConfig::default());
        assert_eq!(report.records.len(), 3);
        assert_eq!(report.records[0].subject, "age x income");
        assert_eq!(report.succeeded(), 1);
        // Pairs against the all-null column fall below the floor.
        assert_eq!(report.skipped(), 2);
    }

    #[test]
    fn test_adjusted_p_values_cover_successes_only() {
        let (table, codebook) = sample();
        let report = analyze_pairs(&table, &codebook, AnalyzerConfig::default());
        let adjusted = adjusted_pair_p_values(&report);
        assert_eq!(adjusted.len(), 1);
        assert_eq!(adjusted[0].0, "age x income");
        assert!(adjusted[0].1 <= 1.0);
    }
}
