//! Trend analysis over a (time, value) pair.
//!
//! The time column must be orderable (datetime or year-like numeric) and
//! the target numeric. Observations are sorted by time, then tested for
//! monotonic trend with Mann-Kendall, scanned for a single mean-shift
//! change point, and summarized as period-over-period deltas of the
//! target's per-bucket mean.

use statqa_codebook::{DataTable, Variable};
use statqa_stats::trend;

use crate::{
    config::AnalyzerConfig,
    error::AnalysisError,
    result::{ChangePointReport, PeriodDelta, TemporalResult, TrendDirection, TrendReport},
};

/// Computes trend and change-point statistics for a time series.
///
/// # Examples
///
/// ```
/// use statqa_analysis::{AnalyzerConfig, TemporalAnalyzer, result::TrendDirection};
/// use statqa_codebook::{DataTable, DataValue, SemanticType, Variable};
///
/// let table = DataTable::from_columns(vec![
///     (
///         "year".to_string(),
///         [2018.0, 2019.0, 2020.0, 2021.0, 2022.0]
///             .map(DataValue::Number)
///             .to_vec(),
///     ),
///     (
///         "turnout".to_string(),
///         [48.0, 51.0, 55.0, 58.0, 62.0].map(DataValue::Number).to_vec(),
///     ),
/// ])
/// .unwrap();
/// let year = Variable::new("year", SemanticType::NumericDiscrete);
/// let turnout = Variable::new("turnout", SemanticType::NumericContinuous);
///
/// let analyzer = TemporalAnalyzer::new(AnalyzerConfig::default());
/// let result = analyzer.analyze(&table, &year, &turnout).unwrap();
/// assert_eq!(result.trend.unwrap().direction, TrendDirection::Increasing);
/// assert_eq!(result.deltas.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct TemporalAnalyzer {
    config: AnalyzerConfig,
}

impl TemporalAnalyzer {
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Analyzes the target variable over time.
    ///
    /// Unlike the bivariate analyzer this raises on a below-floor sample:
    /// a temporal analysis is requested explicitly, so a thin series is a
    /// caller error rather than a skippable pair.
    pub fn analyze(
        &self,
        table: &DataTable,
        time_variable: &Variable,
        target_variable: &Variable,
    ) -> Result<TemporalResult, AnalysisError> {
        if !time_variable.semantic_type.is_orderable_time() {
            return Err(AnalysisError::UnsupportedTypeCombination {
                left: time_variable.semantic_type,
                right: target_variable.semantic_type,
            });
        }
        if !target_variable.semantic_type.is_numeric() {
            return Err(AnalysisError::UnsupportedTypeCombination {
                left: time_variable.semantic_type,
                right: target_variable.semantic_type,
            });
        }

        let time_column = table.column(&time_variable.name).ok_or_else(|| {
            AnalysisError::MissingColumn {
                name: time_variable.name.clone(),
            }
        })?;
        let target_column = table.column(&target_variable.name).ok_or_else(|| {
            AnalysisError::MissingColumn {
                name: target_variable.name.clone(),
            }
        })?;

        let mut series: Vec<(f64, f64)> = time_column
            .iter()
            .zip(target_column)
            .filter(|(t, v)| !time_variable.is_missing(t) && !target_variable.is_missing(v))
            .filter_map(|(t, v)| Some((t.as_number()?, v.as_number()?)))
            .collect();
        series.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = series.len();
        if n < self.config.min_paired_n {
            return Err(AnalysisError::InsufficientData {
                variable: target_variable.name.clone(),
                valid_n: n,
            });
        }

        let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
        let mut log = vec![format!("sorted {n} observations by '{}'", time_variable.name)];

        let trend = trend::mann_kendall(&values).map(|mk| {
            let direction = match mk.s.cmp(&0) {
                std::cmp::Ordering::Greater => TrendDirection::Increasing,
                std::cmp::Ordering::Less => TrendDirection::Decreasing,
                std::cmp::Ordering::Equal => TrendDirection::Stable,
            };
            log.push(format!(
                "mann-kendall s = {}, z = {:.4}, p = {:.4}",
                mk.s, mk.z, mk.p_value
            ));
            TrendReport {
                s: mk.s,
                z: mk.z,
                p_value: mk.p_value,
                direction,
                significant: self.config.is_significant(mk.p_value),
            }
        });

        let change_point = trend::mean_shift_change_point(&values).map(|cp| {
            let time = series[cp.index].0;
            log.push(format!(
                "mean shift maximized at index {} (time {time}), score {:.4}",
                cp.index, cp.score
            ));
            ChangePointReport {
                time,
                score: cp.score,
            }
        });

        let deltas = period_deltas(&series);

        Ok(TemporalResult {
            time_variable: time_variable.name.clone(),
            time_label: time_variable.display_label().to_string(),
            target_variable: target_variable.name.clone(),
            target_label: target_variable.display_label().to_string(),
            n,
            trend,
            change_point,
            deltas,
            computation_log: log,
        })
    }
}

/// Mean of the target per distinct time value, then consecutive deltas.
/// `series` must already be sorted by time.
#[expect(clippy::cast_precision_loss, clippy::float_cmp)]
fn period_deltas(series: &[(f64, f64)]) -> Vec<PeriodDelta> {
    let mut means: Vec<(f64, f64)> = Vec::new();
    let mut i = 0;
    while i < series.len() {
        let time = series[i].0;
        let mut sum = 0.0;
        let mut count = 0_usize;
        while i < series.len() && series[i].0 == time {
            sum += series[i].1;
            count += 1;
            i += 1;
        }
        means.push((time, sum / count as f64));
    }

    means
        .windows(2)
        .map(|pair| {
            let (from_time, from_value) = pair[0];
            let (to_time, to_value) = pair[1];
            let absolute_change = to_value - from_value;
            let percent_change =
                (from_value != 0.0).then(|| 100.0 * absolute_change / from_value.abs());
            PeriodDelta {
                from_time,
                to_time,
                from_value,
                to_value,
                absolute_change,
                percent_change,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use statqa_codebook::{DataValue, SemanticType};

    use super::*;

    fn analyzer() -> TemporalAnalyzer {
        TemporalAnalyzer::new(AnalyzerConfig::default())
    }

    fn year_table(years: &[f64], values: &[f64]) -> DataTable {
        DataTable::from_columns(vec![
            (
                "year".to_string(),
                years.iter().copied().map(DataValue::Number).collect(),
            ),
            (
                "value".to_string(),
                values.iter().copied().map(DataValue::Number).collect(),
            ),
        ])
        .unwrap()
    }

    fn year_var() -> Variable {
        Variable::new("year", SemanticType::NumericDiscrete)
    }

    fn value_var() -> Variable {
        Variable::new("value", SemanticType::NumericContinuous)
    }

    #[test]
    fn test_increasing_trend() {
        let table = year_table(
            &[2015.0, 2016.0, 2017.0, 2018.0, 2019.0, 2020.0],
            &[10.0, 12.0, 15.0, 17.0, 21.0, 24.0],
        );
        let result = analyzer().analyze(&table, &year_var(), &value_var()).unwrap();
        let trend = result.trend.unwrap();
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert!(trend.s > 0);
    }

    #[test]
    fn test_rows_are_sorted_by_time_first() {
        let shuffled = year_table(
            &[2019.0, 2015.0, 2017.0, 2020.0, 2016.0, 2018.0],
            &[21.0, 10.0, 15.0, 24.0, 12.0, 17.0],
        );
        let result = analyzer()
            .analyze(&shuffled, &year_var(), &value_var())
            .unwrap();
        assert_eq!(result.trend.unwrap().direction, TrendDirection::Increasing);
        assert_eq!(result.deltas[0].from_time, 2015.0);
        assert_eq!(result.deltas[0].to_time, 2016.0);
    }

    #[test]
    fn test_change_point_reports_time_value() {
        let table = year_table(
            &[2015.0, 2016.0, 2017.0, 2018.0, 2019.0, 2020.0, 2021.0, 2022.0],
            &[5.0, 5.1, 4.9, 5.0, 12.0, 12.1, 11.9, 12.0],
        );
        let result = analyzer().analyze(&table, &year_var(), &value_var()).unwrap();
        assert_eq!(result.change_point.unwrap().time, 2019.0);
    }

    #[test]
    fn test_period_deltas_average_repeated_times() {
        let table = year_table(
            &[2020.0, 2020.0, 2021.0, 2021.0],
            &[1.0, 3.0, 5.0, 7.0],
        );
        let result = analyzer().analyze(&table, &year_var(), &value_var()).unwrap();
        assert_eq!(result.deltas.len(), 1);
        let delta = &result.deltas[0];
        assert_eq!(delta.from_value, 2.0);
        assert_eq!(delta.to_value, 6.0);
        assert_eq!(delta.absolute_change, 4.0);
        assert_eq!(delta.percent_change, Some(200.0));
    }

    #[test]
    fn test_zero_baseline_has_no_percent_change() {
        let table = year_table(&[2020.0, 2021.0, 2022.0], &[0.0, 2.0, 3.0]);
        let result = analyzer().analyze(&table, &year_var(), &value_var()).unwrap();
        assert_eq!(result.deltas[0].percent_change, None);
        assert_eq!(result.deltas[0].absolute_change, 2.0);
    }

    #[test]
    fn test_short_series_is_insufficient() {
        let table = year_table(&[2020.0, 2021.0], &[1.0, 2.0]);
        let err = analyzer()
            .analyze(&table, &year_var(), &value_var())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }

    #[test]
    fn test_non_orderable_time_is_unsupported() {
        let table = DataTable::from_columns(vec![
            (
                "label".to_string(),
                ["a", "b", "c"].map(DataValue::from).to_vec(),
            ),
            (
                "value".to_string(),
                [1.0, 2.0, 3.0].map(DataValue::Number).to_vec(),
            ),
        ])
        .unwrap();
        let label = Variable::new("label", SemanticType::CategoricalNominal);
        let err = analyzer().analyze(&table, &label, &value_var()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::UnsupportedTypeCombination { .. }
        ));
    }
}
