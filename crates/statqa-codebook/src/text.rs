//! Parser for the plain-text codebook format.
//!
//! The format is a sequence of variable blocks:
//!
//! ```text
//! # Codebook: Survey Data
//!
//! # Variable: age
//! Label: Respondent Age
//! Type: numeric_continuous
//! Units: years
//! Range: 18-99
//! Missing: -1, 999
//! Description: Age of survey respondent in years
//!
//! # Variable: gender
//! Label: Gender
//! Type: categorical_nominal
//! Values:
//!   1: Male
//!   2: Female
//! Missing: 0
//! ```
//!
//! `Type:` is mandatory per block and must name a valid semantic type;
//! anything else fails with the offending line number.

use crate::{codebook::Codebook, semantic_type::SemanticType, value::DataValue, variable::Variable};

/// Error produced while parsing a text codebook.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseError {
    /// A field line appeared before any `# Variable:` header.
    #[display("Line {line}: field outside a variable block")]
    FieldOutsideBlock { line: usize },
    /// The `Type:` field was missing for a variable.
    #[display("Variable '{name}' has no Type field")]
    MissingType { name: String },
    /// The `Type:` field named an unknown semantic type.
    #[display("Line {line}: {source}")]
    BadType {
        line: usize,
        source: crate::semantic_type::UnknownSemanticType,
    },
    /// A malformed `Range:` field.
    #[display("Line {line}: cannot parse range '{text}'")]
    BadRange { line: usize, text: String },
    /// A value-label line without a `code: label` separator.
    #[display("Line {line}: cannot parse value label '{text}'")]
    BadValueLabel { line: usize, text: String },
    /// An unknown `Role:` value.
    #[display("Line {line}: unknown role '{text}'")]
    BadRole { line: usize, text: String },
}

#[derive(Debug, Default)]
struct PendingVariable {
    name: String,
    label: Option<String>,
    semantic_type: Option<SemanticType>,
    description: Option<String>,
    units: Option<String>,
    range: Option<(f64, f64)>,
    missing: Vec<DataValue>,
    value_labels: Vec<(String, String)>,
    is_treatment: bool,
    is_outcome: bool,
    is_confounder: bool,
}

impl PendingVariable {
    fn finish(self) -> Result<Variable, ParseError> {
        let semantic_type = self
            .semantic_type
            .ok_or(ParseError::MissingType { name: self.name.clone() })?;
        let mut var = Variable::new(self.name, semantic_type);
        var.label = self.label;
        var.description = self.description;
        var.units = self.units;
        if let Some((lo, hi)) = self.range {
            var.range_min = Some(lo);
            var.range_max = Some(hi);
        }
        var.missing_codes = self.missing;
        for (code, label) in self.value_labels {
            var.value_labels.insert(code, label);
        }
        var.is_treatment = self.is_treatment;
        var.is_outcome = self.is_outcome;
        var.is_confounder = self.is_confounder;
        Ok(var)
    }
}

/// Parses a text codebook.
///
/// # Examples
///
/// ```
/// use statqa_codebook::{SemanticType, text::parse};
///
/// let source = "\
/// ## Codebook: Demo
///
/// ## Variable: age
/// Label: Respondent Age
/// Type: numeric_continuous
/// Missing: -1, 999
/// ";
/// let codebook = parse(source).unwrap();
/// assert_eq!(codebook.name.as_deref(), Some("Demo"));
/// let age = codebook.variable("age").unwrap();
/// assert_eq!(age.semantic_type, SemanticType::NumericContinuous);
/// assert_eq!(age.missing_codes.len(), 2);
/// ```
pub fn parse(source: &str) -> Result<Codebook, ParseError> {
    let mut codebook = Codebook::new();
    let mut current: Option<PendingVariable> = None;
    let mut in_values = false;

    for (idx, raw_line) in source.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(name) = trimmed.strip_prefix("# Codebook:") {
            codebook.name = Some(name.trim().to_string());
            continue;
        }
        if let Some(name) = trimmed.strip_prefix("# Variable:") {
            if let Some(pending) = current.take() {
                codebook.variables.push(pending.finish()?);
            }
            current = Some(PendingVariable {
                name: name.trim().to_string(),
                ..PendingVariable::default()
            });
            in_values = false;
            continue;
        }
        if trimmed.starts_with('#') {
            continue;
        }

        let Some(pending) = current.as_mut() else {
            return Err(ParseError::FieldOutsideBlock { line });
        };

        // Indented `code: label` lines belong to a preceding `Values:`.
        if in_values && raw_line.starts_with(char::is_whitespace) {
            let (code, label) = trimmed
                .split_once(':')
                .ok_or_else(|| ParseError::BadValueLabel {
                    line,
                    text: trimmed.to_string(),
                })?;
            pending
                .value_labels
                .push((code.trim().to_string(), label.trim().to_string()));
            continue;
        }
        in_values = false;

        let (key, value) = trimmed.split_once(':').map_or((trimmed, ""), |(k, v)| (k, v));
        let value = value.trim();
        match key.trim() {
            "Label" => pending.label = Some(value.to_string()),
            "Description" => pending.description = Some(value.to_string()),
            "Units" => pending.units = Some(value.to_string()),
            "Type" => {
                pending.semantic_type = Some(value.parse().map_err(|source| {
                    ParseError::BadType { line, source }
                })?);
            }
            "Range" => {
                let parsed = value.split_once('-').and_then(|(lo, hi)| {
                    Some((lo.trim().parse().ok()?, hi.trim().parse().ok()?))
                });
                pending.range = Some(parsed.ok_or_else(|| ParseError::BadRange {
                    line,
                    text: value.to_string(),
                })?);
            }
            "Missing" => {
                for code in value.split(',') {
                    let code = code.trim();
                    if code.is_empty() {
                        continue;
                    }
                    pending.missing.push(
                        code.parse::<f64>()
                            .map_or_else(|_| DataValue::Text(code.to_string()), DataValue::Number),
                    );
                }
            }
            "Values" => in_values = true,
            "Role" => match value {
                "treatment" => pending.is_treatment = true,
                "outcome" => pending.is_outcome = true,
                "confounder" => pending.is_confounder = true,
                other => {
                    return Err(ParseError::BadRole {
                        line,
                        text: other.to_string(),
                    });
                }
            },
            // Unknown keys are carried by richer codebook formats; skip.
            _ => {}
        }
    }

    if let Some(pending) = current.take() {
        codebook.variables.push(pending.finish()?);
    }
    Ok(codebook)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Codebook: Survey Data

# Variable: age
Label: Respondent Age
Type: numeric_continuous
Units: years
Range: 18-99
Missing: -1, 999
Description: Age of survey respondent in years

# Variable: gender
Label: Gender
Type: categorical_nominal
Values:
  1: Male
  2: Female
  3: Other
Missing: 0

# Variable: satisfaction
Label: Job Satisfaction
Type: categorical_ordinal
Values:
  1: Very Dissatisfied
  5: Very Satisfied
Missing: -1
";

    #[test]
    fn test_parses_sample_codebook() {
        let cb = parse(SAMPLE).unwrap();
        assert_eq!(cb.name.as_deref(), Some("Survey Data"));
        assert_eq!(cb.len(), 3);

        let age = cb.variable("age").unwrap();
        assert_eq!(age.display_label(), "Respondent Age");
        assert_eq!(age.units.as_deref(), Some("years"));
        assert_eq!(age.range_min, Some(18.0));
        assert_eq!(age.range_max, Some(99.0));
        assert!(age.is_missing(&DataValue::Number(999.0)));

        let gender = cb.variable("gender").unwrap();
        assert_eq!(gender.value_label("2"), Some("Female"));
        assert_eq!(gender.value_labels.len(), 3);
    }

    #[test]
    fn test_variable_order_is_preserved() {
        let cb = parse(SAMPLE).unwrap();
        let names: Vec<_> = cb.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["age", "gender", "satisfaction"]);
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let err = parse("# Variable: x\nType: fancy\n").unwrap_err();
        assert!(err.to_string().contains("fancy"));
    }

    #[test]
    fn test_missing_type_is_an_error() {
        let err = parse("# Variable: x\nLabel: X\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingType { .. }));
    }

    #[test]
    fn test_field_outside_block() {
        let err = parse("Label: lost\n").unwrap_err();
        assert!(matches!(err, ParseError::FieldOutsideBlock { line: 1 }));
    }

    #[test]
    fn test_roles() {
        let cb = parse(
            "# Variable: program\nType: boolean\nRole: treatment\n\n# Variable: income\nType: numeric_continuous\nRole: outcome\n",
        )
        .unwrap();
        assert!(cb.variable("program").unwrap().is_treatment);
        assert!(cb.variable("income").unwrap().is_outcome);
    }
}
