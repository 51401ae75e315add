//! Per-column variable metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{semantic_type::SemanticType, value::DataValue};

/// Metadata for one column of a dataset.
///
/// # Examples
///
/// ```
/// use statqa_codebook::{DataValue, SemanticType, Variable};
///
/// let gender = Variable::new("gender", SemanticType::CategoricalNominal)
///     .with_label("Gender")
///     .with_value_label("1", "Male")
///     .with_value_label("2", "Female")
///     .with_missing_code(DataValue::Number(0.0));
///
/// assert_eq!(gender.value_label("1"), Some("Male"));
/// assert!(gender.is_missing(&DataValue::Number(0.0)));
/// assert!(gender.is_missing(&DataValue::Null));
/// assert!(!gender.is_missing(&DataValue::Number(1.0)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Unique column name.
    pub name: String,
    /// Human-readable display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// How this column should be analyzed.
    pub semantic_type: SemanticType,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Measurement units, when meaningful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Declared valid range, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_max: Option<f64>,
    /// Sentinel values treated as missing in addition to null.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_codes: Vec<DataValue>,
    /// Display labels keyed by category code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub value_labels: BTreeMap<String, String>,
    /// Causal role flags, consumed only by the causal analyzer.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_treatment: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_outcome: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_confounder: bool,
}

impl Variable {
    /// Creates a variable with just a name and semantic type.
    #[must_use]
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            label: None,
            semantic_type,
            description: None,
            units: None,
            range_min: None,
            range_max: None,
            missing_codes: vec![],
            value_labels: BTreeMap::new(),
            is_treatment: false,
            is_outcome: false,
            is_confounder: false,
        }
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds a display label for one category code.
    #[must_use]
    pub fn with_value_label(mut self, code: impl Into<String>, label: impl Into<String>) -> Self {
        self.value_labels.insert(code.into(), label.into());
        self
    }

    /// Adds a sentinel missing code.
    #[must_use]
    pub fn with_missing_code(mut self, code: DataValue) -> Self {
        self.missing_codes.push(code);
        self
    }

    /// The display label, falling back to the internal name.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Label for a category code, if declared.
    #[must_use]
    pub fn value_label(&self, code: &str) -> Option<&str> {
        self.value_labels.get(code).map(String::as_str)
    }

    /// Whether a cell counts as missing for this variable: null, or equal
    /// to one of the declared missing codes (numeric codes match numeric
    /// views, so `-1`, `-1.0`, and `"-1"` all match a `-1` code).
    #[must_use]
    pub fn is_missing(&self, value: &DataValue) -> bool {
        if value.is_null() {
            return true;
        }
        self.missing_codes.iter().any(|code| {
            if code == value {
                return true;
            }
            match (code.as_number(), value.as_number()) {
                (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
                _ => false,
            }
        })
    }
}
