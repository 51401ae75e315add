//! Dynamically typed cell values.

use serde::{Deserialize, Serialize};

/// One cell of a data table.
///
/// The untagged serde representation maps directly onto JSON: `null`,
/// numbers, booleans, and strings round-trip without any wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    /// Explicit missing value.
    Null,
    /// A boolean indicator.
    Bool(bool),
    /// Any numeric value.
    Number(f64),
    /// A string (category code, date, or free text).
    Text(String),
}

impl DataValue {
    /// Whether this cell is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the cell.
    ///
    /// Booleans coerce to 0/1 and numeric strings parse; `Null` and
    /// non-numeric text yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use statqa_codebook::DataValue;
    ///
    /// assert_eq!(DataValue::Number(2.5).as_number(), Some(2.5));
    /// assert_eq!(DataValue::Bool(true).as_number(), Some(1.0));
    /// assert_eq!(DataValue::Text("42".into()).as_number(), Some(42.0));
    /// assert_eq!(DataValue::Text("n/a".into()).as_number(), None);
    /// ```
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(f64::from(u8::from(*b))),
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Canonical category code for categorical analysis.
    ///
    /// Whole numbers render without a fractional part so that `1`, `1.0`,
    /// and `"1"` all map to the code `"1"` (codebook value labels are keyed
    /// this way). `Null` has no code.
    ///
    /// # Examples
    ///
    /// ```
    /// use statqa_codebook::DataValue;
    ///
    /// assert_eq!(DataValue::Number(1.0).as_category_code(), Some("1".into()));
    /// assert_eq!(DataValue::Number(2.5).as_category_code(), Some("2.5".into()));
    /// assert_eq!(DataValue::Text("A".into()).as_category_code(), Some("A".into()));
    /// assert_eq!(DataValue::Null.as_category_code(), None);
    /// ```
    #[must_use]
    pub fn as_category_code(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(v) => Some(format_code(*v)),
            Self::Text(s) => Some(s.clone()),
        }
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Renders a number as a category code, dropping a zero fractional part.
#[expect(clippy::float_cmp)]
fn format_code(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_json_round_trip() {
        let values = vec![
            DataValue::Null,
            DataValue::Number(3.5),
            DataValue::Bool(true),
            DataValue::Text("B".into()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,3.5,true,"B"]"#);
        let back: Vec<DataValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_integer_codes_are_normalized() {
        assert_eq!(DataValue::Number(3.0).as_category_code().unwrap(), "3");
        assert_eq!(DataValue::Number(-1.0).as_category_code().unwrap(), "-1");
        assert_eq!(DataValue::Number(0.25).as_category_code().unwrap(), "0.25");
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(DataValue::Text(" 7 ".into()).as_number(), Some(7.0));
        assert_eq!(DataValue::Bool(false).as_number(), Some(0.0));
        assert!(DataValue::Null.as_number().is_none());
    }
}
