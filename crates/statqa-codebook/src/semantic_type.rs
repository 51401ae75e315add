//! The closed set of analysis-relevant column types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic type of a column: how it should be analyzed, independent of raw
/// storage type.
///
/// The set is closed on purpose; parsing an unknown name fails fast rather
/// than silently defaulting, so a typo in a codebook surfaces immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Continuous measurement (age, income).
    NumericContinuous,
    /// Discrete count or year-like integer.
    NumericDiscrete,
    /// Unordered categories (gender, region).
    CategoricalNominal,
    /// Ordered categories (Likert scales).
    CategoricalOrdinal,
    /// Two-valued indicator.
    Boolean,
    /// Calendar time.
    Datetime,
    /// Free text.
    Text,
}

impl SemanticType {
    /// Whether this type takes the numeric analysis branch.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::NumericContinuous | Self::NumericDiscrete)
    }

    /// Whether this type takes the categorical analysis branch.
    #[must_use]
    pub fn is_categorical(self) -> bool {
        matches!(
            self,
            Self::CategoricalNominal | Self::CategoricalOrdinal | Self::Boolean
        )
    }

    /// Whether this type can order a temporal analysis (datetime or
    /// year-like numbers).
    #[must_use]
    pub fn is_orderable_time(self) -> bool {
        matches!(self, Self::Datetime) || self.is_numeric()
    }

    /// Canonical snake_case name, as used in codebooks.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NumericContinuous => "numeric_continuous",
            Self::NumericDiscrete => "numeric_discrete",
            Self::CategoricalNominal => "categorical_nominal",
            Self::CategoricalOrdinal => "categorical_ordinal",
            Self::Boolean => "boolean",
            Self::Datetime => "datetime",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a semantic type name is not recognized.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Unknown semantic type '{name}'")]
pub struct UnknownSemanticType {
    /// The offending name.
    pub name: String,
}

impl FromStr for SemanticType {
    type Err = UnknownSemanticType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "numeric_continuous" => Ok(Self::NumericContinuous),
            "numeric_discrete" => Ok(Self::NumericDiscrete),
            "categorical_nominal" => Ok(Self::CategoricalNominal),
            "categorical_ordinal" => Ok(Self::CategoricalOrdinal),
            "boolean" => Ok(Self::Boolean),
            "datetime" => Ok(Self::Datetime),
            "text" => Ok(Self::Text),
            _ => Err(UnknownSemanticType { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_variants() {
        let all = [
            SemanticType::NumericContinuous,
            SemanticType::NumericDiscrete,
            SemanticType::CategoricalNominal,
            SemanticType::CategoricalOrdinal,
            SemanticType::Boolean,
            SemanticType::Datetime,
            SemanticType::Text,
        ];
        for ty in all {
            assert_eq!(ty.as_str().parse::<SemanticType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_unknown_type_fails_fast() {
        let err = "ordinal".parse::<SemanticType>().unwrap_err();
        assert!(err.to_string().contains("ordinal"));
    }

    #[test]
    fn test_branch_classification() {
        assert!(SemanticType::NumericDiscrete.is_numeric());
        assert!(SemanticType::Boolean.is_categorical());
        assert!(!SemanticType::Text.is_numeric());
        assert!(!SemanticType::Text.is_categorical());
        assert!(SemanticType::Datetime.is_orderable_time());
        assert!(SemanticType::NumericDiscrete.is_orderable_time());
        assert!(!SemanticType::CategoricalNominal.is_orderable_time());
    }
}
