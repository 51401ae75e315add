//! Analyzer error taxonomy.
//!
//! Statistical failures stay typed so a batch caller can distinguish a
//! column that cannot be summarized from a pairing no test exists for,
//! and record each as a per-item failure instead of aborting the run.

use statqa_codebook::SemanticType;

/// Error from one analyzer invocation.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    /// Too few valid (non-missing) observations to compute the requested
    /// statistic.
    #[display("variable '{variable}' has {valid_n} valid observation(s), too few to analyze")]
    InsufficientData { variable: String, valid_n: usize },

    /// No test exists for this semantic-type pairing.
    #[display("no analysis for type pairing {left} x {right}")]
    UnsupportedTypeCombination {
        left: SemanticType,
        right: SemanticType,
    },

    /// A causal specification is invalid (missing or self-referential
    /// variable roles). Never silently repaired: swapping the model
    /// would change what the reported effect means.
    #[display("invalid analysis configuration: {reason}")]
    Configuration { reason: String },

    /// The table has no column for a requested variable.
    #[display("table has no column named '{name}'")]
    MissingColumn { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_variable() {
        let err = AnalysisError::InsufficientData {
            variable: "age".to_string(),
            valid_n: 0,
        };
        assert_eq!(
            err.to_string(),
            "variable 'age' has 0 valid observation(s), too few to analyze"
        );
    }

    #[test]
    fn test_display_names_the_type_pair() {
        let err = AnalysisError::UnsupportedTypeCombination {
            left: SemanticType::Text,
            right: SemanticType::Text,
        };
        assert!(err.to_string().contains("text x text"));
    }
}
