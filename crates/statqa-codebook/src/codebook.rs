//! Ordered collection of variable descriptors.

use serde::{Deserialize, Serialize};

use crate::variable::Variable;

/// A codebook: one [`Variable`] per dataset column, in declaration order.
///
/// Declaration order matters because batch analyses must emit results in
/// input variable order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Codebook {
    /// Dataset name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Dataset description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Variables in declaration order.
    pub variables: Vec<Variable>,
}

impl Codebook {
    /// Creates an empty codebook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a variable by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the codebook has no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Variables flagged as confounders.
    pub fn confounders(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(|v| v.is_confounder)
    }

    /// The variable flagged as treatment, if exactly one is.
    #[must_use]
    pub fn treatment(&self) -> Option<&Variable> {
        single(self.variables.iter().filter(|v| v.is_treatment))
    }

    /// The variable flagged as outcome, if exactly one is.
    #[must_use]
    pub fn outcome(&self) -> Option<&Variable> {
        single(self.variables.iter().filter(|v| v.is_outcome))
    }
}

fn single<'a>(mut iter: impl Iterator<Item = &'a Variable>) -> Option<&'a Variable> {
    let first = iter.next()?;
    if iter.next().is_some() { None } else { Some(first) }
}
