//! Variable metadata and tabular data model for the statqa project.
//!
//! A *codebook* describes every column of a dataset: its display label, its
//! semantic type (how it should be analyzed, as opposed to how it is
//! stored), sentinel codes that mean "missing", and display labels for
//! category codes. The analyzers consume a [`DataTable`] together with the
//! [`Variable`] descriptors from a [`Codebook`].
//!
//! # Modules
//!
//! - [`semantic_type`]: The closed set of analysis-relevant column types
//! - [`variable`]: Per-column metadata
//! - [`codebook`]: Ordered collection of variables
//! - [`value`]: Dynamically typed cell values
//! - [`table`]: Column-oriented in-memory table
//! - [`text`]: Parser for the plain-text codebook format
//!
//! # Examples
//!
//! ```
//! use statqa_codebook::{SemanticType, Variable};
//!
//! let age = Variable::new("age", SemanticType::NumericContinuous)
//!     .with_label("Respondent Age");
//! assert_eq!(age.display_label(), "Respondent Age");
//! assert!(age.semantic_type.is_numeric());
//! ```

pub mod codebook;
pub mod semantic_type;
pub mod table;
pub mod text;
pub mod value;
pub mod variable;

pub use codebook::Codebook;
pub use semantic_type::SemanticType;
pub use table::DataTable;
pub use value::DataValue;
pub use variable::Variable;
