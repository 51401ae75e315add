//! Column-oriented in-memory table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::DataValue;

/// Error building a [`DataTable`].
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TableError {
    /// Two columns were given different numbers of rows.
    #[display("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    /// The same column name appeared twice.
    #[display("Duplicate column '{column}'")]
    DuplicateColumn { column: String },
}

/// A read-only tabular dataset: named columns of equal length.
///
/// Analyzers never mutate a table; they borrow column slices from it.
///
/// # Examples
///
/// ```
/// use statqa_codebook::{DataTable, DataValue};
///
/// let table = DataTable::from_columns(vec![
///     ("age".into(), vec![25.0.into(), 30.0.into(), 35.0.into()]),
///     ("city".into(), vec!["Oslo".into(), "Lima".into(), "Kyoto".into()]),
/// ])
/// .unwrap();
///
/// assert_eq!(table.n_rows(), 3);
/// assert_eq!(table.column("age").unwrap().len(), 3);
/// assert!(table.column("salary").is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataTable {
    names: Vec<String>,
    columns: Vec<Vec<DataValue>>,
    n_rows: usize,
}

impl DataTable {
    /// Builds a table from `(name, values)` pairs.
    ///
    /// All columns must have the same length and distinct names.
    pub fn from_columns(
        columns: Vec<(String, Vec<DataValue>)>,
    ) -> Result<Self, TableError> {
        let mut table = Self::default();
        for (name, values) in columns {
            if table.names.contains(&name) {
                return Err(TableError::DuplicateColumn { column: name });
            }
            if table.names.is_empty() {
                table.n_rows = values.len();
            } else if values.len() != table.n_rows {
                return Err(TableError::LengthMismatch {
                    column: name,
                    expected: table.n_rows,
                    actual: values.len(),
                });
            }
            table.names.push(name);
            table.columns.push(values);
        }
        Ok(table)
    }

    /// Builds a table from row maps (e.g. parsed JSON objects).
    ///
    /// Column order is the sorted union of keys; absent keys become null.
    #[must_use]
    pub fn from_rows(rows: &[BTreeMap<String, DataValue>]) -> Self {
        let mut names: Vec<String> = rows
            .iter()
            .flat_map(|row| row.keys().cloned())
            .collect();
        names.sort();
        names.dedup();

        let columns = names
            .iter()
            .map(|name| {
                rows.iter()
                    .map(|row| row.get(name).cloned().unwrap_or(DataValue::Null))
                    .collect()
            })
            .collect();
        Self {
            n_rows: rows.len(),
            names,
            columns,
        }
    }

    /// Column values by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[DataValue]> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(&self.columns[idx])
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.names.len()
    }
}
