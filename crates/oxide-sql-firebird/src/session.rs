//! Execution collaborator contract.
//!
//! A [`Session`] is one live engine session: it runs compiled statements,
//! exposes the engine context variables, and owns the driver-level autocommit
//! switch and transaction primitives. Transport, pooling and authentication
//! are the implementor's business.

use async_trait::async_trait;
use oxide_sql_core::SqlValue;

use crate::error::BoxError;
use crate::grammar::CompiledStatement;

/// One result row: column labels and values in select-list order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Creates a row from parallel column and value lists.
    ///
    /// Extra entries on the longer side are dropped.
    #[must_use]
    pub fn new(mut columns: Vec<String>, mut values: Vec<SqlValue>) -> Self {
        let len = columns.len().min(values.len());
        columns.truncate(len);
        values.truncate(len);
        Self { columns, values }
    }

    /// Creates a row from `(column, value)` pairs.
    #[must_use]
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, SqlValue)>,
        K: Into<String>,
    {
        let (columns, values) = pairs.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        Self { columns, values }
    }

    /// Returns the value of a column.
    ///
    /// Lookup ignores ASCII case, since Firebird reports unquoted identifiers
    /// in upper case.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .map(|i| &self.values[i])
    }

    /// Returns the value at a position.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Column labels.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in column order.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the row into its values.
    #[must_use]
    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

/// What the engine handed back for one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// Rows produced by a query, `RETURNING` clause or procedure outputs.
    Rows(Vec<Row>),
    /// Number of rows touched by a write or DDL statement.
    Affected(u64),
}

/// The execution collaborator.
///
/// Implementations must be `Send` so a connection can move between tasks.
/// A session is used by one caller at a time.
#[async_trait]
pub trait Session: Send {
    /// Executes a compiled statement, binding its parameters in order.
    async fn execute(&mut self, statement: &CompiledStatement) -> Result<RawResult, BoxError>;

    /// Reads an engine context variable (`RDB$GET_CONTEXT(namespace, key)`).
    ///
    /// Returns `Ok(None)` when the engine reports `NULL`.
    async fn get_context(&mut self, namespace: &str, key: &str)
    -> Result<Option<String>, BoxError>;

    /// Switches the session's autocommit mode.
    async fn set_autocommit(&mut self, enabled: bool) -> Result<(), BoxError>;

    /// Reads the session's autocommit mode.
    async fn autocommit(&mut self) -> Result<bool, BoxError>;

    /// Starts a transaction on the driver.
    async fn begin(&mut self) -> Result<(), BoxError>;

    /// Commits the driver transaction.
    async fn commit(&mut self) -> Result<(), BoxError>;

    /// Rolls back the driver transaction.
    async fn rollback(&mut self) -> Result<(), BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_lookup_ignores_case() {
        let row = Row::from_pairs([("ID", SqlValue::Int(1)), ("NAME", SqlValue::Null)]);
        assert_eq!(row.get("id"), Some(&SqlValue::Int(1)));
        assert_eq!(row.get_index(1), Some(&SqlValue::Null));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_row_new_truncates_to_shorter_side() {
        let row = Row::new(vec![String::from("A"), String::from("B")], vec![SqlValue::Int(1)]);
        assert_eq!(row.len(), 1);
        assert_eq!(row.columns(), &[String::from("A")]);
    }
}
