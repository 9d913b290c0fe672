//! DELETE query builder using the typestate pattern.

use super::expr::Expr;
use crate::operation::{DeleteQuery, TableRef};

// Typestate markers

/// Marker: No table specified yet.
pub struct NoTable;
/// State: Table has been specified.
pub struct HasTable(TableRef);

/// A DELETE builder.
///
/// `where_clause()` and `build()` are only available after the table is
/// specified.
pub struct Delete<Table> {
    table: Table,
    where_clause: Option<Expr>,
    returning: Vec<String>,
}

impl Delete<NoTable> {
    /// Creates a new DELETE builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: NoTable,
            where_clause: None,
            returning: vec![],
        }
    }

    /// Specifies the table to delete from.
    #[must_use]
    pub fn from(self, table: &str) -> Delete<HasTable> {
        Delete {
            table: HasTable(TableRef::parse(table)),
            where_clause: self.where_clause,
            returning: self.returning,
        }
    }
}

impl Default for Delete<NoTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl Delete<HasTable> {
    /// Adds a WHERE clause.
    ///
    /// **Important**: DELETE without WHERE deletes all rows!
    #[must_use]
    pub fn where_clause(mut self, expr: Expr) -> Self {
        self.where_clause = Some(expr);
        self
    }

    /// Requests column values of the deleted row.
    #[must_use]
    pub fn returning(mut self, cols: &[&str]) -> Self {
        self.returning = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Returns true if a WHERE clause is specified.
    #[must_use]
    pub const fn has_where_clause(&self) -> bool {
        self.where_clause.is_some()
    }

    /// Builds the abstract DELETE query.
    #[must_use]
    pub fn build(self) -> DeleteQuery {
        DeleteQuery {
            table: self.table.0,
            where_clause: self.where_clause,
            returning: self.returning,
        }
    }
}
