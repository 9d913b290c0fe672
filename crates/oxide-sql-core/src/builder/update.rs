//! UPDATE query builder using the typestate pattern.

use std::marker::PhantomData;

use super::expr::Expr;
use super::value::{SqlValue, ToSqlValue};
use crate::operation::{TableRef, UpdateQuery};

// Typestate markers

/// Marker: No table specified yet.
pub struct NoTable;
/// State: Table has been specified.
pub struct HasTable(TableRef);
/// Marker: No SET clause specified yet.
pub struct NoSet;
/// Marker: SET clause has been specified.
pub struct HasSet;

/// An UPDATE builder.
pub struct Update<Table, Set> {
    table: Table,
    assignments: Vec<(String, SqlValue)>,
    where_clause: Option<Expr>,
    returning: Vec<String>,
    _state: PhantomData<Set>,
}

impl Update<NoTable, NoSet> {
    /// Creates a new UPDATE builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: NoTable,
            assignments: vec![],
            where_clause: None,
            returning: vec![],
            _state: PhantomData,
        }
    }
}

impl Default for Update<NoTable, NoSet> {
    fn default() -> Self {
        Self::new()
    }
}

// Transition: NoTable -> HasTable
impl<Set> Update<NoTable, Set> {
    /// Specifies the table to update.
    #[must_use]
    pub fn table(self, table: &str) -> Update<HasTable, Set> {
        Update {
            table: HasTable(TableRef::parse(table)),
            assignments: self.assignments,
            where_clause: self.where_clause,
            returning: self.returning,
            _state: PhantomData,
        }
    }
}

// Transition: NoSet -> HasSet (requires table)
impl Update<HasTable, NoSet> {
    /// Adds a SET assignment.
    #[must_use]
    pub fn set<T: ToSqlValue>(self, column: &str, value: T) -> Update<HasTable, HasSet> {
        Update {
            table: self.table,
            assignments: vec![(String::from(column), value.to_sql_value())],
            where_clause: self.where_clause,
            returning: self.returning,
            _state: PhantomData,
        }
    }
}

// Methods available after SET
impl Update<HasTable, HasSet> {
    /// Adds another SET assignment.
    #[must_use]
    pub fn set<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        self.assignments
            .push((String::from(column), value.to_sql_value()));
        self
    }

    /// Adds a WHERE clause.
    #[must_use]
    pub fn where_clause(mut self, expr: Expr) -> Self {
        self.where_clause = Some(expr);
        self
    }

    /// Requests column values of the updated row.
    #[must_use]
    pub fn returning(mut self, cols: &[&str]) -> Self {
        self.returning = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Builds the abstract UPDATE query.
    #[must_use]
    pub fn build(self) -> UpdateQuery {
        UpdateQuery {
            table: self.table.0,
            assignments: self.assignments,
            where_clause: self.where_clause,
            returning: self.returning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::col;

    #[test]
    fn test_update_keeps_assignment_order() {
        let q = Update::new()
            .table("users")
            .set("name", "Bob")
            .set("age", 31)
            .where_clause(col("id").eq(1))
            .build();
        let names: Vec<&str> = q.assignments.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["name", "age"]);
        assert!(q.where_clause.is_some());
    }
}
