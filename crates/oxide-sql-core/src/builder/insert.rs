//! INSERT query builder using the typestate pattern.

use std::marker::PhantomData;

use super::value::{SqlValue, ToSqlValue};
use crate::operation::{InsertQuery, TableRef};

// Typestate markers

/// Marker: No table specified yet.
pub struct NoTable;
/// State: Table has been specified.
pub struct HasTable(TableRef);
/// Marker: No values specified yet.
pub struct NoValues;
/// Marker: Values have been specified.
pub struct HasValues;

/// An INSERT builder.
pub struct Insert<Table, Values> {
    table: Table,
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
    returning: Vec<String>,
    _state: PhantomData<Values>,
}

impl Insert<NoTable, NoValues> {
    /// Creates a new INSERT builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: NoTable,
            columns: vec![],
            rows: vec![],
            returning: vec![],
            _state: PhantomData,
        }
    }
}

impl Default for Insert<NoTable, NoValues> {
    fn default() -> Self {
        Self::new()
    }
}

// Transition: NoTable -> HasTable
impl<Values> Insert<NoTable, Values> {
    /// Specifies the table to insert into.
    #[must_use]
    pub fn into_table(self, table: &str) -> Insert<HasTable, Values> {
        Insert {
            table: HasTable(TableRef::parse(table)),
            columns: self.columns,
            rows: self.rows,
            returning: self.returning,
            _state: PhantomData,
        }
    }
}

// Methods available after specifying table
impl<Values> Insert<HasTable, Values> {
    /// Specifies the columns to insert into.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Requests column values of the inserted row (e.g. a generated key).
    #[must_use]
    pub fn returning(mut self, cols: &[&str]) -> Self {
        self.returning = cols.iter().map(|s| String::from(*s)).collect();
        self
    }
}

// Transition: NoValues -> HasValues
impl Insert<HasTable, NoValues> {
    /// Adds a row of values to insert.
    #[must_use]
    pub fn values<T: ToSqlValue>(self, vals: Vec<T>) -> Insert<HasTable, HasValues> {
        let row: Vec<SqlValue> = vals.into_iter().map(ToSqlValue::to_sql_value).collect();
        Insert {
            table: self.table,
            columns: self.columns,
            rows: vec![row],
            returning: self.returning,
            _state: PhantomData,
        }
    }

    /// Inserts a row made only of column defaults.
    #[must_use]
    pub fn default_values(self) -> Insert<HasTable, HasValues> {
        Insert {
            table: self.table,
            columns: vec![],
            rows: vec![],
            returning: self.returning,
            _state: PhantomData,
        }
    }
}

// Methods available after adding values
impl Insert<HasTable, HasValues> {
    /// Adds another row of values.
    #[must_use]
    pub fn and_values<T: ToSqlValue>(mut self, vals: Vec<T>) -> Self {
        self.rows
            .push(vals.into_iter().map(ToSqlValue::to_sql_value).collect());
        self
    }

    /// Builds the abstract INSERT query.
    #[must_use]
    pub fn build(self) -> InsertQuery {
        InsertQuery {
            table: self.table.0,
            columns: self.columns,
            rows: self.rows,
            returning: self.returning,
        }
    }
}
