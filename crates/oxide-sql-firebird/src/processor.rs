//! Result shaping.
//!
//! The engine hands back either rows or an affected-row count. The
//! [`Processor`] turns that into the shape the operation implies.

use oxide_sql_core::{Operation, SqlValue};

use crate::error::{Error, Result};
use crate::session::{RawResult, Row};
use crate::version::Features;

/// What kind of result an operation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Row-returning query.
    Select,
    /// Insert; rows when it has `RETURNING`, a count otherwise.
    Insert,
    /// Insert whose first returned column is the generated id.
    InsertGetId,
    /// Update.
    Update,
    /// Delete.
    Delete,
    /// Executable or selectable stored procedure.
    Procedure,
    /// Scalar function call.
    Function,
    /// Single value, such as a sequence's next value.
    Scalar,
}

impl OperationKind {
    /// Derives the kind from an operation.
    #[must_use]
    pub const fn of(operation: &Operation) -> Self {
        match operation {
            Operation::Select(_) => Self::Select,
            Operation::Insert(_) => Self::Insert,
            Operation::Update(_) => Self::Update,
            Operation::Delete(_) => Self::Delete,
            Operation::Procedure(_) | Operation::SelectProcedure(_) => Self::Procedure,
            Operation::Function(_) => Self::Function,
            Operation::NextSequenceValue(_) => Self::Scalar,
        }
    }
}

/// A shaped result.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedResult {
    /// Query rows, or rows produced by a `RETURNING` clause.
    Rows(Vec<Row>),
    /// Number of rows touched.
    Affected(u64),
    /// Generated identity of an inserted row.
    LastInsertId(SqlValue),
    /// Procedure or function output records, possibly empty.
    Records(Vec<Row>),
    /// One value.
    Scalar(SqlValue),
}

impl NormalizedResult {
    /// Returns the rows of a `Rows` or `Records` result.
    #[must_use]
    pub fn into_rows(self) -> Option<Vec<Row>> {
        match self {
            Self::Rows(rows) | Self::Records(rows) => Some(rows),
            _ => None,
        }
    }

    /// Returns the count of an `Affected` result.
    #[must_use]
    pub const fn affected(&self) -> Option<u64> {
        match self {
            Self::Affected(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value of a `LastInsertId` or `Scalar` result.
    #[must_use]
    pub fn into_value(self) -> Option<SqlValue> {
        match self {
            Self::LastInsertId(v) | Self::Scalar(v) => Some(v),
            _ => None,
        }
    }
}

/// Shapes raw results for one engine version.
#[derive(Debug, Clone, Copy)]
pub struct Processor {
    trim_catalog_names: bool,
}

impl Processor {
    /// Creates a processor matching a grammar's capabilities.
    #[must_use]
    pub const fn new(features: Features) -> Self {
        Self {
            trim_catalog_names: !features.trim,
        }
    }

    /// Shapes a raw result according to the operation kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResult`] when the raw result cannot have
    /// come from an operation of that kind.
    pub fn shape(&self, raw: RawResult, kind: OperationKind) -> Result<NormalizedResult> {
        match (kind, raw) {
            (OperationKind::Select, RawResult::Rows(rows)) => Ok(NormalizedResult::Rows(rows)),
            (OperationKind::Select, RawResult::Affected(_)) => Err(Error::UnexpectedResult(
                String::from("query returned no result set"),
            )),
            (OperationKind::Insert | OperationKind::Update | OperationKind::Delete, raw) => {
                Ok(match raw {
                    RawResult::Rows(rows) => NormalizedResult::Rows(rows),
                    RawResult::Affected(n) => NormalizedResult::Affected(n),
                })
            }
            (OperationKind::InsertGetId, RawResult::Rows(rows)) => first_value(rows)
                .map(|v| NormalizedResult::LastInsertId(normalize_id(v)))
                .ok_or_else(|| {
                    Error::UnexpectedResult(String::from("insert returned no generated id"))
                }),
            (OperationKind::InsertGetId, RawResult::Affected(_)) => Err(Error::UnexpectedResult(
                String::from("insert did not return its generated id"),
            )),
            // EXECUTE PROCEDURE without output parameters yields no rows.
            (OperationKind::Procedure | OperationKind::Function, RawResult::Rows(rows)) => {
                Ok(NormalizedResult::Records(rows))
            }
            (OperationKind::Procedure | OperationKind::Function, RawResult::Affected(_)) => {
                Ok(NormalizedResult::Records(vec![]))
            }
            (OperationKind::Scalar, RawResult::Rows(rows)) => Ok(NormalizedResult::Scalar(
                first_value(rows).unwrap_or(SqlValue::Null),
            )),
            (OperationKind::Scalar, RawResult::Affected(_)) => Err(Error::UnexpectedResult(
                String::from("scalar query returned no result set"),
            )),
        }
    }

    /// Interprets a table-exists catalog query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResult`] if the result holds no count.
    pub fn has_table(&self, raw: RawResult) -> Result<bool> {
        match raw {
            RawResult::Rows(rows) => first_value(rows)
                .and_then(|v| v.as_i64())
                .map(|count| count > 0)
                .ok_or_else(|| Error::UnexpectedResult(String::from("table count missing"))),
            RawResult::Affected(_) => Err(Error::UnexpectedResult(String::from(
                "table lookup returned no result set",
            ))),
        }
    }

    /// Interprets a column-listing catalog query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResult`] if a row does not hold a name.
    pub fn column_listing(&self, raw: RawResult) -> Result<Vec<String>> {
        let RawResult::Rows(rows) = raw else {
            return Err(Error::UnexpectedResult(String::from(
                "column listing returned no result set",
            )));
        };
        rows.iter()
            .map(|row| {
                let name = row
                    .get_index(0)
                    .and_then(SqlValue::as_str)
                    .ok_or_else(|| Error::UnexpectedResult(String::from("column name missing")))?;
                Ok(if self.trim_catalog_names {
                    name.trim_end().to_string()
                } else {
                    name.to_string()
                })
            })
            .collect()
    }
}

fn first_value(rows: Vec<Row>) -> Option<SqlValue> {
    rows.into_iter()
        .next()
        .and_then(|row| row.into_values().into_iter().next())
}

/// Drivers may report integral identities as text or floats.
fn normalize_id(value: SqlValue) -> SqlValue {
    value.as_i64().map_or(value, SqlValue::Int)
}
