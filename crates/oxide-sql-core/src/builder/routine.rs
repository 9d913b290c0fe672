//! Stored procedure and function calls.

use super::value::{SqlValue, ToSqlValue};
use crate::operation::{Operation, RoutineCall};

impl RoutineCall {
    /// Creates a call with no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: vec![],
        }
    }

    /// Creates a call with the given ordered arguments.
    #[must_use]
    pub fn with_args(name: impl Into<String>, args: Vec<SqlValue>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Appends an argument.
    #[must_use]
    pub fn arg<T: ToSqlValue>(mut self, value: T) -> Self {
        self.args.push(value.to_sql_value());
        self
    }

    /// Wraps the call as an executable procedure operation.
    #[must_use]
    pub fn procedure(self) -> Operation {
        Operation::Procedure(self)
    }

    /// Wraps the call as a selectable procedure operation.
    #[must_use]
    pub fn selectable(self) -> Operation {
        Operation::SelectProcedure(self)
    }

    /// Wraps the call as a function operation.
    #[must_use]
    pub fn function(self) -> Operation {
        Operation::Function(self)
    }
}
