//! Abstract operations.
//!
//! An [`Operation`] is an engine-agnostic description of one statement. The
//! builders produce it, a dialect grammar consumes it. Nothing here renders
//! SQL text.

use crate::builder::expr::{Column, Expr};
use crate::builder::value::SqlValue;

/// A statement to be compiled by a dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// `SELECT`.
    Select(SelectQuery),
    /// `INSERT`.
    Insert(InsertQuery),
    /// `UPDATE`.
    Update(UpdateQuery),
    /// `DELETE`.
    Delete(DeleteQuery),
    /// Executable stored procedure invocation.
    Procedure(RoutineCall),
    /// Selectable stored procedure, queried like a table.
    SelectProcedure(RoutineCall),
    /// Scalar function invocation.
    Function(RoutineCall),
    /// Fetch the next value of a sequence.
    NextSequenceValue(String),
}

impl Operation {
    /// Returns true if the operation asks for post-write values.
    #[must_use]
    pub fn has_returning(&self) -> bool {
        match self {
            Self::Insert(q) => !q.returning.is_empty(),
            Self::Update(q) => !q.returning.is_empty(),
            Self::Delete(q) => !q.returning.is_empty(),
            _ => false,
        }
    }
}

impl From<SelectQuery> for Operation {
    fn from(q: SelectQuery) -> Self {
        Self::Select(q)
    }
}

impl From<InsertQuery> for Operation {
    fn from(q: InsertQuery) -> Self {
        Self::Insert(q)
    }
}

impl From<UpdateQuery> for Operation {
    fn from(q: UpdateQuery) -> Self {
        Self::Update(q)
    }
}

impl From<DeleteQuery> for Operation {
    fn from(q: DeleteQuery) -> Self {
        Self::Delete(q)
    }
}

/// A table reference with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    /// Table name.
    pub name: String,
    /// Alias.
    pub alias: Option<String>,
}

impl TableRef {
    /// Parses `"users"`, `"users u"` or `"users AS u"`.
    #[must_use]
    pub fn parse(table: &str) -> Self {
        let parts: Vec<&str> = table.split_whitespace().collect();
        match parts.as_slice() {
            [name, kw, alias] if kw.eq_ignore_ascii_case("as") => Self {
                name: String::from(*name),
                alias: Some(String::from(*alias)),
            },
            [name, alias] => Self {
                name: String::from(*name),
                alias: Some(String::from(*alias)),
            },
            _ => Self {
                name: String::from(table.trim()),
                alias: None,
            },
        }
    }
}

/// An item in the SELECT list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectItem {
    /// All columns (`*`).
    Wildcard,
    /// A column, optionally aliased.
    Column {
        /// Column reference.
        column: Column,
        /// Output alias.
        alias: Option<String>,
    },
    /// Raw SQL expression, emitted verbatim.
    Raw(String),
}

impl SelectItem {
    /// Parses a select-list entry.
    ///
    /// Plain (optionally qualified) identifiers with an optional `AS alias`
    /// become column references. Anything else, such as `COUNT(*)`, is kept raw.
    #[must_use]
    pub fn parse(item: &str) -> Self {
        let item = item.trim();
        if item == "*" {
            return Self::Wildcard;
        }
        let parts: Vec<&str> = item.split_whitespace().collect();
        let (name, alias) = match parts.as_slice() {
            [name] => (*name, None),
            [name, kw, alias] if kw.eq_ignore_ascii_case("as") => (*name, Some(*alias)),
            _ => return Self::Raw(String::from(item)),
        };
        if is_identifier_path(name) && alias.into_iter().all(is_identifier_path) {
            Self::Column {
                column: Column::parse(name),
                alias: alias.map(String::from),
            }
        } else {
            Self::Raw(String::from(item))
        }
    }
}

fn is_identifier_path(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|seg| {
            seg == "*"
                || (!seg.is_empty()
                    && seg
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$'))
        })
}

/// Join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `INNER JOIN`.
    Inner,
    /// `LEFT JOIN`.
    Left,
    /// `RIGHT JOIN`.
    Right,
    /// `CROSS JOIN`.
    Cross,
}

impl JoinKind {
    /// Returns the SQL keywords.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// A join descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Join kind.
    pub kind: JoinKind,
    /// Joined table.
    pub table: TableRef,
    /// Join condition (absent for `CROSS JOIN`).
    pub on: Option<Expr>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Sorted column.
    pub column: Column,
    /// Direction.
    pub direction: Direction,
}

/// A SELECT query.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// `DISTINCT` flag.
    pub distinct: bool,
    /// Select list; empty means `*`.
    pub columns: Vec<SelectItem>,
    /// Source table.
    pub from: TableRef,
    /// Joins in declaration order.
    pub joins: Vec<Join>,
    /// WHERE predicate.
    pub where_clause: Option<Expr>,
    /// GROUP BY columns.
    pub group_by: Vec<Column>,
    /// HAVING predicate.
    pub having: Option<Expr>,
    /// ORDER BY entries.
    pub order_by: Vec<OrderBy>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Number of rows to skip.
    pub offset: Option<u64>,
}

impl SelectQuery {
    /// Returns the bound values in the order their placeholders appear.
    #[must_use]
    pub fn params(&self) -> Vec<&SqlValue> {
        let mut out = vec![];
        for join in &self.joins {
            if let Some(on) = &join.on {
                out.extend(on.params());
            }
        }
        if let Some(w) = &self.where_clause {
            out.extend(w.params());
        }
        if let Some(h) = &self.having {
            out.extend(h.params());
        }
        out
    }
}

/// An INSERT query.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    /// Target table.
    pub table: TableRef,
    /// Target columns; empty means all columns in table order.
    pub columns: Vec<String>,
    /// One row of values per entry.
    pub rows: Vec<Vec<SqlValue>>,
    /// Columns to return from the inserted row.
    pub returning: Vec<String>,
}

/// An UPDATE query.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    /// Target table.
    pub table: TableRef,
    /// `SET column = value` pairs.
    pub assignments: Vec<(String, SqlValue)>,
    /// WHERE predicate.
    pub where_clause: Option<Expr>,
    /// Columns to return from the updated row.
    pub returning: Vec<String>,
}

/// A DELETE query.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQuery {
    /// Target table.
    pub table: TableRef,
    /// WHERE predicate.
    pub where_clause: Option<Expr>,
    /// Columns to return from the deleted row.
    pub returning: Vec<String>,
}

/// A stored procedure or function call with ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineCall {
    /// Routine name.
    pub name: String,
    /// Arguments, bound in order.
    pub args: Vec<SqlValue>,
}
