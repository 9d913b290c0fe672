//! SELECT query builder using the typestate pattern.
//!
//! `build()` is only available once both the select list and the source
//! table are known.

use std::marker::PhantomData;

use super::expr::{Column, Expr};
use crate::operation::{Direction, Join, JoinKind, OrderBy, SelectItem, SelectQuery, TableRef};

// Typestate markers

/// Marker: No columns specified yet.
pub struct NoColumns;
/// Marker: Columns have been specified.
pub struct HasColumns;
/// Marker: No FROM clause specified yet.
pub struct NoFrom;
/// State: FROM clause has been specified.
pub struct HasFrom(TableRef);

#[derive(Default)]
struct Clauses {
    distinct: bool,
    columns: Vec<SelectItem>,
    joins: Vec<Join>,
    where_clause: Option<Expr>,
    group_by: Vec<Column>,
    having: Option<Expr>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
}

/// A SELECT builder.
///
/// Uses the typestate pattern to ensure that:
/// - `build()` is only available when both columns and FROM are specified
/// - `where_clause()` and joins are only available after FROM is specified
pub struct Select<Cols, From> {
    from: From,
    clauses: Clauses,
    _state: PhantomData<Cols>,
}

impl Select<NoColumns, NoFrom> {
    /// Creates a new SELECT builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            from: NoFrom,
            clauses: Clauses::default(),
            _state: PhantomData,
        }
    }
}

impl Default for Select<NoColumns, NoFrom> {
    fn default() -> Self {
        Self::new()
    }
}

// Transition: NoColumns -> HasColumns
impl<From> Select<NoColumns, From> {
    /// Specifies the columns to select.
    ///
    /// Entries may be qualified (`"u.id"`), aliased (`"name AS author"`) or
    /// raw expressions (`"COUNT(*)"`).
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Select<HasColumns, From> {
        self.clauses.columns = cols.iter().map(|c| SelectItem::parse(c)).collect();
        Select {
            from: self.from,
            clauses: self.clauses,
            _state: PhantomData,
        }
    }

    /// Selects all columns (*).
    #[must_use]
    pub fn all(mut self) -> Select<HasColumns, From> {
        self.clauses.columns = vec![SelectItem::Wildcard];
        Select {
            from: self.from,
            clauses: self.clauses,
            _state: PhantomData,
        }
    }
}

// Transition: NoFrom -> HasFrom
impl<Cols> Select<Cols, NoFrom> {
    /// Specifies the table to select from, optionally with an alias (`"users u"`).
    #[must_use]
    pub fn from(self, table: &str) -> Select<Cols, HasFrom> {
        Select {
            from: HasFrom(TableRef::parse(table)),
            clauses: self.clauses,
            _state: PhantomData,
        }
    }
}

// Methods available after FROM
impl<Cols> Select<Cols, HasFrom> {
    /// Adds a WHERE clause.
    #[must_use]
    pub fn where_clause(mut self, expr: Expr) -> Self {
        self.clauses.where_clause = Some(expr);
        self
    }

    fn push_join(mut self, kind: JoinKind, table: &str, on: Option<Expr>) -> Self {
        self.clauses.joins.push(Join {
            kind,
            table: TableRef::parse(table),
            on,
        });
        self
    }

    /// Adds an INNER JOIN.
    #[must_use]
    pub fn join(self, table: &str, on: Expr) -> Self {
        self.push_join(JoinKind::Inner, table, Some(on))
    }

    /// Adds a LEFT JOIN.
    #[must_use]
    pub fn left_join(self, table: &str, on: Expr) -> Self {
        self.push_join(JoinKind::Left, table, Some(on))
    }

    /// Adds a RIGHT JOIN.
    #[must_use]
    pub fn right_join(self, table: &str, on: Expr) -> Self {
        self.push_join(JoinKind::Right, table, Some(on))
    }

    /// Adds a CROSS JOIN.
    #[must_use]
    pub fn cross_join(self, table: &str) -> Self {
        self.push_join(JoinKind::Cross, table, None)
    }
}

// Methods available with columns
impl<From> Select<HasColumns, From> {
    /// Sets DISTINCT.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.clauses.distinct = true;
        self
    }
}

impl Select<HasColumns, HasFrom> {
    /// Adds a GROUP BY clause.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.clauses.group_by = cols.iter().map(|c| Column::parse(c)).collect();
        self
    }

    /// Adds a HAVING clause.
    #[must_use]
    pub fn having(mut self, expr: Expr) -> Self {
        self.clauses.having = Some(expr);
        self
    }

    fn push_order(mut self, cols: &[&str], direction: Direction) -> Self {
        self.clauses
            .order_by
            .extend(cols.iter().map(|c| OrderBy {
                column: Column::parse(c),
                direction,
            }));
        self
    }

    /// Adds ascending ORDER BY entries.
    #[must_use]
    pub fn order_by(self, cols: &[&str]) -> Self {
        self.push_order(cols, Direction::Asc)
    }

    /// Adds descending ORDER BY entries.
    #[must_use]
    pub fn order_by_desc(self, cols: &[&str]) -> Self {
        self.push_order(cols, Direction::Desc)
    }

    /// Limits the number of returned rows.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.clauses.limit = Some(n);
        self
    }

    /// Skips the first `n` rows.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.clauses.offset = Some(n);
        self
    }

    /// Builds the abstract SELECT query.
    #[must_use]
    pub fn build(self) -> SelectQuery {
        let c = self.clauses;
        SelectQuery {
            distinct: c.distinct,
            columns: c.columns,
            from: self.from.0,
            joins: c.joins,
            where_clause: c.where_clause,
            group_by: c.group_by,
            having: c.having,
            order_by: c.order_by,
            limit: c.limit,
            offset: c.offset,
        }
    }
}
