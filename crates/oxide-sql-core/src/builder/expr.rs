//! Expression tree builder.
//!
//! Expressions are kept structural until a dialect compiles them, so that
//! identifier rewriting (table prefixes, quoting) reaches every column
//! reference, including those inside subqueries.

use super::value::{SqlValue, ToSqlValue};
use crate::operation::SelectQuery;

/// Creates a column reference.
///
/// A dotted name such as `"u.id"` is split into qualifier and column.
#[must_use]
pub fn col(name: &str) -> Column {
    Column::parse(name)
}

/// A column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Optional table (or alias) qualifier.
    pub table: Option<String>,
    /// Column name.
    pub name: String,
}

impl Column {
    /// Parses `name` or `qualifier.name`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.rsplit_once('.') {
            Some((table, column)) => Self::qualified(table, column),
            None => Self {
                table: None,
                name: String::from(name),
            },
        }
    }

    /// Creates a qualified column reference.
    #[must_use]
    pub fn qualified(table: &str, name: &str) -> Self {
        Self {
            table: Some(String::from(table)),
            name: String::from(name),
        }
    }

    fn compare<T: ToSqlValue>(self, op: BinaryOp, value: T) -> Expr {
        Expr::binary(Expr::Column(self), op, Expr::Value(value.to_sql_value()))
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> Expr {
        self.compare(BinaryOp::Eq, value)
    }

    /// Creates an inequality expression.
    #[must_use]
    pub fn not_eq<T: ToSqlValue>(self, value: T) -> Expr {
        self.compare(BinaryOp::NotEq, value)
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt<T: ToSqlValue>(self, value: T) -> Expr {
        self.compare(BinaryOp::Lt, value)
    }

    /// Creates a less-than-or-equal expression.
    #[must_use]
    pub fn lt_eq<T: ToSqlValue>(self, value: T) -> Expr {
        self.compare(BinaryOp::LtEq, value)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt<T: ToSqlValue>(self, value: T) -> Expr {
        self.compare(BinaryOp::Gt, value)
    }

    /// Creates a greater-than-or-equal expression.
    #[must_use]
    pub fn gt_eq<T: ToSqlValue>(self, value: T) -> Expr {
        self.compare(BinaryOp::GtEq, value)
    }

    /// Creates a LIKE expression.
    #[must_use]
    pub fn like<T: ToSqlValue>(self, pattern: T) -> Expr {
        self.compare(BinaryOp::Like, pattern)
    }

    /// Creates a NOT LIKE expression.
    #[must_use]
    pub fn not_like<T: ToSqlValue>(self, pattern: T) -> Expr {
        self.compare(BinaryOp::NotLike, pattern)
    }

    /// Compares this column with another column, e.g. in a join condition.
    #[must_use]
    pub fn eq_col(self, other: &str) -> Expr {
        Expr::binary(Expr::Column(self), BinaryOp::Eq, Expr::Column(col(other)))
    }

    /// Creates an IS NULL expression.
    #[must_use]
    pub fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(Expr::Column(self)),
            negated: false,
        }
    }

    /// Creates an IS NOT NULL expression.
    #[must_use]
    pub fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(Expr::Column(self)),
            negated: true,
        }
    }

    /// Creates a BETWEEN expression.
    #[must_use]
    pub fn between<T: ToSqlValue, U: ToSqlValue>(self, low: T, high: U) -> Expr {
        Expr::Between {
            expr: Box::new(Expr::Column(self)),
            low: low.to_sql_value(),
            high: high.to_sql_value(),
            negated: false,
        }
    }

    /// Creates a NOT BETWEEN expression.
    #[must_use]
    pub fn not_between<T: ToSqlValue, U: ToSqlValue>(self, low: T, high: U) -> Expr {
        Expr::Between {
            expr: Box::new(Expr::Column(self)),
            low: low.to_sql_value(),
            high: high.to_sql_value(),
            negated: true,
        }
    }

    /// Creates an IN expression.
    #[must_use]
    pub fn in_list<T: ToSqlValue>(self, values: Vec<T>) -> Expr {
        Expr::InList {
            expr: Box::new(Expr::Column(self)),
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            negated: false,
        }
    }

    /// Creates a NOT IN expression.
    #[must_use]
    pub fn not_in_list<T: ToSqlValue>(self, values: Vec<T>) -> Expr {
        Expr::InList {
            expr: Box::new(Expr::Column(self)),
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            negated: true,
        }
    }

    /// Creates an `IN (subquery)` expression.
    #[must_use]
    pub fn in_subquery(self, query: SelectQuery) -> Expr {
        Expr::InSubquery {
            expr: Box::new(Expr::Column(self)),
            query: Box::new(query),
            negated: false,
        }
    }

    /// Creates a `NOT IN (subquery)` expression.
    #[must_use]
    pub fn not_in_subquery(self, query: SelectQuery) -> Expr {
        Expr::InSubquery {
            expr: Box::new(Expr::Column(self)),
            query: Box::new(query),
            negated: true,
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl BinaryOp {
    /// Returns the SQL operator text.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// True for `AND` and `OR`.
    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// A predicate or scalar expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference.
    Column(Column),
    /// Bound value (a placeholder in compiled text).
    Value(SqlValue),
    /// Binary operation.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// `NOT expr`.
    Not(Box<Expr>),
    /// `expr IS [NOT] NULL`.
    IsNull {
        /// Operand.
        expr: Box<Expr>,
        /// `IS NOT NULL` when true.
        negated: bool,
    },
    /// `expr [NOT] BETWEEN low AND high`.
    Between {
        /// Operand.
        expr: Box<Expr>,
        /// Lower bound.
        low: SqlValue,
        /// Upper bound.
        high: SqlValue,
        /// `NOT BETWEEN` when true.
        negated: bool,
    },
    /// `expr [NOT] IN (?, ...)`.
    InList {
        /// Operand.
        expr: Box<Expr>,
        /// Listed values.
        values: Vec<SqlValue>,
        /// `NOT IN` when true.
        negated: bool,
    },
    /// `expr [NOT] IN (SELECT ...)`.
    InSubquery {
        /// Operand.
        expr: Box<Expr>,
        /// Subquery.
        query: Box<SelectQuery>,
        /// `NOT IN` when true.
        negated: bool,
    },
    /// `[NOT] EXISTS (SELECT ...)`.
    Exists {
        /// Subquery.
        query: Box<SelectQuery>,
        /// `NOT EXISTS` when true.
        negated: bool,
    },
    /// Parenthesized group.
    Nested(Box<Expr>),
    /// Raw SQL fragment with its own bound parameters, emitted verbatim.
    Raw {
        /// SQL text, containing one `?` per parameter.
        sql: String,
        /// Parameters in placeholder order.
        params: Vec<SqlValue>,
    },
}

impl Expr {
    fn binary(left: Self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates a new expression from raw SQL.
    ///
    /// **Warning**: Only use this for SQL fragments that don't contain user input.
    /// Raw fragments bypass table prefixing and identifier quoting.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw {
            sql: sql.into(),
            params: vec![],
        }
    }

    /// Creates a raw SQL fragment with bound parameters.
    #[must_use]
    pub fn raw_with_params(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self::Raw {
            sql: sql.into(),
            params,
        }
    }

    /// Creates an expression from a value (parameterized).
    #[must_use]
    pub fn value<T: ToSqlValue>(value: T) -> Self {
        Self::Value(value.to_sql_value())
    }

    /// Creates an `EXISTS (subquery)` expression.
    #[must_use]
    pub fn exists(query: SelectQuery) -> Self {
        Self::Exists {
            query: Box::new(query),
            negated: false,
        }
    }

    /// Creates a `NOT EXISTS (subquery)` expression.
    #[must_use]
    pub fn not_exists(query: SelectQuery) -> Self {
        Self::Exists {
            query: Box::new(query),
            negated: true,
        }
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::And, other)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::Or, other)
    }

    /// Creates a NOT expression.
    #[must_use]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Wraps the expression in parentheses.
    #[must_use]
    pub fn paren(self) -> Self {
        Self::Nested(Box::new(self))
    }

    /// Returns the bound values of this expression in textual order.
    #[must_use]
    pub fn params(&self) -> Vec<&SqlValue> {
        let mut out = vec![];
        self.collect_params(&mut out);
        out
    }

    fn collect_params<'a>(&'a self, out: &mut Vec<&'a SqlValue>) {
        match self {
            Self::Column(_) => {}
            Self::Value(v) => out.push(v),
            Self::Binary { left, right, .. } => {
                left.collect_params(out);
                right.collect_params(out);
            }
            Self::Not(e) | Self::Nested(e) | Self::IsNull { expr: e, .. } => e.collect_params(out),
            Self::Between {
                expr, low, high, ..
            } => {
                expr.collect_params(out);
                out.push(low);
                out.push(high);
            }
            Self::InList { expr, values, .. } => {
                expr.collect_params(out);
                out.extend(values.iter());
            }
            Self::InSubquery { expr, query, .. } => {
                expr.collect_params(out);
                out.extend(query.params());
            }
            Self::Exists { query, .. } => out.extend(query.params()),
            Self::Raw { params, .. } => out.extend(params.iter()),
        }
    }
}

impl From<Column> for Expr {
    fn from(col: Column) -> Self {
        Self::Column(col)
    }
}

impl From<SqlValue> for Expr {
    fn from(value: SqlValue) -> Self {
        Self::Value(value)
    }
}
