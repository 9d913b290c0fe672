//! Query, write and routine compilation.

use oxide_sql_core::SqlValue;
use oxide_sql_core::builder::{BinaryOp, Column, Expr};
use oxide_sql_core::operation::{
    DeleteQuery, Direction, InsertQuery, RoutineCall, SelectItem, SelectQuery, TableRef,
    UpdateQuery,
};

use super::{Grammar, SqlWriter};
use crate::error::{Error, Result};

/// Firebird's single-row system table.
pub(crate) const DUAL: &str = "RDB$DATABASE";

impl Grammar {
    pub(super) fn compile_select(&self, q: &SelectQuery, w: &mut SqlWriter) {
        w.push("SELECT ");
        if q.distinct {
            w.push("DISTINCT ");
        }
        // FIRST/SKIP sit right after SELECT (and DISTINCT); no LIMIT clause.
        if let Some(limit) = q.limit {
            w.push(&format!("FIRST {limit} "));
            if let Some(offset) = q.offset.filter(|&n| n > 0) {
                w.push(&format!("SKIP {offset} "));
            }
        }
        w.push(&self.select_list(&q.columns));
        w.push(" FROM ");
        w.push(&self.table_ref(&q.from));

        for join in &q.joins {
            w.push(" ");
            w.push(join.kind.as_sql());
            w.push(" ");
            w.push(&self.table_ref(&join.table));
            if let Some(on) = &join.on {
                w.push(" ON ");
                self.compile_expr(on, w);
            }
        }

        if let Some(expr) = &q.where_clause {
            w.push(" WHERE ");
            self.compile_expr(expr, w);
        }

        if !q.group_by.is_empty() {
            let cols: Vec<String> = q.group_by.iter().map(|c| self.wrap_column(c)).collect();
            w.push(" GROUP BY ");
            w.push(&cols.join(", "));
        }

        if let Some(expr) = &q.having {
            w.push(" HAVING ");
            self.compile_expr(expr, w);
        }

        if !q.order_by.is_empty() {
            let cols: Vec<String> = q
                .order_by
                .iter()
                .map(|o| {
                    let dir = match o.direction {
                        Direction::Asc => "ASC",
                        Direction::Desc => "DESC",
                    };
                    format!("{} {dir}", self.wrap_column(&o.column))
                })
                .collect();
            w.push(" ORDER BY ");
            w.push(&cols.join(", "));
        }
    }

    pub(super) fn compile_insert(&self, q: &InsertQuery, w: &mut SqlWriter) -> Result<()> {
        self.check_returning(&q.returning)?;
        let table = self.wrap_table(&q.table.name);

        if q.rows.is_empty() {
            if !self.features.default_values {
                return Err(self.unsupported("INSERT ... DEFAULT VALUES"));
            }
            w.push(&format!("INSERT INTO {table} DEFAULT VALUES"));
            self.push_returning(&q.returning, w);
            return Ok(());
        }

        let width = if q.columns.is_empty() {
            q.rows.first().map_or(0, Vec::len)
        } else {
            q.columns.len()
        };
        if width == 0 {
            return Err(Error::InvalidOperation(String::from(
                "insert row has no values",
            )));
        }
        if let Some(row) = q.rows.iter().find(|row| row.len() != width) {
            return Err(Error::InvalidOperation(format!(
                "insert row has {} values but {width} columns",
                row.len()
            )));
        }
        if q.rows.len() > 1 && !q.returning.is_empty() {
            return Err(Error::InvalidOperation(String::from(
                "RETURNING is only available for single-row inserts",
            )));
        }

        w.push(&format!("INSERT INTO {table}"));
        if !q.columns.is_empty() {
            w.push(&format!(" ({})", self.wrap_list(&q.columns)));
        }

        if let [row] = q.rows.as_slice() {
            w.push(" VALUES (");
            self.bind_list(row, w);
            w.push(")");
        } else {
            // No multi-row VALUES: one single-row SELECT per row.
            for (i, row) in q.rows.iter().enumerate() {
                w.push(if i == 0 { " SELECT " } else { " UNION ALL SELECT " });
                self.bind_list(row, w);
                w.push(&format!(" FROM {DUAL}"));
            }
        }

        self.push_returning(&q.returning, w);
        Ok(())
    }

    pub(super) fn compile_update(&self, q: &UpdateQuery, w: &mut SqlWriter) -> Result<()> {
        self.check_returning(&q.returning)?;
        if q.assignments.is_empty() {
            return Err(Error::InvalidOperation(String::from(
                "update has no assignments",
            )));
        }

        w.push("UPDATE ");
        w.push(&self.table_ref(&q.table));
        w.push(" SET ");
        for (i, (column, value)) in q.assignments.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push(&self.wrap(column));
            w.push(" = ");
            w.bind(self.bindable(value));
        }

        if let Some(expr) = &q.where_clause {
            w.push(" WHERE ");
            self.compile_expr(expr, w);
        }

        self.push_returning(&q.returning, w);
        Ok(())
    }

    pub(super) fn compile_delete(&self, q: &DeleteQuery, w: &mut SqlWriter) -> Result<()> {
        self.check_returning(&q.returning)?;

        w.push("DELETE FROM ");
        w.push(&self.table_ref(&q.table));

        if let Some(expr) = &q.where_clause {
            w.push(" WHERE ");
            self.compile_expr(expr, w);
        }

        self.push_returning(&q.returning, w);
        Ok(())
    }

    pub(super) fn compile_procedure(&self, call: &RoutineCall, w: &mut SqlWriter) {
        w.push("EXECUTE PROCEDURE ");
        w.push(&self.wrap(&call.name));
        if !call.args.is_empty() {
            w.push("(");
            self.bind_list(&call.args, w);
            w.push(")");
        }
    }

    pub(super) fn compile_select_procedure(&self, call: &RoutineCall, w: &mut SqlWriter) {
        w.push("SELECT * FROM ");
        w.push(&self.wrap(&call.name));
        if !call.args.is_empty() {
            w.push("(");
            self.bind_list(&call.args, w);
            w.push(")");
        }
    }

    pub(super) fn compile_function(&self, call: &RoutineCall, w: &mut SqlWriter) {
        w.push("SELECT ");
        w.push(&self.wrap(&call.name));
        w.push("(");
        self.bind_list(&call.args, w);
        w.push(&format!(") AS VAL FROM {DUAL}"));
    }

    pub(super) fn compile_next_sequence_value(&self, name: &str, w: &mut SqlWriter) {
        w.push(&format!(
            "SELECT {} FROM {DUAL}",
            self.next_value_expr(&self.wrap(name))
        ));
    }

    fn compile_expr(&self, expr: &Expr, w: &mut SqlWriter) {
        match expr {
            Expr::Column(c) => w.push(&self.wrap_column(c)),
            Expr::Value(v) => w.bind(self.bindable(v)),
            Expr::Binary { left, op, right } => {
                self.compile_operand(left, *op, w);
                w.push(" ");
                w.push(op.as_sql());
                w.push(" ");
                self.compile_operand(right, *op, w);
            }
            Expr::Not(inner) => {
                w.push("NOT ");
                let compound = matches!(inner.as_ref(), Expr::Binary { op, .. } if op.is_logical());
                self.compile_grouped(inner, compound, w);
            }
            Expr::IsNull { expr, negated } => {
                self.compile_expr(expr, w);
                w.push(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                self.compile_expr(expr, w);
                w.push(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                w.bind(self.bindable(low));
                w.push(" AND ");
                w.bind(self.bindable(high));
            }
            Expr::InList {
                expr,
                values,
                negated,
            } => {
                if values.is_empty() {
                    // `IN ()` is a syntax error; an empty list matches nothing.
                    w.push(if *negated { "1 = 1" } else { "1 = 0" });
                    return;
                }
                self.compile_expr(expr, w);
                w.push(if *negated { " NOT IN (" } else { " IN (" });
                self.bind_list(values, w);
                w.push(")");
            }
            Expr::InSubquery {
                expr,
                query,
                negated,
            } => {
                self.compile_expr(expr, w);
                w.push(if *negated { " NOT IN (" } else { " IN (" });
                self.compile_select(query, w);
                w.push(")");
            }
            Expr::Exists { query, negated } => {
                w.push(if *negated { "NOT EXISTS (" } else { "EXISTS (" });
                self.compile_select(query, w);
                w.push(")");
            }
            Expr::Nested(inner) => {
                w.push("(");
                self.compile_expr(inner, w);
                w.push(")");
            }
            Expr::Raw { sql, params } => {
                w.push(sql);
                w.params.extend(params.iter().map(|v| self.bindable(v)));
            }
        }
    }

    /// SQL binds `AND` tighter than `OR`, so the tree's grouping has to be
    /// spelled out wherever the two meet or a logical operand sits under a
    /// comparison.
    fn compile_operand(&self, operand: &Expr, parent: BinaryOp, w: &mut SqlWriter) {
        let grouped = match operand {
            Expr::Binary { op, .. } if parent.is_logical() => op.is_logical() && *op != parent,
            Expr::Binary { .. } | Expr::Not(_) => !parent.is_logical(),
            _ => false,
        };
        self.compile_grouped(operand, grouped, w);
    }

    fn compile_grouped(&self, expr: &Expr, grouped: bool, w: &mut SqlWriter) {
        if grouped {
            w.push("(");
            self.compile_expr(expr, w);
            w.push(")");
        } else {
            self.compile_expr(expr, w);
        }
    }

    fn bind_list(&self, values: &[SqlValue], w: &mut SqlWriter) {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.bind(self.bindable(value));
        }
    }

    fn select_list(&self, items: &[SelectItem]) -> String {
        if items.is_empty() {
            return String::from("*");
        }
        items
            .iter()
            .map(|item| match item {
                SelectItem::Wildcard => String::from("*"),
                SelectItem::Column { column, alias } => match alias {
                    Some(alias) => format!("{} AS {}", self.wrap_column(column), self.wrap(alias)),
                    None => self.wrap_column(column),
                },
                SelectItem::Raw(sql) => sql.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn table_ref(&self, table: &TableRef) -> String {
        match &table.alias {
            Some(alias) => format!("{} {}", self.wrap_table(&table.name), self.wrap_table(alias)),
            None => self.wrap_table(&table.name),
        }
    }

    /// Qualifiers name a table or alias, so they carry the prefix too.
    fn wrap_column(&self, column: &Column) -> String {
        match &column.table {
            Some(table) => format!("{}.{}", self.wrap_table(table), self.wrap(&column.name)),
            None => self.wrap(&column.name),
        }
    }

    fn check_returning(&self, columns: &[String]) -> Result<()> {
        if !columns.is_empty() && !self.features.returning {
            return Err(self.unsupported("RETURNING"));
        }
        Ok(())
    }

    fn push_returning(&self, columns: &[String], w: &mut SqlWriter) {
        if !columns.is_empty() {
            w.push(" RETURNING ");
            w.push(&self.wrap_list(columns));
        }
    }
}
