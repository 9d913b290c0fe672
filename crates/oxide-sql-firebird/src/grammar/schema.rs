//! DDL and catalog queries.

use oxide_sql_core::SqlValue;
use oxide_sql_core::builder::value::quote_literal;
use oxide_sql_core::schema::{
    ColumnDefinition, CreateIndexOp, CreateTableOp, DataType, DefaultValue, DropTableOp,
    SchemaOperation, TableConstraint,
};

use super::{CompiledStatement, Grammar};
use crate::error::{Error, Result};

impl Grammar {
    pub(super) fn compile_schema_operation(
        &self,
        operation: &SchemaOperation,
    ) -> Result<Vec<CompiledStatement>> {
        match operation {
            SchemaOperation::CreateTable(op) => Ok(self.create_table(op)),
            SchemaOperation::DropTable(op) => self.drop_table(op).map(|s| vec![s]),
            SchemaOperation::RenameTable(_) => Err(Error::UnsupportedOperation("renaming a table")),
            SchemaOperation::AddColumn(op) => {
                let mut stmts = vec![ddl(format!(
                    "ALTER TABLE {} ADD {}",
                    self.wrap_table(&op.table),
                    self.column_definition(&op.column)
                ))];
                if self.needs_trigger(&op.column) {
                    stmts.extend(self.autoincrement_statements(&op.table, &op.column.name));
                }
                Ok(stmts)
            }
            SchemaOperation::DropColumn(op) => Ok(vec![ddl(format!(
                "ALTER TABLE {} DROP {}",
                self.wrap_table(&op.table),
                self.wrap(&op.column)
            ))]),
            SchemaOperation::RenameColumn(op) => Ok(vec![ddl(format!(
                "ALTER TABLE {} ALTER COLUMN {} TO {}",
                self.wrap_table(&op.table),
                self.wrap(&op.old_name),
                self.wrap(&op.new_name)
            ))]),
            SchemaOperation::CreateIndex(op) => Ok(vec![self.create_index(op)]),
            SchemaOperation::DropIndex(name) => {
                Ok(vec![ddl(format!("DROP INDEX {}", self.wrap(name)))])
            }
            SchemaOperation::CreateSequence(name) => {
                Ok(vec![self.create_sequence(&self.wrap(name))])
            }
            SchemaOperation::DropSequence(name) => {
                let keyword = self.sequence_keyword();
                Ok(vec![ddl(format!("DROP {keyword} {}", self.wrap(name)))])
            }
            SchemaOperation::HasTable(table) => Ok(vec![CompiledStatement::new(
                "SELECT COUNT(*) FROM RDB$RELATIONS WHERE RDB$RELATION_NAME = ?",
                vec![self.relation_name(table)],
            )]),
            SchemaOperation::ColumnListing(table) => {
                // Catalog names are blank-padded CHAR; without TRIM the
                // processor strips them.
                let field = if self.features.trim {
                    "TRIM(RDB$FIELD_NAME)"
                } else {
                    "RDB$FIELD_NAME"
                };
                Ok(vec![CompiledStatement::new(
                    format!(
                        "SELECT {field} AS COLUMN_NAME FROM RDB$RELATION_FIELDS \
                         WHERE RDB$RELATION_NAME = ? ORDER BY RDB$FIELD_POSITION"
                    ),
                    vec![self.relation_name(table)],
                )])
            }
        }
    }

    /// Name of the sequence backing an auto-increment column before identity
    /// columns existed. Derived from the prefixed table name.
    #[must_use]
    pub fn autoincrement_sequence(&self, table: &str, column: &str) -> String {
        format!("{}{table}_{column}_seq", self.prefix)
    }

    fn create_table(&self, op: &CreateTableOp) -> Vec<CompiledStatement> {
        let mut defs: Vec<String> = op
            .columns
            .iter()
            .map(|c| self.column_definition(c))
            .collect();
        defs.extend(op.constraints.iter().map(|c| self.table_constraint(c)));

        let mut stmts = vec![ddl(format!(
            "CREATE TABLE {} ({})",
            self.wrap_table(&op.name),
            defs.join(", ")
        ))];
        for column in op.columns.iter().filter(|c| self.needs_trigger(c)) {
            stmts.extend(self.autoincrement_statements(&op.name, &column.name));
        }
        stmts
    }

    fn drop_table(&self, op: &DropTableOp) -> Result<CompiledStatement> {
        let table = self.wrap_table(&op.name);
        if !op.if_exists {
            return Ok(ddl(format!("DROP TABLE {table}")));
        }
        if !self.features.execute_block {
            return Err(self.unsupported("DROP TABLE IF EXISTS"));
        }
        let relation = self.stored_name(&format!("{}{}", self.prefix, op.name));
        Ok(ddl(format!(
            "EXECUTE BLOCK AS BEGIN \
             IF (EXISTS(SELECT 1 FROM RDB$RELATIONS WHERE RDB$RELATION_NAME = {})) THEN \
             EXECUTE STATEMENT {}; END",
            quote_literal(&relation),
            quote_literal(&format!("DROP TABLE {table}"))
        )))
    }

    fn create_index(&self, op: &CreateIndexOp) -> CompiledStatement {
        let unique = if op.unique { "UNIQUE " } else { "" };
        ddl(format!(
            "CREATE {unique}INDEX {} ON {} ({})",
            self.wrap(&op.name),
            self.wrap_table(&op.table),
            self.wrap_list(&op.columns)
        ))
    }

    fn create_sequence(&self, sequence: &str) -> CompiledStatement {
        ddl(format!("CREATE {} {sequence}", self.sequence_keyword()))
    }

    const fn sequence_keyword(&self) -> &'static str {
        if self.features.sequences {
            "SEQUENCE"
        } else {
            "GENERATOR"
        }
    }

    fn needs_trigger(&self, column: &ColumnDefinition) -> bool {
        column.autoincrement && !self.features.identity_columns
    }

    /// Sequence plus `BEFORE INSERT` trigger filling the column when NULL.
    fn autoincrement_statements(&self, table: &str, column: &str) -> [CompiledStatement; 2] {
        let sequence = self.wrap(&self.autoincrement_sequence(table, column));
        let trigger = self.wrap(&format!("{}{table}_{column}_bi", self.prefix));
        let column = self.wrap(column);
        [
            self.create_sequence(&sequence),
            ddl(format!(
                "CREATE TRIGGER {trigger} FOR {} ACTIVE BEFORE INSERT POSITION 0 AS BEGIN \
                 IF (NEW.{column} IS NULL) THEN NEW.{column} = {}; END",
                self.wrap_table(table),
                self.next_value_expr(&sequence)
            )),
        ]
    }

    fn column_definition(&self, column: &ColumnDefinition) -> String {
        let identity = column.autoincrement && self.features.identity_columns;
        let mut sql = format!(
            "{} {}",
            self.wrap(&column.name),
            self.type_name(&column.data_type)
        );

        if identity {
            sql.push_str(" GENERATED BY DEFAULT AS IDENTITY");
        } else if let Some(default) = &column.default {
            sql.push_str(" DEFAULT ");
            match default {
                DefaultValue::Value(v) => sql.push_str(&self.bindable(v).to_sql_inline()),
                DefaultValue::Expression(expr) => sql.push_str(expr),
            }
        }

        // Identity columns are implicitly NOT NULL.
        if !column.nullable && !identity {
            sql.push_str(" NOT NULL");
        }
        if column.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if column.unique && !column.primary_key {
            sql.push_str(" UNIQUE");
        }
        if let Some(fk) = &column.references {
            sql.push_str(&format!(
                " REFERENCES {} ({})",
                self.wrap_table(&fk.table),
                self.wrap(&fk.column)
            ));
            if let Some(action) = fk.on_delete {
                sql.push_str(" ON DELETE ");
                sql.push_str(action.as_sql());
            }
        }
        if let Some(check) = &column.check {
            sql.push_str(&format!(" CHECK ({check})"));
        }
        if let Some(collation) = &column.collation {
            sql.push_str(&format!(" COLLATE {collation}"));
        }
        sql
    }

    fn table_constraint(&self, constraint: &TableConstraint) -> String {
        let named = |name: &Option<String>| {
            name.as_ref()
                .map(|n| format!("CONSTRAINT {} ", self.wrap(n)))
                .unwrap_or_default()
        };
        match constraint {
            TableConstraint::PrimaryKey { name, columns } => {
                format!("{}PRIMARY KEY ({})", named(name), self.wrap_list(columns))
            }
            TableConstraint::Unique { name, columns } => {
                format!("{}UNIQUE ({})", named(name), self.wrap_list(columns))
            }
            TableConstraint::ForeignKey {
                name,
                columns,
                references_table,
                references_columns,
                on_delete,
            } => {
                let mut sql = format!(
                    "{}FOREIGN KEY ({}) REFERENCES {} ({})",
                    named(name),
                    self.wrap_list(columns),
                    self.wrap_table(references_table),
                    self.wrap_list(references_columns)
                );
                if let Some(action) = on_delete {
                    sql.push_str(" ON DELETE ");
                    sql.push_str(action.as_sql());
                }
                sql
            }
            TableConstraint::Check { name, expression } => {
                format!("{}CHECK ({expression})", named(name))
            }
        }
    }

    fn type_name(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::Smallint => String::from("SMALLINT"),
            DataType::Integer => String::from("INTEGER"),
            DataType::Bigint => String::from("BIGINT"),
            DataType::Real => String::from("FLOAT"),
            DataType::Double => String::from("DOUBLE PRECISION"),
            DataType::Decimal { precision, scale } => format!("DECIMAL({precision}, {scale})"),
            DataType::Char(len) => format!("CHAR({len})"),
            DataType::Varchar(len) => format!("VARCHAR({len})"),
            DataType::Text => String::from("BLOB SUB_TYPE TEXT"),
            DataType::Blob => String::from("BLOB SUB_TYPE BINARY"),
            DataType::Date => String::from("DATE"),
            DataType::Time => String::from("TIME"),
            DataType::Timestamp => String::from("TIMESTAMP"),
            DataType::Boolean if self.features.boolean_type => String::from("BOOLEAN"),
            DataType::Boolean => String::from("SMALLINT"),
            DataType::Custom(name) => name.clone(),
        }
    }

    fn relation_name(&self, table: &str) -> SqlValue {
        SqlValue::Text(self.stored_name(&format!("{}{table}", self.prefix)))
    }
}

fn ddl(sql: String) -> CompiledStatement {
    CompiledStatement::new(sql, vec![])
}
