//! Type-safe CREATE TABLE builder using the typestate pattern.

use std::marker::PhantomData;

use super::column::{ColumnDefinition, ForeignKeyAction};
use super::operation::{CreateTableOp, TableConstraint};

/// Marker: table has no name set.
#[derive(Debug, Clone, Copy)]
pub struct NoName;

/// State: table has a name set.
#[derive(Debug, Clone)]
pub struct HasName(String);

/// Marker: table has no columns.
#[derive(Debug, Clone, Copy)]
pub struct NoColumns;

/// Marker: table has at least one column.
#[derive(Debug, Clone, Copy)]
pub struct HasColumns;

/// CREATE TABLE builder.
///
/// A table name and at least one column are required before `build()`.
///
/// # Example
///
/// ```rust
/// use oxide_sql_core::schema::{CreateTableBuilder, bigint, varchar};
///
/// let op = CreateTableBuilder::new()
///     .name("users")
///     .column(bigint("id").primary_key().autoincrement().build())
///     .column(varchar("username", 255).not_null().unique().build())
///     .build();
///
/// assert_eq!(op.name, "users");
/// assert_eq!(op.columns.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CreateTableBuilder<Name, Cols> {
    name: Name,
    columns: Vec<ColumnDefinition>,
    constraints: Vec<TableConstraint>,
    _state: PhantomData<Cols>,
}

impl Default for CreateTableBuilder<NoName, NoColumns> {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateTableBuilder<NoName, NoColumns> {
    /// Creates a new `CreateTableBuilder`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: NoName,
            columns: Vec::new(),
            constraints: Vec::new(),
            _state: PhantomData,
        }
    }
}

impl<Cols> CreateTableBuilder<NoName, Cols> {
    /// Sets the table name.
    #[must_use]
    pub fn name(self, name: impl Into<String>) -> CreateTableBuilder<HasName, Cols> {
        CreateTableBuilder {
            name: HasName(name.into()),
            columns: self.columns,
            constraints: self.constraints,
            _state: PhantomData,
        }
    }
}

impl<Name> CreateTableBuilder<Name, NoColumns> {
    /// Adds the first column to the table.
    #[must_use]
    pub fn column(self, column: ColumnDefinition) -> CreateTableBuilder<Name, HasColumns> {
        CreateTableBuilder {
            name: self.name,
            columns: vec![column],
            constraints: self.constraints,
            _state: PhantomData,
        }
    }
}

impl<Name> CreateTableBuilder<Name, HasColumns> {
    /// Adds another column to the table.
    #[must_use]
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }
}

impl<Cols> CreateTableBuilder<HasName, Cols> {
    /// Adds a composite primary key constraint.
    #[must_use]
    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.constraints.push(TableConstraint::PrimaryKey {
            name: None,
            columns: columns.iter().map(|&s| s.to_string()).collect(),
        });
        self
    }

    /// Adds a unique constraint on multiple columns.
    #[must_use]
    pub fn unique_constraint(mut self, columns: &[&str]) -> Self {
        self.constraints.push(TableConstraint::Unique {
            name: None,
            columns: columns.iter().map(|&s| s.to_string()).collect(),
        });
        self
    }

    /// Adds a named foreign key constraint.
    #[must_use]
    pub fn foreign_key(
        mut self,
        name: impl Into<String>,
        columns: &[&str],
        references_table: impl Into<String>,
        references_columns: &[&str],
        on_delete: Option<ForeignKeyAction>,
    ) -> Self {
        self.constraints.push(TableConstraint::ForeignKey {
            name: Some(name.into()),
            columns: columns.iter().map(|&s| s.to_string()).collect(),
            references_table: references_table.into(),
            references_columns: references_columns.iter().map(|&s| s.to_string()).collect(),
            on_delete,
        });
        self
    }

    /// Adds a check constraint.
    #[must_use]
    pub fn check_constraint(mut self, expression: impl Into<String>) -> Self {
        self.constraints.push(TableConstraint::Check {
            name: None,
            expression: expression.into(),
        });
        self
    }
}

impl CreateTableBuilder<HasName, HasColumns> {
    /// Builds the `CreateTableOp`.
    #[must_use]
    pub fn build(self) -> CreateTableOp {
        CreateTableOp {
            name: self.name.0,
            columns: self.columns,
            constraints: self.constraints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{integer, varchar};

    #[test]
    fn test_create_table_builder() {
        let op = CreateTableBuilder::new()
            .name("posts")
            .column(integer("id").primary_key().build())
            .column(varchar("title", 200).not_null().build())
            .column(integer("author_id").build())
            .foreign_key("fk_posts_author", &["author_id"], "users", &["id"], None)
            .build();

        assert_eq!(op.name, "posts");
        assert_eq!(op.columns.len(), 3);
        assert!(matches!(
            op.constraints[0],
            TableConstraint::ForeignKey { ref references_table, .. } if references_table == "users"
        ));
    }

    // This would fail to compile: no columns
    // let _ = CreateTableBuilder::new().name("empty").build();
}
