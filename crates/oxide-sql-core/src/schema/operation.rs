//! DDL descriptions handed to a dialect grammar.

use super::column::{ColumnDefinition, ForeignKeyAction};

/// A schema change or catalog lookup.
///
/// Names are given unprefixed; the grammar applies the connection's table
/// prefix when it renders the statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOperation {
    CreateTable(CreateTableOp),
    DropTable(DropTableOp),
    RenameTable(RenameTableOp),
    AddColumn(AddColumnOp),
    DropColumn(DropColumnOp),
    RenameColumn(RenameColumnOp),
    CreateIndex(CreateIndexOp),
    /// Index name.
    DropIndex(String),
    /// Sequence (generator) name.
    CreateSequence(String),
    /// Sequence (generator) name.
    DropSequence(String),
    /// Yields a single `COUNT` row for the named table.
    HasTable(String),
    /// Yields one `COLUMN_NAME` row per column of the named table.
    ColumnListing(String),
}

impl SchemaOperation {
    #[must_use]
    pub fn rename_table(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::RenameTable(RenameTableOp {
            old_name: from.into(),
            new_name: to.into(),
        })
    }

    #[must_use]
    pub fn add_column(table: impl Into<String>, column: ColumnDefinition) -> Self {
        Self::AddColumn(AddColumnOp {
            table: table.into(),
            column,
        })
    }

    #[must_use]
    pub fn drop_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::DropColumn(DropColumnOp {
            table: table.into(),
            column: column.into(),
        })
    }

    #[must_use]
    pub fn rename_column(
        table: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self::RenameColumn(RenameColumnOp {
            table: table.into(),
            old_name: from.into(),
            new_name: to.into(),
        })
    }
}

macro_rules! into_schema_operation {
    ($($op:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$op> for SchemaOperation {
                fn from(op: $op) -> Self {
                    Self::$variant(op)
                }
            }
        )*
    };
}

into_schema_operation! {
    CreateTableOp => CreateTable,
    DropTableOp => DropTable,
    CreateIndexOp => CreateIndex,
}

/// Output of [`CreateTableBuilder`](super::CreateTableBuilder).
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableOp {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    pub constraints: Vec<TableConstraint>,
}

/// A constraint spanning one or more columns, rendered after the column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableConstraint {
    PrimaryKey {
        name: Option<String>,
        columns: Vec<String>,
    },
    Unique {
        name: Option<String>,
        columns: Vec<String>,
    },
    ForeignKey {
        name: Option<String>,
        columns: Vec<String>,
        references_table: String,
        references_columns: Vec<String>,
        on_delete: Option<ForeignKeyAction>,
    },
    /// `expression` is emitted verbatim inside `CHECK (...)`.
    Check {
        name: Option<String>,
        expression: String,
    },
}

/// `DROP TABLE`, optionally tolerating a missing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTableOp {
    pub name: String,
    pub if_exists: bool,
}

impl DropTableOp {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            if_exists: false,
        }
    }

    /// Skip the drop when the table is absent instead of failing.
    #[must_use]
    pub const fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameTableOp {
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddColumnOp {
    pub table: String,
    pub column: ColumnDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropColumnOp {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameColumnOp {
    pub table: String,
    pub old_name: String,
    pub new_name: String,
}

/// `CREATE [UNIQUE] INDEX name ON table (columns...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIndexOp {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl CreateIndexOp {
    #[must_use]
    pub fn new(name: impl Into<String>, table: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: columns.iter().map(ToString::to_string).collect(),
            unique: false,
        }
    }

    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}
