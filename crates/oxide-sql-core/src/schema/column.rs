//! Column definitions for `CREATE TABLE` and `ALTER TABLE ... ADD`.

use crate::builder::value::SqlValue;

/// Engine-neutral column type; the grammar picks the native spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Smallint,
    Integer,
    Bigint,
    Real,
    Double,
    Decimal { precision: u16, scale: u16 },
    Char(u32),
    Varchar(u32),
    /// Character data with no declared length.
    Text,
    Blob,
    Date,
    Time,
    Timestamp,
    /// Falls back to `SMALLINT` on engines without a boolean type.
    Boolean,
    /// Emitted verbatim.
    Custom(String),
}

/// Inline `REFERENCES table (column)` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub table: String,
    pub column: String,
    pub on_delete: Option<ForeignKeyAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
}

impl ForeignKeyAction {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Rendered as a literal, never bound.
    Value(SqlValue),
    /// Emitted verbatim, e.g. `CURRENT_TIMESTAMP`.
    Expression(String),
}

/// One column of a table; build it through [`ColumnBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub default: Option<DefaultValue>,
    pub primary_key: bool,
    pub unique: bool,
    /// Identity column on engines that have one, sequence plus trigger
    /// elsewhere.
    pub autoincrement: bool,
    pub references: Option<ForeignKeyRef>,
    pub check: Option<String>,
    pub collation: Option<String>,
}

impl ColumnDefinition {
    /// A nullable column with nothing else set.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
            primary_key: false,
            unique: false,
            autoincrement: false,
            references: None,
            check: None,
            collation: None,
        }
    }
}

/// Chained setters over a [`ColumnDefinition`].
#[derive(Debug, Clone)]
pub struct ColumnBuilder {
    def: ColumnDefinition,
}

impl ColumnBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            def: ColumnDefinition::new(name, data_type),
        }
    }

    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.def.nullable = false;
        self
    }

    /// Also clears `nullable`.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.def.primary_key = true;
        self.def.nullable = false;
        self
    }

    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.def.unique = true;
        self
    }

    #[must_use]
    pub const fn autoincrement(mut self) -> Self {
        self.def.autoincrement = true;
        self
    }

    #[must_use]
    pub fn default_value<T: crate::builder::ToSqlValue>(mut self, value: T) -> Self {
        self.def.default = Some(DefaultValue::Value(value.to_sql_value()));
        self
    }

    #[must_use]
    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.def.default = Some(DefaultValue::Expression(expr.into()));
        self
    }

    #[must_use]
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.def.references = Some(ForeignKeyRef {
            table: table.into(),
            column: column.into(),
            on_delete: None,
        });
        self
    }

    /// No effect unless [`references`](Self::references) was called first.
    #[must_use]
    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        if let Some(fk) = self.def.references.as_mut() {
            fk.on_delete = Some(action);
        }
        self
    }

    #[must_use]
    pub fn check(mut self, expr: impl Into<String>) -> Self {
        self.def.check = Some(expr.into());
        self
    }

    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.def.collation = Some(collation.into());
        self
    }

    #[must_use]
    pub fn build(self) -> ColumnDefinition {
        self.def
    }
}

// Shorthands for the types the Firebird grammar is exercised with; anything
// else goes through `ColumnBuilder::new`.

#[must_use]
pub fn integer(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Integer)
}

#[must_use]
pub fn bigint(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Bigint)
}

#[must_use]
pub fn varchar(name: impl Into<String>, len: u32) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Varchar(len))
}

#[must_use]
pub fn text(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Text)
}

#[must_use]
pub fn date(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Date)
}

#[must_use]
pub fn timestamp(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Timestamp)
}

#[must_use]
pub fn boolean(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Boolean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_column() {
        let col = integer("id").build();
        assert_eq!(col.name, "id");
        assert_eq!(col.data_type, DataType::Integer);
        assert!(col.nullable);
        assert!(!col.primary_key);
    }

    #[test]
    fn test_primary_key_implies_not_null() {
        let col = bigint("id").primary_key().autoincrement().build();
        assert!(!col.nullable);
        assert!(col.autoincrement);
    }

    #[test]
    fn test_on_delete_without_reference_is_ignored() {
        let col = integer("x").on_delete(ForeignKeyAction::Cascade).build();
        assert!(col.references.is_none());
    }

    #[test]
    fn test_foreign_key_reference() {
        let col = integer("user_id")
            .not_null()
            .references("users", "id")
            .on_delete(ForeignKeyAction::Cascade)
            .build();
        let fk = col.references.unwrap();
        assert_eq!(fk.table, "users");
        assert_eq!(fk.on_delete, Some(ForeignKeyAction::Cascade));
    }
}
