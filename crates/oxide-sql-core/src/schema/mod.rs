//! Schema operations: tables, columns, indexes and sequences.
//!
//! Like queries, schema operations are engine-agnostic descriptions; a
//! dialect grammar turns them into DDL statements.

mod column;
mod operation;
mod table;

pub use column::{
    ColumnBuilder, ColumnDefinition, DataType, DefaultValue, ForeignKeyAction, ForeignKeyRef,
    bigint, boolean, date, integer, text, timestamp, varchar,
};
pub use operation::{
    AddColumnOp, CreateIndexOp, CreateTableOp, DropColumnOp, DropTableOp, RenameColumnOp,
    RenameTableOp, SchemaOperation, TableConstraint,
};
pub use table::{CreateTableBuilder, HasColumns, HasName, NoColumns, NoName};
