//! # oxide-sql-core
//!
//! Engine-agnostic query and schema operations.
//!
//! This crate provides:
//! - Typestate builders for SELECT, INSERT, UPDATE and DELETE
//! - Stored procedure and function calls with ordered arguments
//! - Schema operations (tables, columns, indexes, sequences)
//!
//! Nothing here renders SQL. Dialect crates such as `oxide-sql-firebird`
//! compile an [`Operation`] into engine-specific text plus an ordered
//! parameter list.
//!
//! ## SQL Injection Prevention
//!
//! Values are never part of an operation's text. They are carried as
//! [`SqlValue`]s and bound positionally:
//!
//! ```rust
//! use oxide_sql_core::builder::{Select, SqlValue, col};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let query = Select::new()
//!     .columns(&["id"])
//!     .from("users")
//!     .where_clause(col("name").eq(user_input))
//!     .build();
//!
//! assert_eq!(query.params(), vec![&SqlValue::Text(user_input.to_string())]);
//! ```

pub mod builder;
pub mod operation;
pub mod schema;

pub use builder::{Delete, Expr, Insert, Select, SqlValue, ToSqlValue, Update, col};
pub use operation::{Operation, RoutineCall};
pub use schema::SchemaOperation;
