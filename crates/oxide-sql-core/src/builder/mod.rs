//! Fluent builders for abstract operations.
//!
//! Builders use the typestate pattern so that incomplete statements do not
//! compile. They produce engine-agnostic [`Operation`](crate::Operation)
//! values; SQL text is rendered later by a dialect grammar.
//!
//! # Example
//!
//! ```rust
//! use oxide_sql_core::builder::{Select, col};
//!
//! let query = Select::new()
//!     .columns(&["id", "name"])
//!     .from("users")
//!     .where_clause(col("active").eq(true))
//!     .limit(10)
//!     .build();
//!
//! assert_eq!(query.limit, Some(10));
//! assert_eq!(query.params().len(), 1);
//! ```

mod delete;
pub mod expr;
mod insert;
mod routine;
mod select;
mod update;
pub mod value;

pub use delete::Delete;
pub use expr::{BinaryOp, Column, Expr, col};
pub use insert::Insert;
pub use select::Select;
pub use update::Update;
pub use value::{SqlValue, ToSqlValue};
