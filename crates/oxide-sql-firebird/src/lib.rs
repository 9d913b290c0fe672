//! # oxide-sql-firebird
//!
//! Firebird dialect for `oxide-sql-core`: a version-aware SQL compiler,
//! result processing and autocommit-aware transactions over a pluggable
//! execution [`Session`].
//!
//! # How Firebird differs from other dialects
//!
//! - **[Row limiting]**: there is no `LIMIT`/`OFFSET`. Rows are limited
//!   with `FIRST n SKIP m` placed right after `SELECT` (and `DISTINCT`).
//! - **[RETURNING]**: available on INSERT, UPDATE and DELETE since
//!   Firebird 2.0, and only for statements affecting a single row.
//! - **Stored procedures**: executable procedures are called with
//!   `EXECUTE PROCEDURE name(...)`; selectable procedures are queried like
//!   tables. Functions are evaluated against the one-row `RDB$DATABASE`.
//! - **Version introspection**: the engine reports its version through
//!   [`RDB$GET_CONTEXT`]`('SYSTEM', 'ENGINE_VERSION')` (Firebird 2.1+).
//! - **Autocommit**: the session does not leave autocommit mode on its own
//!   when a transaction starts; [`Connection`] switches it explicitly.
//! - **Identity**: `GENERATED BY DEFAULT AS IDENTITY` and `BOOLEAN` exist
//!   since Firebird 3.0. Earlier versions use a sequence plus a
//!   `BEFORE INSERT` trigger, and `SMALLINT` flags.
//!
//! [Row limiting]: https://firebirdsql.org/file/documentation/html/en/refdocs/fblangref50/firebird-50-language-reference.html#fblangref50-dml-select-first-skip
//! [RETURNING]: https://firebirdsql.org/file/documentation/html/en/refdocs/fblangref50/firebird-50-language-reference.html#fblangref50-dml-insert-returning
//! [`RDB$GET_CONTEXT`]: https://firebirdsql.org/file/documentation/html/en/refdocs/fblangref50/firebird-50-language-reference.html#fblangref50-scalarfuncs-get-context
//!
//! ## Example
//!
//! ```rust
//! use oxide_sql_core::RoutineCall;
//! use oxide_sql_core::builder::{Insert, SqlValue};
//! use oxide_sql_firebird::{Error, Grammar, VersionTag};
//!
//! let grammar = Grammar::new(VersionTag::V3, "", false);
//!
//! let call = RoutineCall::new("ADD_USER").arg("alice").arg(30).procedure();
//! let stmt = grammar.compile(&call).unwrap();
//! assert_eq!(stmt.sql(), "EXECUTE PROCEDURE ADD_USER(?, ?)");
//! assert_eq!(
//!     stmt.params(),
//!     &[SqlValue::Text("alice".into()), SqlValue::Int(30)]
//! );
//!
//! // RETURNING does not exist before Firebird 2.
//! let insert = Insert::new()
//!     .into_table("users")
//!     .columns(&["name"])
//!     .values(vec!["alice"])
//!     .returning(&["id"])
//!     .build();
//! let v1 = Grammar::new(VersionTag::V1, "", false);
//! assert!(matches!(
//!     v1.compile(&insert.into()),
//!     Err(Error::UnsupportedFeatureForVersion { .. })
//! ));
//! ```

mod config;
mod connection;
mod error;
mod grammar;
mod processor;
mod session;
mod transaction;
mod version;

pub use config::FirebirdConfig;
pub use connection::Connection;
pub use error::{BoxError, Error, Result};
pub use grammar::{CompiledStatement, Grammar};
pub use processor::{NormalizedResult, OperationKind, Processor};
pub use session::{RawResult, Row, Session};
pub use transaction::{TransactionController, TransactionState};
pub use version::{
    ENGINE_VERSION_KEY, Features, SYSTEM_NAMESPACE, VersionResolver, VersionTag, parse_major,
};
