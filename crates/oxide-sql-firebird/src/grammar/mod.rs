//! Firebird SQL compiler.
//!
//! A [`Grammar`] is bound to one [`VersionTag`] and turns abstract operations
//! into SQL text plus an ordered parameter list. Compilation is a pure
//! function of its inputs: no I/O, no shared mutable state.

mod query;
mod schema;

use oxide_sql_core::schema::SchemaOperation;
use oxide_sql_core::{Operation, SqlValue};
use tracing::debug;

use crate::error::{Error, Result};
use crate::version::{Features, VersionTag};

/// Compiled SQL text and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    sql: String,
    params: Vec<SqlValue>,
}

impl CompiledStatement {
    /// Creates a statement from text and parameters.
    #[must_use]
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// SQL text with `?` placeholders.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameters in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Counts the `?` placeholders outside quoted literals and identifiers.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        let mut in_string = false;
        let mut in_ident = false;
        for c in self.sql.chars() {
            match c {
                '\'' if !in_ident => in_string = !in_string,
                '"' if !in_string => in_ident = !in_ident,
                '?' if !in_string && !in_ident => count += 1,
                _ => {}
            }
        }
        count
    }

    /// Checks that every placeholder has exactly one parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlaceholderMismatch`] when the counts differ.
    pub fn verify(&self) -> Result<()> {
        let placeholders = self.placeholder_count();
        if placeholders == self.params.len() {
            Ok(())
        } else {
            Err(Error::PlaceholderMismatch {
                placeholders,
                params: self.params.len(),
            })
        }
    }
}

/// Accumulates SQL text and parameters side by side.
///
/// Placeholders are only ever written through [`bind`](Self::bind), which
/// keeps text and parameter order aligned.
#[derive(Debug, Default)]
struct SqlWriter {
    sql: String,
    params: Vec<SqlValue>,
}

impl SqlWriter {
    fn push(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    fn bind(&mut self, value: SqlValue) {
        self.sql.push('?');
        self.params.push(value);
    }

    fn finish(self) -> CompiledStatement {
        CompiledStatement {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Dialect compiler for one Firebird version.
///
/// # Example
///
/// ```rust
/// use oxide_sql_core::builder::{Select, col};
/// use oxide_sql_firebird::{Grammar, VersionTag};
///
/// let grammar = Grammar::new(VersionTag::V3, "", false);
/// let query = Select::new()
///     .columns(&["id", "name"])
///     .from("users")
///     .where_clause(col("active").eq(true))
///     .limit(10)
///     .offset(20)
///     .build();
///
/// let stmt = grammar.compile(&query.into()).unwrap();
/// assert_eq!(
///     stmt.sql(),
///     "SELECT FIRST 10 SKIP 20 id, name FROM users WHERE active = ?"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    version: VersionTag,
    features: Features,
    prefix: String,
    quote: bool,
}

impl Grammar {
    /// Creates a grammar for a version.
    #[must_use]
    pub fn new(version: VersionTag, prefix: impl Into<String>, quote: bool) -> Self {
        Self {
            version,
            features: version.features(),
            prefix: prefix.into(),
            quote,
        }
    }

    /// Creates a grammar from a major version number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] for a major version no grammar
    /// exists for.
    pub fn for_major(major: u32, prefix: impl Into<String>, quote: bool) -> Result<Self> {
        let version = VersionTag::from_major(major).ok_or_else(|| Error::UnsupportedVersion {
            requested: major.to_string(),
            supported: VersionTag::ALL
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })?;
        Ok(Self::new(version, prefix, quote))
    }

    /// The version this grammar compiles for.
    #[must_use]
    pub const fn version(&self) -> VersionTag {
        self.version
    }

    /// The capability table in effect.
    #[must_use]
    pub const fn features(&self) -> Features {
        self.features
    }

    /// The table prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Compiles a query, write, routine or sequence operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFeatureForVersion`] when the operation
    /// needs a clause this version lacks, [`Error::InvalidOperation`] for
    /// structurally invalid operations, and [`Error::PlaceholderMismatch`]
    /// if text and parameters ever disagree.
    pub fn compile(&self, operation: &Operation) -> Result<CompiledStatement> {
        let mut w = SqlWriter::default();
        match operation {
            Operation::Select(q) => self.compile_select(q, &mut w),
            Operation::Insert(q) => self.compile_insert(q, &mut w)?,
            Operation::Update(q) => self.compile_update(q, &mut w)?,
            Operation::Delete(q) => self.compile_delete(q, &mut w)?,
            Operation::Procedure(call) => self.compile_procedure(call, &mut w),
            Operation::SelectProcedure(call) => self.compile_select_procedure(call, &mut w),
            Operation::Function(call) => self.compile_function(call, &mut w),
            Operation::NextSequenceValue(name) => self.compile_next_sequence_value(name, &mut w),
        }
        self.checked(w.finish())
    }

    /// Compiles a schema operation.
    ///
    /// Most operations produce one statement. Auto-increment columns on
    /// versions without identity columns also produce the backing sequence
    /// and trigger, in execution order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOperation`] for operations Firebird has no
    /// syntax for and [`Error::UnsupportedFeatureForVersion`] for operations
    /// this version cannot express.
    pub fn compile_schema(&self, operation: &SchemaOperation) -> Result<Vec<CompiledStatement>> {
        self.compile_schema_operation(operation)?
            .into_iter()
            .map(|stmt| self.checked(stmt))
            .collect()
    }

    /// `SAVEPOINT TRANS<level>`.
    #[must_use]
    pub fn compile_savepoint(&self, level: usize) -> CompiledStatement {
        CompiledStatement::new(format!("SAVEPOINT {}", savepoint_name(level)), vec![])
    }

    /// `ROLLBACK TO SAVEPOINT TRANS<level>`.
    #[must_use]
    pub fn compile_rollback_to_savepoint(&self, level: usize) -> CompiledStatement {
        CompiledStatement::new(
            format!("ROLLBACK TO SAVEPOINT {}", savepoint_name(level)),
            vec![],
        )
    }

    /// `RELEASE SAVEPOINT TRANS<level> [ONLY]`.
    ///
    /// `ONLY` keeps later savepoints alive; Firebird 1.x does not know it.
    #[must_use]
    pub fn compile_release_savepoint(&self, level: usize) -> CompiledStatement {
        let only = if self.version >= VersionTag::V2 {
            " ONLY"
        } else {
            ""
        };
        CompiledStatement::new(
            format!("RELEASE SAVEPOINT {}{only}", savepoint_name(level)),
            vec![],
        )
    }

    fn checked(&self, stmt: CompiledStatement) -> Result<CompiledStatement> {
        stmt.verify()?;
        debug!(
            sql = %stmt.sql,
            params = stmt.params.len(),
            version = %self.version,
            "Compiled Firebird statement"
        );
        Ok(stmt)
    }

    fn unsupported(&self, feature: &'static str) -> Error {
        Error::UnsupportedFeatureForVersion {
            feature,
            version: self.version,
        }
    }

    /// Quotes an identifier when quoting is enabled.
    #[must_use]
    pub fn wrap(&self, ident: &str) -> String {
        if ident == "*" || !self.quote {
            return ident.to_string();
        }
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    /// Prefixes and quotes a table name (or table alias).
    #[must_use]
    pub fn wrap_table(&self, table: &str) -> String {
        self.wrap(&format!("{}{table}", self.prefix))
    }

    fn wrap_list(&self, idents: &[String]) -> String {
        idents
            .iter()
            .map(|i| self.wrap(i))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Converts a value for binding under this version.
    ///
    /// Versions without a native boolean store flags as `SMALLINT` 1/0.
    fn bindable(&self, value: &SqlValue) -> SqlValue {
        match value {
            SqlValue::Bool(b) if !self.features.boolean_type => SqlValue::Int(i64::from(*b)),
            other => other.clone(),
        }
    }

    /// Next-value expression for an already wrapped sequence name.
    fn next_value_expr(&self, sequence: &str) -> String {
        if self.features.sequences {
            format!("NEXT VALUE FOR {sequence}")
        } else {
            format!("GEN_ID({sequence}, 1)")
        }
    }

    /// Name the engine stores for an identifier: unquoted names are folded
    /// to upper case.
    fn stored_name(&self, ident: &str) -> String {
        if self.quote {
            ident.to_string()
        } else {
            ident.to_ascii_uppercase()
        }
    }
}

fn savepoint_name(level: usize) -> String {
    format!("TRANS{level}")
}
