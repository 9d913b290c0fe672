//! Connection facade.
//!
//! A [`Connection`] owns one [`Session`] and composes the version resolver,
//! grammar, processor and transaction controller around it. Methods take
//! `&mut self`: a connection serves one caller at a time.

use oxide_sql_core::operation::{DeleteQuery, InsertQuery, SelectQuery, UpdateQuery};
use oxide_sql_core::schema::SchemaOperation;
use oxide_sql_core::{Operation, RoutineCall, SqlValue};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::FirebirdConfig;
use crate::error::{Error, Result};
use crate::grammar::{CompiledStatement, Grammar};
use crate::processor::{NormalizedResult, OperationKind, Processor};
use crate::session::{RawResult, Row, Session};
use crate::transaction::{TransactionController, TransactionState};
use crate::version::{VersionResolver, VersionTag};

/// A Firebird connection over an execution session.
pub struct Connection<S: Session> {
    session: S,
    config: FirebirdConfig,
    resolver: VersionResolver,
    version: OnceCell<VersionTag>,
    transactions: TransactionController,
}

impl<S: Session> Connection<S> {
    /// Creates a connection supporting every known version.
    ///
    /// A configured `version` is validated here, before anything is
    /// compiled. Without one, the engine is asked on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] or
    /// [`Error::VersionDetectionFailed`] for bad version configuration.
    pub fn new(session: S, config: FirebirdConfig) -> Result<Self> {
        let resolver = VersionResolver::new(&config);
        Self::with_resolver(session, config, resolver)
    }

    /// Creates a connection restricted to a set of versions.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_supported(
        session: S,
        config: FirebirdConfig,
        supported: &[VersionTag],
    ) -> Result<Self> {
        let resolver = VersionResolver::new(&config).with_supported(supported);
        Self::with_resolver(session, config, resolver)
    }

    fn with_resolver(
        session: S,
        config: FirebirdConfig,
        resolver: VersionResolver,
    ) -> Result<Self> {
        let version = OnceCell::new_with(resolver.configured()?);
        Ok(Self {
            session,
            config,
            resolver,
            version,
            transactions: TransactionController::new(),
        })
    }

    /// Resolved engine version; detected once, then cached.
    ///
    /// # Errors
    ///
    /// Returns the resolver's errors on the first (failed) resolution.
    pub async fn version(&mut self) -> Result<VersionTag> {
        let Self {
            session,
            resolver,
            version,
            ..
        } = self;
        version
            .get_or_try_init(|| async move { resolver.resolve(session).await })
            .await
            .copied()
    }

    /// Grammar for the resolved version.
    ///
    /// # Errors
    ///
    /// See [`version`](Self::version).
    pub async fn grammar(&mut self) -> Result<Grammar> {
        let version = self.version().await?;
        Ok(Grammar::new(
            version,
            self.config.prefix.clone(),
            self.config.quote_identifiers,
        ))
    }

    /// Compiles an operation without executing it.
    ///
    /// # Errors
    ///
    /// See [`Grammar::compile`].
    pub async fn compile(&mut self, operation: &Operation) -> Result<CompiledStatement> {
        self.grammar().await?.compile(operation)
    }

    /// Compiles, executes and shapes an operation.
    ///
    /// # Errors
    ///
    /// Compile errors, [`Error::Session`] for execution failures and
    /// [`Error::UnexpectedResult`] for results of the wrong shape.
    pub async fn run(&mut self, operation: Operation) -> Result<NormalizedResult> {
        let kind = OperationKind::of(&operation);
        self.run_as(&operation, kind).await
    }

    async fn run_as(
        &mut self,
        operation: &Operation,
        kind: OperationKind,
    ) -> Result<NormalizedResult> {
        let grammar = self.grammar().await?;
        let statement = grammar.compile(operation)?;
        let raw = self.execute(&statement).await?;
        Processor::new(grammar.features()).shape(raw, kind)
    }

    async fn execute(&mut self, statement: &CompiledStatement) -> Result<RawResult> {
        self.session.execute(statement).await.map_err(Error::Session)
    }

    /// Runs a query and returns its rows.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn select(&mut self, query: SelectQuery) -> Result<Vec<Row>> {
        let result = self.run(query.into()).await?;
        rows_of(result)
    }

    /// Runs an insert and returns the number of inserted rows.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn insert(&mut self, query: InsertQuery) -> Result<u64> {
        Ok(count_of(self.run(query.into()).await?))
    }

    /// Inserts one row and returns the value of its `id_column`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedFeatureForVersion`] on versions without
    /// `RETURNING`, otherwise see [`run`](Self::run).
    pub async fn insert_get_id(
        &mut self,
        mut query: InsertQuery,
        id_column: &str,
    ) -> Result<SqlValue> {
        query.returning = vec![id_column.to_string()];
        let result = self
            .run_as(&query.into(), OperationKind::InsertGetId)
            .await?;
        result
            .into_value()
            .ok_or_else(|| Error::UnexpectedResult(String::from("insert returned no id")))
    }

    /// Runs an update and returns the number of updated rows.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn update(&mut self, query: UpdateQuery) -> Result<u64> {
        Ok(count_of(self.run(query.into()).await?))
    }

    /// Runs a delete and returns the number of deleted rows.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn delete(&mut self, query: DeleteQuery) -> Result<u64> {
        Ok(count_of(self.run(query.into()).await?))
    }

    /// `EXECUTE PROCEDURE name(args...)`; returns the output row, if any.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn execute_procedure(
        &mut self,
        name: &str,
        args: Vec<SqlValue>,
    ) -> Result<Vec<Row>> {
        let result = self.run(RoutineCall::with_args(name, args).procedure()).await?;
        rows_of(result)
    }

    /// `SELECT * FROM name(args...)`; returns every output row.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn select_procedure(
        &mut self,
        name: &str,
        args: Vec<SqlValue>,
    ) -> Result<Vec<Row>> {
        let result = self.run(RoutineCall::with_args(name, args).selectable()).await?;
        rows_of(result)
    }

    /// Calls a scalar function and returns its value.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn execute_function(
        &mut self,
        name: &str,
        args: Vec<SqlValue>,
    ) -> Result<SqlValue> {
        let rows = rows_of(self.run(RoutineCall::with_args(name, args).function()).await?)?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_values().into_iter().next())
            .unwrap_or(SqlValue::Null))
    }

    /// Fetches the next value of a sequence (a generator before Firebird 2).
    ///
    /// # Errors
    ///
    /// [`Error::UnexpectedResult`] if the engine does not return an integer,
    /// otherwise see [`run`](Self::run).
    pub async fn next_sequence_value(&mut self, sequence: &str) -> Result<i64> {
        let value = self
            .run(Operation::NextSequenceValue(sequence.to_string()))
            .await?
            .into_value()
            .unwrap_or(SqlValue::Null);
        value.as_i64().ok_or_else(|| {
            Error::UnexpectedResult(format!("sequence {sequence} returned {value:?}"))
        })
    }

    /// Executes every statement of a schema operation in order.
    ///
    /// # Errors
    ///
    /// Compile errors, or the first [`Error::Session`] failure; statements
    /// after a failing one are not executed.
    pub async fn schema(&mut self, operation: &SchemaOperation) -> Result<()> {
        let statements = self.grammar().await?.compile_schema(operation)?;
        debug!(statements = statements.len(), "Running schema operation");
        for statement in &statements {
            self.execute(statement).await?;
        }
        Ok(())
    }

    /// Returns true if the (prefixed) table exists.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn has_table(&mut self, table: &str) -> Result<bool> {
        let (grammar, raw) = self
            .catalog(&SchemaOperation::HasTable(table.to_string()))
            .await?;
        Processor::new(grammar.features()).has_table(raw)
    }

    /// Lists the columns of a (prefixed) table in position order.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn column_listing(&mut self, table: &str) -> Result<Vec<String>> {
        let (grammar, raw) = self
            .catalog(&SchemaOperation::ColumnListing(table.to_string()))
            .await?;
        Processor::new(grammar.features()).column_listing(raw)
    }

    async fn catalog(&mut self, operation: &SchemaOperation) -> Result<(Grammar, RawResult)> {
        let grammar = self.grammar().await?;
        let statements = grammar.compile_schema(operation)?;
        let statement = statements
            .first()
            .ok_or_else(|| Error::InvalidOperation(String::from("empty catalog query")))?;
        let raw = self.execute(statement).await?;
        Ok((grammar, raw))
    }

    /// Starts a transaction or nested savepoint.
    ///
    /// # Errors
    ///
    /// See [`TransactionController::begin`].
    pub async fn begin(&mut self) -> Result<()> {
        let grammar = self.grammar().await?;
        self.transactions.begin(&mut self.session, &grammar).await
    }

    /// Commits the innermost transaction level.
    ///
    /// # Errors
    ///
    /// See [`TransactionController::commit`].
    pub async fn commit(&mut self) -> Result<()> {
        let grammar = self.grammar().await?;
        self.transactions.commit(&mut self.session, &grammar).await
    }

    /// Rolls back to a nesting level (default: one level less).
    ///
    /// # Errors
    ///
    /// See [`TransactionController::rollback`].
    pub async fn rollback(&mut self, to: Option<usize>) -> Result<()> {
        let grammar = self.grammar().await?;
        self.transactions
            .rollback(&mut self.session, &grammar, to)
            .await
    }

    /// Current transaction nesting depth.
    #[must_use]
    pub const fn transaction_level(&self) -> usize {
        self.transactions.level()
    }

    /// Current transaction state.
    #[must_use]
    pub const fn transaction_state(&self) -> TransactionState {
        self.transactions.state()
    }

    /// The configuration this connection was created with.
    #[must_use]
    pub const fn config(&self) -> &FirebirdConfig {
        &self.config
    }

    /// Borrows the underlying session.
    #[must_use]
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// Consumes the connection, returning the session.
    #[must_use]
    pub fn into_session(self) -> S {
        self.session
    }
}

fn rows_of(result: NormalizedResult) -> Result<Vec<Row>> {
    match result {
        NormalizedResult::Rows(rows) | NormalizedResult::Records(rows) => Ok(rows),
        other => Err(Error::UnexpectedResult(format!("expected rows, got {other:?}"))),
    }
}

fn count_of(result: NormalizedResult) -> u64 {
    match result {
        NormalizedResult::Affected(n) => n,
        NormalizedResult::Rows(rows) | NormalizedResult::Records(rows) => {
            u64::try_from(rows.len()).unwrap_or(u64::MAX)
        }
        NormalizedResult::LastInsertId(_) | NormalizedResult::Scalar(_) => 1,
    }
}
