#![allow(dead_code)]

use std::collections::VecDeque;

use async_trait::async_trait;
use oxide_sql_core::SqlValue;
use oxide_sql_firebird::{
    BoxError, CompiledStatement, Connection, FirebirdConfig, Grammar, RawResult, Row, Session,
    VersionTag,
};

/// One call made against the mock session.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Execute(String, Vec<SqlValue>),
    GetContext(String, String),
    SetAutocommit(bool),
    Begin,
    Commit,
    Rollback,
}

/// In-memory session recording every call.
#[derive(Debug)]
pub struct MockSession {
    pub events: Vec<Event>,
    pub autocommit: bool,
    pub context: Result<Option<String>, String>,
    pub results: VecDeque<RawResult>,
    pub fail_begin: bool,
    pub fail_commit: bool,
    pub fail_rollback: bool,
    pub fail_execute: bool,
    pub fail_set_autocommit: bool,
}

impl Default for MockSession {
    fn default() -> Self {
        Self {
            events: vec![],
            autocommit: true,
            context: Ok(Some(String::from("3.0.1"))),
            results: VecDeque::new(),
            fail_begin: false,
            fail_commit: false,
            fail_rollback: false,
            fail_execute: false,
            fail_set_autocommit: false,
        }
    }
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose engine reports the given version (`None` is NULL).
    pub fn reporting(version: Option<&str>) -> Self {
        Self {
            context: Ok(version.map(String::from)),
            ..Self::default()
        }
    }

    /// Session whose context lookup fails.
    pub fn failing_context(message: &str) -> Self {
        Self {
            context: Err(message.to_string()),
            ..Self::default()
        }
    }

    pub fn push_result(&mut self, result: RawResult) {
        self.results.push_back(result);
    }

    pub fn push_rows(&mut self, rows: Vec<Row>) {
        self.push_result(RawResult::Rows(rows));
    }

    /// SQL of every executed statement, in order.
    pub fn executed(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Execute(sql, _) => Some(sql.clone()),
                _ => None,
            })
            .collect()
    }

    /// Autocommit switches, in order.
    pub fn autocommit_switches(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::SetAutocommit(on) => Some(*on),
                _ => None,
            })
            .collect()
    }

    pub fn context_lookups(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::GetContext(..)))
            .count()
    }
}

#[async_trait]
impl Session for MockSession {
    async fn execute(&mut self, statement: &CompiledStatement) -> Result<RawResult, BoxError> {
        self.events.push(Event::Execute(
            statement.sql().to_string(),
            statement.params().to_vec(),
        ));
        if self.fail_execute {
            return Err("statement failed".into());
        }
        Ok(self.results.pop_front().unwrap_or(RawResult::Affected(0)))
    }

    async fn get_context(
        &mut self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<String>, BoxError> {
        self.events
            .push(Event::GetContext(namespace.to_string(), key.to_string()));
        self.context.clone().map_err(Into::into)
    }

    async fn set_autocommit(&mut self, enabled: bool) -> Result<(), BoxError> {
        self.events.push(Event::SetAutocommit(enabled));
        if self.fail_set_autocommit {
            return Err("cannot change autocommit".into());
        }
        self.autocommit = enabled;
        Ok(())
    }

    async fn autocommit(&mut self) -> Result<bool, BoxError> {
        Ok(self.autocommit)
    }

    async fn begin(&mut self) -> Result<(), BoxError> {
        self.events.push(Event::Begin);
        if self.fail_begin {
            return Err("begin failed".into());
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), BoxError> {
        self.events.push(Event::Commit);
        if self.fail_commit {
            return Err("commit failed".into());
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), BoxError> {
        self.events.push(Event::Rollback);
        if self.fail_rollback {
            return Err("rollback failed".into());
        }
        Ok(())
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn grammar(version: VersionTag) -> Grammar {
    Grammar::new(version, "", false)
}

/// Connection pinned to a version, so no context lookup happens.
pub fn connection(version: &str) -> Connection<MockSession> {
    connection_over(MockSession::new(), version)
}

pub fn connection_over(session: MockSession, version: &str) -> Connection<MockSession> {
    init_tracing();
    Connection::new(session, FirebirdConfig::default().with_version(version)).unwrap()
}

pub fn sql_of(grammar: &Grammar, op: impl Into<oxide_sql_core::Operation>) -> String {
    grammar.compile(&op.into()).unwrap().sql().to_string()
}

