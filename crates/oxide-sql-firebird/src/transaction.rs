//! Autocommit-aware transaction nesting.
//!
//! Firebird sessions do not switch autocommit off for an explicit
//! transaction. The controller flips it off when the outermost transaction
//! begins and back on when the nesting depth returns to zero. Inner levels
//! are savepoints named `TRANS<level>`.
//!
//! Bookkeeping is only updated after the session call it depends on
//! succeeded.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::session::Session;

/// Nesting depth and the mirrored autocommit flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionState {
    depth: usize,
    autocommit: bool,
}

impl Default for TransactionState {
    fn default() -> Self {
        Self {
            depth: 0,
            autocommit: true,
        }
    }
}

impl TransactionState {
    /// Current nesting depth; 0 when no transaction is open.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Whether the session is in autocommit mode.
    #[must_use]
    pub const fn autocommit(&self) -> bool {
        self.autocommit
    }

    /// True outside any transaction.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.depth == 0
    }
}

/// Drives begin/commit/rollback against a [`Session`].
#[derive(Debug, Default)]
pub struct TransactionController {
    state: TransactionState,
}

impl TransactionController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> TransactionState {
        self.state
    }

    /// Current nesting depth.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.state.depth
    }

    /// Opens a transaction, or a savepoint when one is already open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Session`] when the session fails. The depth is left
    /// unchanged and autocommit is restored if it had been switched off.
    pub async fn begin<S: Session + ?Sized>(
        &mut self,
        session: &mut S,
        grammar: &Grammar,
    ) -> Result<()> {
        if self.state.depth > 0 {
            let level = self.state.depth + 1;
            session
                .execute(&grammar.compile_savepoint(level))
                .await
                .map_err(Error::Session)?;
            self.state.depth = level;
            debug!(depth = level, "Created transaction savepoint");
            return Ok(());
        }

        let autocommit = session.autocommit().await.map_err(Error::Session)?;
        if autocommit {
            session
                .set_autocommit(false)
                .await
                .map_err(Error::Session)?;
            debug!(autocommit = false, "Switched autocommit off");
        }

        if let Err(err) = session.begin().await {
            if autocommit {
                Self::restore_autocommit(session).await;
            }
            return Err(Error::Session(err));
        }

        self.state = TransactionState {
            depth: 1,
            autocommit: false,
        };
        debug!(depth = 1, "Began transaction");
        Ok(())
    }

    /// Commits the innermost level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveTransaction`] when idle and
    /// [`Error::Session`] when the session fails.
    pub async fn commit<S: Session + ?Sized>(
        &mut self,
        session: &mut S,
        grammar: &Grammar,
    ) -> Result<()> {
        match self.state.depth {
            0 => Err(Error::NoActiveTransaction),
            1 => {
                session.commit().await.map_err(Error::Session)?;
                self.state.depth = 0;
                debug!("Committed transaction");
                self.enable_autocommit(session).await
            }
            depth => {
                session
                    .execute(&grammar.compile_release_savepoint(depth))
                    .await
                    .map_err(Error::Session)?;
                self.state.depth = depth - 1;
                debug!(depth = depth - 1, "Released transaction savepoint");
                Ok(())
            }
        }
    }

    /// Rolls back to `to` levels of nesting (default: one level less).
    ///
    /// Rolling back to a level at or above the current depth does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Session`] when the session fails.
    pub async fn rollback<S: Session + ?Sized>(
        &mut self,
        session: &mut S,
        grammar: &Grammar,
        to: Option<usize>,
    ) -> Result<()> {
        let depth = self.state.depth;
        let Some(target) = to.or_else(|| depth.checked_sub(1)) else {
            return Ok(());
        };
        if target >= depth {
            return Ok(());
        }

        if target == 0 {
            session.rollback().await.map_err(Error::Session)?;
            self.state.depth = 0;
            debug!("Rolled back transaction");
            return self.enable_autocommit(session).await;
        }

        session
            .execute(&grammar.compile_rollback_to_savepoint(target + 1))
            .await
            .map_err(Error::Session)?;
        self.state.depth = target;
        debug!(depth = target, "Rolled back to transaction savepoint");
        Ok(())
    }

    async fn enable_autocommit<S: Session + ?Sized>(&mut self, session: &mut S) -> Result<()> {
        if self.state.autocommit {
            return Ok(());
        }
        session.set_autocommit(true).await.map_err(Error::Session)?;
        self.state.autocommit = true;
        debug!(autocommit = true, "Switched autocommit on");
        Ok(())
    }

    async fn restore_autocommit<S: Session + ?Sized>(session: &mut S) {
        if let Err(err) = session.set_autocommit(true).await {
            warn!(error = %err, "Failed to restore autocommit after failed begin");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_state() {
        let controller = TransactionController::new();
        assert!(controller.state().is_idle());
        assert!(controller.state().autocommit());
        assert_eq!(controller.level(), 0);
    }
}
