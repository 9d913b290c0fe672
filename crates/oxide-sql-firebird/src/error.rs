//! Error types for the Firebird dialect layer.

use crate::version::VersionTag;

/// Boxed error produced by a [`Session`](crate::Session) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while resolving versions, compiling operations, shaping
/// results or driving transactions.
///
/// Everything except [`Error::Session`] is detected before any SQL reaches
/// the engine, so a caller can tell an operation that is invalid for the
/// engine version apart from one the engine rejected.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured or detected version is not in the supported set.
    #[error("unsupported Firebird version '{requested}' (supported: {supported})")]
    UnsupportedVersion {
        /// The version as given or detected.
        requested: String,
        /// The supported set, for the message.
        supported: String,
    },

    /// The engine version could not be read or parsed.
    #[error("failed to detect Firebird engine version: {0}")]
    VersionDetectionFailed(String),

    /// The operation needs a capability the resolved version lacks.
    #[error("{feature} is not supported by Firebird {version}")]
    UnsupportedFeatureForVersion {
        /// Name of the missing capability.
        feature: &'static str,
        /// Version the operation was compiled for.
        version: VersionTag,
    },

    /// Firebird has no syntax for this operation at any version.
    #[error("{0} is not supported by Firebird")]
    UnsupportedOperation(&'static str),

    /// Compiled placeholders and parameters disagree. Indicates a grammar bug.
    #[error("placeholder mismatch: {placeholders} placeholders but {params} parameters")]
    PlaceholderMismatch {
        /// Placeholders found in the compiled text.
        placeholders: usize,
        /// Parameters collected.
        params: usize,
    },

    /// The abstract operation is structurally invalid.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Commit or release without an open transaction.
    #[error("no active transaction")]
    NoActiveTransaction,

    /// The raw result does not have the shape the operation implies.
    #[error("unexpected result: {0}")]
    UnexpectedResult(String),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Failure reported by the execution collaborator, passed through as is.
    #[error(transparent)]
    Session(BoxError),
}

impl Error {
    /// Wraps an execution-collaborator error.
    pub fn session(err: impl Into<BoxError>) -> Self {
        Self::Session(err.into())
    }
}

/// Result type alias for Firebird dialect operations.
pub type Result<T> = std::result::Result<T, Error>;
