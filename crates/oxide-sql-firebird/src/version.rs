//! Engine version resolution.
//!
//! A connection compiles for exactly one [`VersionTag`]. It comes from
//! configuration when given, otherwise from one `ENGINE_VERSION` context
//! lookup, and never changes afterwards.

use std::fmt;

use tracing::{debug, info};

use crate::config::FirebirdConfig;
use crate::error::{Error, Result};
use crate::session::Session;

/// Context namespace holding engine information.
pub const SYSTEM_NAMESPACE: &str = "SYSTEM";
/// Context variable holding the engine version string.
pub const ENGINE_VERSION_KEY: &str = "ENGINE_VERSION";

/// Firebird major version a grammar targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionTag {
    /// Firebird 1.x.
    V1,
    /// Firebird 2.x.
    V2,
    /// Firebird 3.x.
    V3,
    /// Firebird 4.x.
    V4,
    /// Firebird 5.x.
    V5,
}

impl VersionTag {
    /// Every version the grammar knows how to target, oldest first.
    pub const ALL: [Self; 5] = [Self::V1, Self::V2, Self::V3, Self::V4, Self::V5];

    /// The version used when nothing else decides.
    pub const NEWEST: Self = Self::V5;

    /// Returns the major version number.
    #[must_use]
    pub const fn major(self) -> u32 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V3 => 3,
            Self::V4 => 4,
            Self::V5 => 5,
        }
    }

    /// Maps a major version number to a tag.
    #[must_use]
    pub const fn from_major(major: u32) -> Option<Self> {
        match major {
            1 => Some(Self::V1),
            2 => Some(Self::V2),
            3 => Some(Self::V3),
            4 => Some(Self::V4),
            5 => Some(Self::V5),
            _ => None,
        }
    }

    /// Returns the capability table for this version.
    ///
    /// This is the only place version numbers turn into grammar rules.
    #[must_use]
    pub const fn features(self) -> Features {
        match self {
            Self::V1 => Features {
                returning: false,
                execute_block: false,
                sequences: false,
                trim: false,
                default_values: false,
                boolean_type: false,
                identity_columns: false,
            },
            Self::V2 => Features {
                returning: true,
                execute_block: true,
                sequences: true,
                trim: true,
                default_values: true,
                boolean_type: false,
                identity_columns: false,
            },
            Self::V3 | Self::V4 | Self::V5 => Features {
                returning: true,
                execute_block: true,
                sequences: true,
                trim: true,
                default_values: true,
                boolean_type: true,
                identity_columns: true,
            },
        }
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major())
    }
}

/// Version-gated grammar capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Features {
    /// `RETURNING` on INSERT, UPDATE and DELETE.
    pub returning: bool,
    /// `EXECUTE BLOCK` anonymous PSQL.
    pub execute_block: bool,
    /// `CREATE SEQUENCE` and `NEXT VALUE FOR` (generators before that).
    pub sequences: bool,
    /// Built-in `TRIM`.
    pub trim: bool,
    /// `INSERT ... DEFAULT VALUES`.
    pub default_values: bool,
    /// Native `BOOLEAN` type and `TRUE`/`FALSE` literals.
    pub boolean_type: bool,
    /// `GENERATED BY DEFAULT AS IDENTITY` columns.
    pub identity_columns: bool,
}

/// Parses the leading major component of a version string (`"3.0.1"` is 3).
#[must_use]
pub fn parse_major(version: &str) -> Option<u32> {
    let version = version.trim();
    let end = version
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(version.len());
    if end == 0 {
        return None;
    }
    version[..end].parse().ok()
}

/// Decides which [`VersionTag`] a connection compiles for.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    version: Option<String>,
    engine_version: Option<String>,
    supported: Vec<VersionTag>,
}

impl VersionResolver {
    /// Creates a resolver over the full supported set.
    #[must_use]
    pub fn new(config: &FirebirdConfig) -> Self {
        Self {
            version: config.version.clone(),
            engine_version: config.engine_version.clone(),
            supported: VersionTag::ALL.to_vec(),
        }
    }

    /// Narrows the supported set.
    #[must_use]
    pub fn with_supported(mut self, supported: &[VersionTag]) -> Self {
        self.supported = supported.to_vec();
        self.supported.sort_unstable();
        self.supported.dedup();
        self
    }

    /// The supported set, oldest first.
    #[must_use]
    pub fn supported(&self) -> &[VersionTag] {
        &self.supported
    }

    /// Resolves the version from configuration alone.
    ///
    /// Returns `Ok(None)` when configuration leaves the decision to the
    /// engine. Connections call this eagerly so that a bad `version` fails
    /// before anything is compiled.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedVersion`] for a `version` (or `engine_version`)
    /// outside the supported set, [`Error::VersionDetectionFailed`] for an
    /// unparseable `engine_version`.
    pub fn configured(&self) -> Result<Option<VersionTag>> {
        if let Some(requested) = &self.version {
            let tag = self.lookup(requested, parse_major(requested))?;
            debug!(version = %tag, "Using configured Firebird version");
            return Ok(Some(tag));
        }
        if let Some(literal) = &self.engine_version {
            let tag = self.from_engine_string(literal)?;
            debug!(version = %tag, engine_version = %literal, "Using configured engine version");
            return Ok(Some(tag));
        }
        Ok(None)
    }

    /// Resolves the version, asking the engine when configuration is silent.
    ///
    /// At most one context lookup is made. An engine answering `NULL` falls
    /// back to the newest supported version.
    ///
    /// # Errors
    ///
    /// Everything [`configured`](Self::configured) raises, plus
    /// [`Error::VersionDetectionFailed`] when the lookup fails or returns an
    /// unparseable string and [`Error::UnsupportedVersion`] when the detected
    /// major version is not supported.
    pub async fn resolve<S: Session + ?Sized>(&self, session: &mut S) -> Result<VersionTag> {
        if let Some(tag) = self.configured()? {
            return Ok(tag);
        }

        let detected = session
            .get_context(SYSTEM_NAMESPACE, ENGINE_VERSION_KEY)
            .await
            .map_err(|e| Error::VersionDetectionFailed(e.to_string()))?;

        let tag = match detected {
            Some(ref literal) => self.from_engine_string(literal)?,
            None => self.default_version()?,
        };
        info!(
            version = %tag,
            engine_version = detected.as_deref().unwrap_or("NULL"),
            "Resolved Firebird dialect version"
        );
        Ok(tag)
    }

    fn from_engine_string(&self, literal: &str) -> Result<VersionTag> {
        let major = parse_major(literal).ok_or_else(|| {
            Error::VersionDetectionFailed(format!("unparseable engine version '{literal}'"))
        })?;
        self.lookup(literal, Some(major))
    }

    fn lookup(&self, requested: &str, major: Option<u32>) -> Result<VersionTag> {
        major
            .and_then(VersionTag::from_major)
            .filter(|tag| self.supported.contains(tag))
            .ok_or_else(|| self.unsupported(requested))
    }

    fn default_version(&self) -> Result<VersionTag> {
        self.supported
            .last()
            .copied()
            .ok_or_else(|| self.unsupported("default"))
    }

    fn unsupported(&self, requested: &str) -> Error {
        let supported: Vec<String> = self.supported.iter().map(ToString::to_string).collect();
        Error::UnsupportedVersion {
            requested: requested.to_string(),
            supported: supported.join(", "),
        }
    }
}
