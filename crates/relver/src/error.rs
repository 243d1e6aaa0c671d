//! Error types for version resolution

use thiserror::Error;

/// Errors raised while parsing or resolving a version.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VersionError {
    /// The version literal is missing a numeric field or has too many.
    #[error("Invalid version literal '{literal}': {reason}")]
    Parse {
        /// The literal as given.
        literal: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A development suffix was requested for a release build.
    #[error("revision devstring should not be used in a release version ('{0}')")]
    ReleaseBuild(String),

    /// A frozen version record could not be read back.
    #[error("Invalid frozen version record: {0}")]
    Frozen(String),
}

impl VersionError {
    pub(crate) fn parse(literal: &str, reason: impl std::fmt::Display) -> Self {
        Self::Parse {
            literal: literal.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failures of a [`RevisionSource`](crate::RevisionSource) query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The working directory is not inside a repository.
    #[error("No git repository present")]
    NoRepository,

    /// The source-control binary could not be found.
    #[error("'{0}' not found on PATH")]
    ToolMissing(String),

    /// The query ran but failed for any other reason.
    #[error("{detail}")]
    Failed {
        /// Exit status, if the process ran to completion.
        status: Option<i32>,
        /// Captured stderr or spawn error text.
        detail: String,
    },
}

impl SourceError {
    /// Whether this failure only means there is no repository. Everything
    /// else, a missing `git` binary included, is a failure worth reporting.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::NoRepository)
    }
}
