//! Commit identifiers and commit-listing output

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Length of the hash embedded in a `-git-` suffix.
pub const HASH_SUFFIX_LEN: usize = 40;

/// Newtype for a commit hash (40 hex chars for SHA-1 repositories, 64 for
/// SHA-256 ones).
///
/// Validated on construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitHash(String);

impl CommitHash {
    /// Create a validated `CommitHash`.
    ///
    /// # Errors
    ///
    /// Returns an error string if `s` is not 40 or 64 ASCII hex characters.
    pub fn validated(s: &str) -> Result<Self, String> {
        if matches!(s.len(), 40 | 64) && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(format!(
                "Invalid commit hash: expected 40 or 64 hex chars, got '{s}'"
            ))
        }
    }

    /// Return the inner hex string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leading `HASH_SUFFIX_LEN` characters, as used in `-git-` suffixes.
    pub fn suffix_form(&self) -> &str {
        self.0.get(..HASH_SUFFIX_LEN).unwrap_or(&self.0)
    }
}

impl<'de> Deserialize<'de> for CommitHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::validated(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a development suffix identifies the source state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuffixMode {
    /// `-r<N>`, N being the number of commits reachable from HEAD.
    #[default]
    Count,
    /// `-git-<hash>`, the hash of HEAD.
    Hash,
}

/// Parsed output of a commit-listing query (`git rev-list HEAD`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitLog {
    /// Number of newline-terminated entries.
    pub count: usize,
    /// First entry, when it is a well-formed hash.
    pub head: Option<CommitHash>,
}

impl CommitLog {
    /// Parse raw listing output, one commit per line, newest first.
    ///
    /// Only newline-terminated entries are counted; a trailing fragment
    /// without a line ending is ignored for the count.
    pub fn parse(output: &str) -> Self {
        let count = output.matches('\n').count();
        let head = output
            .lines()
            .next()
            .and_then(|line| CommitHash::validated(line.trim()).ok());
        Self { count, head }
    }
}
