//! Version literal parsing
//!
//! Supports:
//! - Release: `1.2` or `1.2.3`
//! - Development: `0.0dev` or `1.2.3dev`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VersionError;

/// Marker that flags a literal as a development build.
pub const DEV_MARKER: &str = "dev";

/// Parsed version literal.
///
/// Built once from a literal such as `0.0dev` and never mutated; the
/// development suffix lives on [`ResolvedVersion`](crate::ResolvedVersion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDescriptor {
    /// The literal exactly as given, marker included.
    pub literal: String,
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Bugfix component, 0 when the literal has only two components.
    pub bugfix: u32,
    /// True iff the literal does not end with [`DEV_MARKER`].
    pub release: bool,
}

impl VersionDescriptor {
    /// Parse a literal like `0.0dev` or `1.2.3`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::Parse`] if major or minor is missing or not a
    /// number, if bugfix is present but not a number, or if the literal has
    /// more than three components.
    pub fn parse(literal: &str) -> Result<Self, VersionError> {
        let stripped = literal.replace(DEV_MARKER, "");
        let parts: Vec<&str> = stripped.split('.').collect();

        if parts.len() > 3 {
            return Err(VersionError::parse(
                literal,
                format!("expected at most 3 components, got {}", parts.len()),
            ));
        }

        let component = |idx: usize, name: &str| -> Result<u32, VersionError> {
            let raw = parts
                .get(idx)
                .ok_or_else(|| VersionError::parse(literal, format!("missing {name}")))?;
            raw.parse::<u32>()
                .map_err(|_| VersionError::parse(literal, format!("{name} '{raw}' is not a number")))
        };

        let major = component(0, "major")?;
        let minor = component(1, "minor")?;
        let bugfix = if parts.len() < 3 {
            0
        } else {
            component(2, "bugfix")?
        };

        Ok(Self {
            literal: literal.to_string(),
            major,
            minor,
            bugfix,
            release: !literal.ends_with(DEV_MARKER),
        })
    }

    /// Whether this is a development build.
    pub fn is_dev(&self) -> bool {
        !self.release
    }
}

impl FromStr for VersionDescriptor {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}
