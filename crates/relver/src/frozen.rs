//! Frozen version records
//!
//! A frozen record captures a resolved version as static text so a
//! distribution can report its version without asking source control again.

use std::fmt;

use chrono::{DateTime, Local};

use crate::descriptor::VersionDescriptor;
use crate::error::VersionError;
use crate::resolve::ResolvedVersion;

/// Timestamp layout used in the record header.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const HEADER_PREFIX: &str = "# Autogenerated by relver on ";

/// A resolved version stamped with the time it was frozen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenRecord {
    /// Full version string, suffix included.
    pub version: String,
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Bugfix component.
    pub bugfix: u32,
    /// Whether this is a release build.
    pub release: bool,
    /// When the record was produced, as rendered in the header.
    pub timestamp: String,
}

impl FrozenRecord {
    /// Freeze `resolved` at the current local time.
    pub fn new(resolved: &ResolvedVersion) -> Self {
        Self::at(resolved, Local::now())
    }

    /// Freeze `resolved` at an explicit time.
    pub fn at(resolved: &ResolvedVersion, timestamp: DateTime<Local>) -> Self {
        let VersionDescriptor {
            major,
            minor,
            bugfix,
            release,
            ..
        } = resolved.descriptor;
        Self {
            version: resolved.version(),
            major,
            minor,
            bugfix,
            release,
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Render the record text.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Read a rendered record back.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::Frozen`] if the header or any field is missing
    /// or malformed.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let mut lines = text.lines();
        let timestamp = lines
            .next()
            .and_then(|l| l.strip_prefix(HEADER_PREFIX))
            .ok_or_else(|| VersionError::Frozen("missing header line".to_string()))?
            .to_string();

        let mut version = None;
        let mut major = None;
        let mut minor = None;
        let mut bugfix = None;
        let mut release = None;

        for line in lines.map(str::trim).filter(|l| !l.is_empty()) {
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| VersionError::Frozen(format!("not a key = value line: '{line}'")))?;
            let value = value.trim();
            match key.trim() {
                "version" => assign(&mut version, "version", unquote(value)?)?,
                "major" => assign(&mut major, "major", number("major", value)?)?,
                "minor" => assign(&mut minor, "minor", number("minor", value)?)?,
                "bugfix" => assign(&mut bugfix, "bugfix", number("bugfix", value)?)?,
                "release" => assign(&mut release, "release", boolean(value)?)?,
                other => {
                    return Err(VersionError::Frozen(format!("unknown field '{other}'")));
                }
            }
        }

        let missing = |name: &str| VersionError::Frozen(format!("missing field '{name}'"));
        Ok(Self {
            version: version.ok_or_else(|| missing("version"))?,
            major: major.ok_or_else(|| missing("major"))?,
            minor: minor.ok_or_else(|| missing("minor"))?,
            bugfix: bugfix.ok_or_else(|| missing("bugfix"))?,
            release: release.ok_or_else(|| missing("release"))?,
            timestamp,
        })
    }
}

impl fmt::Display for FrozenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER_PREFIX}{}", self.timestamp)?;
        writeln!(f, "version = '{}'", self.version)?;
        writeln!(f)?;
        writeln!(f, "major = {}", self.major)?;
        writeln!(f, "minor = {}", self.minor)?;
        writeln!(f, "bugfix = {}", self.bugfix)?;
        writeln!(f)?;
        writeln!(
            f,
            "release = {}",
            if self.release { "True" } else { "False" }
        )
    }
}

fn assign<T>(slot: &mut Option<T>, name: &str, value: T) -> Result<(), VersionError> {
    if slot.replace(value).is_some() {
        return Err(VersionError::Frozen(format!("duplicate field '{name}'")));
    }
    Ok(())
}

fn unquote(value: &str) -> Result<String, VersionError> {
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .map(str::to_string)
        .ok_or_else(|| VersionError::Frozen(format!("version must be quoted, got {value}")))
}

fn number(name: &str, value: &str) -> Result<u32, VersionError> {
    value
        .parse()
        .map_err(|_| VersionError::Frozen(format!("{name} '{value}' is not a number")))
}

fn boolean(value: &str) -> Result<bool, VersionError> {
    match value {
        "True" => Ok(true),
        "False" => Ok(false),
        other => Err(VersionError::Frozen(format!(
            "release must be True or False, got '{other}'"
        ))),
    }
}
