//! relver - release/dev version resolution
//!
//! Turns a version literal such as `0.0dev` into a full version string. For
//! development builds the literal gets a suffix identifying the source state,
//! either the number of commits (`0.0dev-r412`) or the HEAD hash
//! (`0.0dev-git-<hash>`).
//!
//! ```no_run
//! use relver::{GitCli, SuffixMode};
//!
//! let version = relver::resolve("0.0dev", &GitCli::new("."), SuffixMode::Count)?;
//! println!("{version}");
//! # Ok::<(), relver::VersionError>(())
//! ```
//!
//! The result is an immutable [`ResolvedVersion`]; resolve it once and pass
//! it to whatever needs it.

pub mod descriptor;
pub mod error;
pub mod frozen;
pub mod resolve;
pub mod revision;
pub mod source;

pub use descriptor::{DEV_MARKER, VersionDescriptor};
pub use error::{SourceError, VersionError};
pub use frozen::FrozenRecord;
pub use resolve::{ResolvedVersion, SuffixOutcome, dev_suffix, resolve};
pub use revision::{CommitHash, CommitLog, SuffixMode};
pub use source::{GitCli, RevisionSource};
