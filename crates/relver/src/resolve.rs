//! Development suffix computation and full version resolution

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::descriptor::VersionDescriptor;
use crate::error::VersionError;
use crate::revision::SuffixMode;
use crate::source::RevisionSource;

/// Result of asking source control for a development suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuffixOutcome {
    /// A suffix such as `-r42` or `-git-<hash>`.
    Computed(String),
    /// The working tree is not in a repository.
    Unavailable(String),
    /// The query failed for any other reason, `git` missing included.
    Failed(String),
}

impl SuffixOutcome {
    /// The suffix text, empty unless computed.
    pub fn suffix(&self) -> &str {
        match self {
            Self::Computed(s) => s,
            Self::Unavailable(_) | Self::Failed(_) => "",
        }
    }
}

/// Compute the development suffix for a non-release build.
///
/// # Errors
///
/// Returns [`VersionError::ReleaseBuild`] if `descriptor` is a release;
/// `source` is not queried in that case. Source-control problems are not
/// errors; they come back as [`SuffixOutcome::Unavailable`] or
/// [`SuffixOutcome::Failed`].
pub fn dev_suffix(
    descriptor: &VersionDescriptor,
    source: &impl RevisionSource,
    mode: SuffixMode,
) -> Result<SuffixOutcome, VersionError> {
    if descriptor.release {
        return Err(VersionError::ReleaseBuild(descriptor.literal.clone()));
    }

    let log = match source.list_commits() {
        Ok(log) => log,
        Err(e) if e.is_unavailable() => return Ok(SuffixOutcome::Unavailable(e.to_string())),
        Err(e) => return Ok(SuffixOutcome::Failed(e.to_string())),
    };

    Ok(match mode {
        SuffixMode::Count => SuffixOutcome::Computed(format!("-r{}", log.count)),
        SuffixMode::Hash => match log.head {
            Some(head) => SuffixOutcome::Computed(format!("-git-{}", head.suffix_form())),
            None => SuffixOutcome::Failed("commit listing did not start with a hash".to_string()),
        },
    })
}

/// A version descriptor together with its development suffix.
///
/// Computed once at startup and handed to whatever needs the version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVersion {
    /// The parsed literal.
    pub descriptor: VersionDescriptor,
    /// Development suffix; empty for releases and when source control was
    /// unavailable.
    pub suffix: String,
}

impl ResolvedVersion {
    /// Wrap a descriptor with no suffix.
    pub fn without_suffix(descriptor: VersionDescriptor) -> Self {
        Self {
            descriptor,
            suffix: String::new(),
        }
    }

    /// Full version string, e.g. `0.0dev-r42`.
    pub fn version(&self) -> String {
        format!("{}{}", self.descriptor.literal, self.suffix)
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.descriptor.literal, self.suffix)
    }
}

/// Parse `literal` and, for development builds, append a suffix from
/// `source`.
///
/// Source-control problems are logged as warnings and leave the version
/// unsuffixed.
///
/// # Errors
///
/// Returns [`VersionError::Parse`] if the literal is malformed.
pub fn resolve(
    literal: &str,
    source: &impl RevisionSource,
    mode: SuffixMode,
) -> Result<ResolvedVersion, VersionError> {
    let descriptor = VersionDescriptor::parse(literal)?;
    if descriptor.release {
        return Ok(ResolvedVersion::without_suffix(descriptor));
    }

    let suffix = match dev_suffix(&descriptor, source, mode)? {
        SuffixOutcome::Computed(s) => s,
        SuffixOutcome::Unavailable(reason) => {
            tracing::warn!(%reason, "No git repository present! Using default dev version.");
            String::new()
        }
        SuffixOutcome::Failed(detail) => {
            tracing::warn!("Git failed while determining revision count: {detail}");
            String::new()
        }
    };

    Ok(ResolvedVersion { descriptor, suffix })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::revision::CommitLog;
    use std::cell::Cell;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` with a subscriber that records WARN and above.
    fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, logs.text())
    }

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    /// Canned source that records how often it was asked.
    struct FakeSource {
        result: Result<CommitLog, SourceError>,
        calls: Cell<usize>,
    }

    impl FakeSource {
        fn new(result: Result<CommitLog, SourceError>) -> Self {
            Self {
                result,
                calls: Cell::new(0),
            }
        }

        fn listing(output: &str) -> Self {
            Self::new(Ok(CommitLog::parse(output)))
        }
    }

    impl RevisionSource for FakeSource {
        fn list_commits(&self) -> Result<CommitLog, SourceError> {
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    fn dev() -> VersionDescriptor {
        VersionDescriptor::parse("0.0dev").unwrap()
    }

    fn five_commits() -> String {
        format!("{SHA}\n").repeat(5)
    }

    #[test]
    fn test_count_mode() {
        let src = FakeSource::listing(&five_commits());
        let out = dev_suffix(&dev(), &src, SuffixMode::Count).unwrap();
        assert_eq!(out, SuffixOutcome::Computed("-r5".to_string()));
    }

    #[test]
    fn test_hash_mode() {
        let src = FakeSource::listing(&five_commits());
        let out = dev_suffix(&dev(), &src, SuffixMode::Hash).unwrap();
        assert_eq!(out.suffix(), format!("-git-{SHA}"));
    }

    #[test]
    fn test_hash_mode_empty_history_fails() {
        let src = FakeSource::listing("");
        let out = dev_suffix(&dev(), &src, SuffixMode::Hash).unwrap();
        assert!(matches!(out, SuffixOutcome::Failed(_)));
        assert_eq!(out.suffix(), "");
    }

    #[test]
    fn test_release_build_rejected_without_query() {
        let release = VersionDescriptor::parse("1.2.3").unwrap();
        for result in [Ok(CommitLog::parse(&five_commits())), Err(SourceError::NoRepository)] {
            let src = FakeSource::new(result);
            let err = dev_suffix(&release, &src, SuffixMode::Count).unwrap_err();
            assert!(matches!(err, VersionError::ReleaseBuild(_)));
            assert_eq!(src.calls.get(), 0);
        }
    }

    #[test]
    fn test_no_repository_is_unavailable() {
        let src = FakeSource::new(Err(SourceError::NoRepository));
        let out = dev_suffix(&dev(), &src, SuffixMode::Count).unwrap();
        assert!(matches!(out, SuffixOutcome::Unavailable(_)));
        assert_eq!(out.suffix(), "");
    }

    #[test]
    fn test_missing_tool_is_failure_with_detail() {
        let src = FakeSource::new(Err(SourceError::ToolMissing("git".to_string())));
        let out = dev_suffix(&dev(), &src, SuffixMode::Count).unwrap();
        assert_eq!(out, SuffixOutcome::Failed("'git' not found on PATH".to_string()));
    }

    #[test]
    fn test_other_failure_keeps_detail() {
        let src = FakeSource::new(Err(SourceError::Failed {
            status: Some(1),
            detail: "fatal: bad object HEAD".to_string(),
        }));
        let out = dev_suffix(&dev(), &src, SuffixMode::Count).unwrap();
        assert_eq!(out, SuffixOutcome::Failed("fatal: bad object HEAD".to_string()));
    }

    #[test]
    fn test_resolve_dev_appends_suffix() {
        let src = FakeSource::listing(&five_commits());
        let v = resolve("0.0dev", &src, SuffixMode::Count).unwrap();
        assert_eq!(v.version(), "0.0dev-r5");
        assert_eq!(v.to_string(), "0.0dev-r5");
    }

    #[test]
    fn test_resolve_release_skips_source() {
        let src = FakeSource::listing(&five_commits());
        let v = resolve("1.2.3", &src, SuffixMode::Count).unwrap();
        assert_eq!(v.version(), "1.2.3");
        assert_eq!(src.calls.get(), 0);
    }

    #[test]
    fn test_resolve_downgrades_failures() {
        let src = FakeSource::new(Err(SourceError::NoRepository));
        let v = resolve("0.0dev", &src, SuffixMode::Count).unwrap();
        assert_eq!(v.version(), "0.0dev");

        let src = FakeSource::new(Err(SourceError::Failed {
            status: Some(2),
            detail: "boom".to_string(),
        }));
        let v = resolve("0.0dev", &src, SuffixMode::Hash).unwrap();
        assert_eq!(v.suffix, "");
    }

    #[test]
    fn test_resolve_warns_when_no_repository() {
        let src = FakeSource::new(Err(SourceError::NoRepository));
        let (v, logs) = capture_warnings(|| resolve("0.0dev", &src, SuffixMode::Count).unwrap());
        assert_eq!(v.version(), "0.0dev");
        assert!(logs.contains("WARN"));
        assert!(logs.contains("No git repository present"));
    }

    #[test]
    fn test_resolve_warning_carries_failure_detail() {
        let src = FakeSource::new(Err(SourceError::Failed {
            status: Some(2),
            detail: "boom".to_string(),
        }));
        let (v, logs) = capture_warnings(|| resolve("0.0dev", &src, SuffixMode::Count).unwrap());
        assert_eq!(v.suffix, "");
        assert!(logs.contains("Git failed while determining revision count: boom"));
        assert!(!logs.contains("No git repository present"));
    }

    #[test]
    fn test_resolve_missing_tool_warning_names_tool() {
        let src = FakeSource::new(Err(SourceError::ToolMissing("git".to_string())));
        let (_, logs) = capture_warnings(|| resolve("0.0dev", &src, SuffixMode::Count).unwrap());
        assert!(logs.contains("'git' not found on PATH"));
        assert!(!logs.contains("No git repository present"));
    }

    #[test]
    fn test_resolve_release_logs_nothing() {
        let src = FakeSource::new(Err(SourceError::NoRepository));
        let (_, logs) = capture_warnings(|| resolve("1.2.3", &src, SuffixMode::Count).unwrap());
        assert!(logs.is_empty());
    }

    #[test]
    fn test_resolve_propagates_parse_error() {
        let src = FakeSource::listing("");
        assert!(matches!(
            resolve("x.ydev", &src, SuffixMode::Count),
            Err(VersionError::Parse { .. })
        ));
    }
}
