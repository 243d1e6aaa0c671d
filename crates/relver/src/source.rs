//! Source-control queries
//!
//! [`RevisionSource`] is the seam between version resolution and the outside
//! world. [`GitCli`] shells out to `git`; tests substitute their own source.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::SourceError;
use crate::revision::CommitLog;

/// Exit status `git` uses when the working directory is not a repository.
pub const GIT_NO_REPOSITORY: i32 = 128;

/// Something that can list the commit history of the current source tree.
pub trait RevisionSource {
    /// List every commit reachable from HEAD, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] describing why the history is unavailable.
    fn list_commits(&self) -> Result<CommitLog, SourceError>;
}

impl<T: RevisionSource + ?Sized> RevisionSource for &T {
    fn list_commits(&self) -> Result<CommitLog, SourceError> {
        (**self).list_commits()
    }
}

/// Runs `git rev-list HEAD` in a fixed working directory.
///
/// The call blocks until `git` exits. There is no timeout: a hung `git`
/// hangs the caller.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
    workdir: PathBuf,
}

impl GitCli {
    /// Query the repository containing `workdir` with the `git` on `PATH`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("git"),
            workdir: workdir.into(),
        }
    }

    /// Use a different `git` executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl RevisionSource for GitCli {
    fn list_commits(&self) -> Result<CommitLog, SourceError> {
        tracing::debug!(
            program = %self.program.display(),
            workdir = %self.workdir.display(),
            "listing commits"
        );

        let output = match Command::new(&self.program)
            .args(["rev-list", "HEAD"])
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .output()
        {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // current_dir() on a missing directory also surfaces as NotFound.
                if !self.workdir.is_dir() {
                    return Err(SourceError::Failed {
                        status: None,
                        detail: format!("{} is not a directory", self.workdir.display()),
                    });
                }
                return Err(SourceError::ToolMissing(self.program_name()));
            }
            Err(e) => {
                return Err(SourceError::Failed {
                    status: None,
                    detail: format!("Failed to spawn {}: {e}", self.program_name()),
                });
            }
        };

        match output.status.code() {
            Some(0) => Ok(CommitLog::parse(&String::from_utf8_lossy(&output.stdout))),
            Some(GIT_NO_REPOSITORY) => Err(SourceError::NoRepository),
            status => Err(SourceError::Failed {
                status,
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}
