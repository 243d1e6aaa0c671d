//! wcslint - check the WCS keywords in a FITS file
//!
//! A thin shim: it takes one file path, hands it to an external validator and
//! prints whatever report comes back. It does not read FITS files or
//! interpret the report itself.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use clap::Parser;

/// Validator run when none is configured.
pub const DEFAULT_VALIDATOR: &str = "fitsverify";

/// Check the WCS keywords in a FITS file for compliance against the standards
#[derive(Debug, Parser)]
#[command(name = "wcslint", version)]
pub struct Cli {
    /// Path to FITS file to check
    pub filename: PathBuf,

    /// External validation program, invoked as `<PROGRAM> <FILENAME>`
    #[arg(long, env = "WCSLINT_VALIDATOR", default_value = DEFAULT_VALIDATOR, hide = true)]
    pub validator: OsString,
}

/// Produces a textual validation report for a file.
pub trait Validator {
    /// Validate `path` and return the printable report.
    ///
    /// # Errors
    ///
    /// Returns an error if no report could be produced at all. Findings in
    /// the file belong in the report, not in the error.
    fn validate(&self, path: &Path) -> Result<String>;
}

impl<T: Validator + ?Sized> Validator for &T {
    fn validate(&self, path: &Path) -> Result<String> {
        (**self).validate(path)
    }
}

/// Runs an external program and takes its stdout as the report.
#[derive(Debug, Clone)]
pub struct CommandValidator {
    program: OsString,
}

impl CommandValidator {
    /// Validate with `program`.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CommandValidator {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDATOR)
    }
}

impl Validator for CommandValidator {
    fn validate(&self, path: &Path) -> Result<String> {
        let program = Path::new(&self.program).display();
        tracing::debug!(%program, path = %path.display(), "running validator");

        let output = Command::new(&self.program)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute validator '{program}'"))?;

        let report = String::from_utf8_lossy(&output.stdout);
        let report = report.trim_end_matches(['\n', '\r']);

        // Validators report findings through a non-zero exit; that is still a report.
        if !output.status.success() {
            if report.is_empty() {
                bail!(
                    "Validator '{program}' failed ({}): {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
            }
            tracing::debug!(status = %output.status, "validator reported problems");
        }

        Ok(report.to_string())
    }
}

/// Validate `cli.filename` once and write the report, verbatim, to `out`.
///
/// # Errors
///
/// Returns an error if the validator fails or `out` cannot be written.
pub fn run(cli: &Cli, validator: &impl Validator, out: &mut impl Write) -> Result<()> {
    let report = validator.validate(&cli.filename)?;
    writeln!(out, "{report}").context("Failed to write report")?;
    Ok(())
}

/// Parse `args` (program name first) and [`run`].
///
/// # Errors
///
/// Returns the [`clap::Error`] for bad arguments, or any error from [`run`].
pub fn run_from<I, T>(args: I, validator: &impl Validator, out: &mut impl Write) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    run(&cli, validator, out)
}
