//! wcslint - check the WCS keywords in a FITS file

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wcslint::{Cli, CommandValidator};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let validator = CommandValidator::new(cli.validator.clone());

    wcslint::run(&cli, &validator, &mut std::io::stdout().lock())
}
