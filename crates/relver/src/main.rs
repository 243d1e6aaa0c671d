//! relver - print resolved versions and frozen version records

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use relver::{FrozenRecord, GitCli, SuffixMode};

#[derive(Debug, Parser)]
#[command(name = "relver")]
#[command(author, version, about = "Resolve release/dev version strings from git history")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the resolved version string
    Show {
        #[command(flatten)]
        source: SourceArgs,
        /// Print the descriptor and suffix as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a frozen version record
    Freeze {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Read a frozen version record and print its version
    Read {
        /// Frozen record file
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Version literal, e.g. 0.0dev or 1.2.3
    literal: String,
    /// Directory whose git history identifies dev builds
    #[arg(long, env = "RELVER_DIR", default_value = ".")]
    dir: PathBuf,
    /// Use the HEAD commit hash instead of the commit count
    #[arg(long)]
    sha: bool,
}

impl SourceArgs {
    fn resolve(&self) -> Result<relver::ResolvedVersion> {
        let mode = if self.sha {
            SuffixMode::Hash
        } else {
            SuffixMode::Count
        };
        relver::resolve(&self.literal, &GitCli::new(&self.dir), mode)
            .with_context(|| format!("Failed to resolve version '{}'", self.literal))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show { source, json } => {
            let resolved = source.resolve()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                println!("{resolved}");
            }
        }
        Commands::Freeze { source } => {
            let resolved = source.resolve()?;
            print!("{}", FrozenRecord::new(&resolved));
        }
        Commands::Read { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let record = FrozenRecord::parse(&text)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            println!("{}", record.version);
        }
    }

    Ok(())
}
