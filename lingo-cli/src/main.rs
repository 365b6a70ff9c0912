//! Lingo — translation project automation CLI.
//!
//! # Usage
//!
//! ```text
//! lingo init <settings.yaml> --name <project> --source <tag> --target <tag> --input <dir> --output <dir>
//! lingo plan <settings.yaml> [--package] [--json]
//! lingo mappings <settings.yaml> [--json]
//! ```
//!
//! `plan` and `mappings` run against the dry-run project service: inputs and
//! task ordering are checked, nothing is written.

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{init::InitArgs, mappings::MappingsArgs, plan::PlanArgs};
use lingo_core::Language;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "lingo",
    version,
    about = "Create translation projects and drive their batch tasks",
    long_about = None,
)]
struct Cli {
    /// Log progress to stderr (overridden by RUST_LOG).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a project settings file.
    Init(InitArgs),

    /// Dry-run project creation and show every task stage.
    Plan(PlanArgs),

    /// List bilingual reference files a new project would reuse.
    Mappings(MappingsArgs),
}

// ---------------------------------------------------------------------------
// Shared language argument
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse a [`Language`] from CLI args.
#[derive(Debug, Clone)]
pub struct LanguageArg(pub Language);

impl FromStr for LanguageArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<Language>()
            .map(Self)
            .map_err(|e| format!("{e}; expected a tag such as en-US or fr-FR"))
    }
}

impl fmt::Display for LanguageArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<LanguageArg> for Language {
    fn from(l: LanguageArg) -> Self {
        l.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Plan(args) => args.run(),
        Commands::Mappings(args) => args.run(),
    }
}
