//! `lingo init <path> --name <project> --source <tag> --target <tag> --input <dir> --output <dir>`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use lingo_core::{settings, ProjectSettings, StatusPolicy};

use super::super::LanguageArg;

/// Write a project settings file.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the settings file (e.g. brochure.yaml).
    pub path: PathBuf,

    /// Project name.
    #[arg(long, short = 'n')]
    pub name: String,

    /// Source language tag, e.g. en-US.
    #[arg(long, short = 's', value_name = "TAG")]
    pub source: LanguageArg,

    /// Target language tag, e.g. fr-FR.
    #[arg(long, short = 't', value_name = "TAG")]
    pub target: LanguageArg,

    /// Folder whose files seed the project.
    #[arg(long, short = 'i', value_name = "DIR")]
    pub input: PathBuf,

    /// Local project folder.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: PathBuf,

    /// Previous project probed for bilingual reference files (defaults to --output).
    #[arg(long, value_name = "DIR")]
    pub reference: Option<PathBuf>,

    /// Project package for `lingo plan --package`.
    #[arg(long, value_name = "FILE")]
    pub package: Option<PathBuf>,

    /// Inspect task statuses without acting on failures.
    #[arg(long)]
    pub lenient: bool,

    /// Overwrite an existing settings file.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        if self.path.exists() && !self.force {
            bail!(
                "'{}' already exists; pass --force to overwrite",
                self.path.display()
            );
        }

        let project_settings = ProjectSettings {
            project_name: self.name,
            source_language: self.source.into(),
            target_language: self.target.into(),
            input_folder: self.input,
            output_path: self.output,
            package_path: self.package,
            reference_project: self.reference,
            status_policy: if self.lenient {
                StatusPolicy::Lenient
            } else {
                StatusPolicy::Strict
            },
        };
        settings::save(&self.path, &project_settings)
            .with_context(|| format!("failed to write '{}'", self.path.display()))?;

        println!(
            "✓ Wrote settings for '{}' ({} → {})",
            project_settings.project_name,
            project_settings.source_language,
            project_settings.target_language
        );
        println!("  Saved to: {}", self.path.display());
        Ok(())
    }
}
