//! `lingo mappings <settings.yaml> [--json]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use lingo_automation::{compute_bilingual_file_mappings, DryRunService, ProjectService};
use lingo_core::{settings, ProjectInfo};

/// List bilingual reference files a new project would reuse.
#[derive(Args, Debug)]
pub struct MappingsArgs {
    /// Project settings file.
    pub settings: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct MappingJson {
    file: String,
    language: String,
    file_id: String,
    bilingual_path: String,
}

#[derive(Tabled)]
struct MappingTableRow {
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "language")]
    language: String,
    #[tabled(rename = "bilingual file")]
    bilingual_path: String,
}

impl MappingsArgs {
    pub fn run(self) -> Result<()> {
        let project_settings = settings::load(&self.settings)
            .with_context(|| format!("failed to load '{}'", self.settings.display()))?;

        let mut service = DryRunService::new();
        let info = ProjectInfo::from_settings(&project_settings, Utc::now());
        let mut project = service
            .create_project(&info)
            .context("failed to create dry-run project")?;
        service
            .add_folder_with_files(&mut project, &project_settings.input_folder, true)
            .with_context(|| {
                format!(
                    "failed to list '{}'",
                    project_settings.input_folder.display()
                )
            })?;
        let files = service
            .source_language_files(&project)
            .context("failed to list source files")?;

        let root = project_settings.reference_root();
        let mappings =
            compute_bilingual_file_mappings(&project_settings.target_languages(), &files, root);

        let name_of = |id: &lingo_core::FileId| {
            files
                .iter()
                .find(|f| &f.id == id)
                .map(|f| f.name.clone())
                .unwrap_or_default()
        };

        if self.json {
            let payload: Vec<MappingJson> = mappings
                .iter()
                .map(|m| MappingJson {
                    file: name_of(&m.file_id),
                    language: m.language.to_string(),
                    file_id: m.file_id.to_string(),
                    bilingual_path: m.bilingual_path.display().to_string(),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize mappings")?
            );
            return Ok(());
        }

        if mappings.is_empty() {
            println!(
                "No bilingual reference files under {} ({} file(s) checked).",
                root.display(),
                files.len()
            );
            return Ok(());
        }

        let rows: Vec<MappingTableRow> = mappings
            .iter()
            .map(|m| MappingTableRow {
                file: name_of(&m.file_id),
                language: m.language.to_string(),
                bilingual_path: m.bilingual_path.display().to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        println!("{} of {} file(s) have a reference file.", mappings.len(), files.len());
        Ok(())
    }
}
