//! `lingo plan` — dry-run project creation and report every task stage.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use lingo_automation::{
    create_project, import_from_settings, CreationReport, DryRunProject, DryRunService,
    FileScope, StageReport,
};
use lingo_core::{settings, BilingualFileMapping, TaskStatus};

/// Arguments for `lingo plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Project settings file.
    pub settings: PathBuf,

    /// Import `package_path` instead of creating a project from `input_folder`.
    #[arg(long)]
    pub package: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let project_settings = settings::load(&self.settings)
            .with_context(|| format!("failed to load '{}'", self.settings.display()))?;
        let mut service = DryRunService::new();

        if self.package {
            let report = import_from_settings(&mut service, &project_settings)
                .context("dry run of package import failed")?;
            tracing::debug!(project = %report.project.name, "package import planned");
            if self.json {
                let payload = ImportJson {
                    project: report.project.name.clone(),
                    package: report.import.package_path.display().to_string(),
                    status: report.import.status.to_string(),
                    saved: report.project.is_saved(),
                };
                print_json(&payload)?;
            } else {
                println!(
                    "[dry-run] ✓ package '{}' imports as '{}' ({})",
                    report.import.package_path.display(),
                    report.project.name,
                    report.import.status
                );
            }
            return Ok(());
        }

        let report = create_project(&mut service, &project_settings)
            .context("dry run of project creation failed")?;
        tracing::debug!(stages = report.stages.len(), "project creation planned");
        if self.json {
            print_json(&creation_json(report))?;
        } else {
            print_table(&report);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct ImportJson {
    project: String,
    package: String,
    status: String,
    saved: bool,
}

#[derive(Serialize)]
struct CreationJson {
    project: String,
    source_language: String,
    target_languages: Vec<String>,
    due_date: String,
    source_files: usize,
    target_files: usize,
    mappings: Vec<BilingualFileMapping>,
    stages: Vec<StageReport>,
    saved: bool,
}

#[derive(Tabled)]
struct StageTableRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "task")]
    task: String,
    #[tabled(rename = "files")]
    files: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "done")]
    done: String,
    #[tabled(rename = "warnings")]
    warnings: usize,
    #[tabled(rename = "errors")]
    errors: usize,
}

fn creation_json(report: CreationReport<DryRunProject>) -> CreationJson {
    CreationJson {
        project: report.info.name.clone(),
        source_language: report.info.source_language.to_string(),
        target_languages: report
            .info
            .target_languages
            .iter()
            .map(ToString::to_string)
            .collect(),
        due_date: report.info.due_date.to_rfc3339(),
        source_files: report.source_files.len(),
        target_files: report.target_files.len(),
        saved: report.project.is_saved(),
        mappings: report.mappings,
        stages: report.stages,
    }
}

fn print_json<T: Serialize>(payload: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(payload).context("failed to serialize plan JSON")?
    );
    Ok(())
}

fn print_table(report: &CreationReport<DryRunProject>) {
    let targets: Vec<String> = report
        .info
        .target_languages
        .iter()
        .map(ToString::to_string)
        .collect();
    println!(
        "[dry-run] {} | {} → {} | due {}",
        report.info.name.bold(),
        report.info.source_language,
        targets.join(", "),
        report.info.due_date.format("%Y-%m-%d"),
    );
    println!(
        "  {} source file(s), {} bilingual reference file(s)",
        report.source_files.len(),
        report.mappings.len()
    );

    let rows: Vec<StageTableRow> = report
        .stages
        .iter()
        .enumerate()
        .map(|(i, stage)| StageTableRow {
            index: i + 1,
            task: stage.template.to_string(),
            files: format!("{} {}", stage.file_count, scope_label(stage.scope)),
            status: status_label(stage.final_status),
            done: format!("{}%", stage.percent_complete),
            warnings: stage.warnings,
            errors: stage.errors,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if report.project.is_saved() {
        println!("{} project would be saved to {}", "✓".green(), report.info.local_project_folder.display());
    }
}

fn scope_label(scope: FileScope) -> &'static str {
    match scope {
        FileScope::Source => "source",
        FileScope::Target => "target",
    }
}

fn status_label(status: Option<TaskStatus>) -> String {
    match status {
        Some(TaskStatus::Completed) => "completed".green().to_string(),
        Some(s @ (TaskStatus::Failed | TaskStatus::Rejected | TaskStatus::Invalid)) => {
            s.to_string().red().to_string()
        }
        Some(s @ (TaskStatus::Cancelling | TaskStatus::Cancelled)) => s.to_string().yellow().to_string(),
        Some(s) => s.to_string(),
        None => "-".bright_black().to_string(),
    }
}
