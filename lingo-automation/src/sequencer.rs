//! Project creation and the fixed batch-task sequence.
//!
//! ## `create_project` — steps
//!
//! 1. Build [`ProjectInfo`] (due in seven days) and create the container.
//! 2. Add every file under the input folder, recursively.
//! 3. Attach bilingual reference files found in the previous project.
//! 4. Scan, ConvertToTranslatableFormat, CopyToTargetLanguages over source files.
//! 5. Switch to the target-language view.
//! 6. PerfectMatch, AnalyzeFiles, PreTranslateFiles,
//!    PopulateProjectTranslationMemories over target files.
//! 7. Save.
//!
//! Every task run is inspected before the next one starts. A failure at any
//! step aborts the run with [`ProjectError::CreationFailed`]; nothing already
//! created is rolled back.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use lingo_core::{
    BilingualFileMapping, FileId, MessageLevel, PackageImport, ProjectFile, ProjectInfo,
    ProjectSettings, StatusPolicy, TaskRun, TaskStatus, TaskTemplateId,
};

use crate::error::{ImportCause, ProjectError, Stage, StageError};
use crate::mapping::compute_bilingual_file_mappings;
use crate::service::ProjectService;

// ---------------------------------------------------------------------------
// Task sequence
// ---------------------------------------------------------------------------

/// Tasks run over the source-language files, in order.
pub const SOURCE_TASKS: [TaskTemplateId; 3] = [
    TaskTemplateId::Scan,
    TaskTemplateId::ConvertToTranslatableFormat,
    TaskTemplateId::CopyToTargetLanguages,
];

/// Tasks run over the target-language files, in order.
pub const TARGET_TASKS: [TaskTemplateId; 4] = [
    TaskTemplateId::PerfectMatch,
    TaskTemplateId::AnalyzeFiles,
    TaskTemplateId::PreTranslateFiles,
    TaskTemplateId::PopulateProjectTranslationMemories,
];

/// Which language view a task runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileScope {
    Source,
    Target,
}

/// What the sequencer does after seeing a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Continue,
    /// Abort with [`StageError::TaskEscalated`].
    Escalate,
    /// Stop before the next task with [`StageError::SequenceHalted`].
    Halt,
}

pub fn status_action(policy: StatusPolicy, status: TaskStatus) -> StatusAction {
    match policy {
        StatusPolicy::Lenient => StatusAction::Continue,
        StatusPolicy::Strict => match status {
            TaskStatus::Failed | TaskStatus::Rejected | TaskStatus::Invalid => {
                StatusAction::Escalate
            }
            TaskStatus::Cancelling | TaskStatus::Cancelled => StatusAction::Halt,
            TaskStatus::Created
            | TaskStatus::Assigned
            | TaskStatus::Started
            | TaskStatus::Completed => StatusAction::Continue,
        },
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Summary of one inspected task run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub template: TaskTemplateId,
    pub scope: FileScope,
    pub file_count: usize,
    pub final_status: Option<TaskStatus>,
    /// Progress carried by the last status event, 0 when none was reported.
    pub percent_complete: u8,
    pub status_events: usize,
    pub warnings: usize,
    pub errors: usize,
}

/// Outcome of a successful [`create_project`].
#[derive(Debug)]
pub struct CreationReport<P> {
    pub project: P,
    pub info: ProjectInfo,
    pub source_files: Vec<ProjectFile>,
    pub target_files: Vec<ProjectFile>,
    pub mappings: Vec<BilingualFileMapping>,
    pub stages: Vec<StageReport>,
}

/// Outcome of a successful package import.
#[derive(Debug)]
pub struct ImportReport<P> {
    pub project: P,
    pub import: PackageImport,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Create, populate, process and save a project described by `settings`.
pub fn create_project<S: ProjectService>(
    service: &mut S,
    settings: &ProjectSettings,
) -> Result<CreationReport<S::Project>, ProjectError> {
    create_project_at(service, settings, Utc::now())
}

/// [`create_project`] with an explicit creation timestamp.
pub fn create_project_at<S: ProjectService>(
    service: &mut S,
    settings: &ProjectSettings,
    now: DateTime<Utc>,
) -> Result<CreationReport<S::Project>, ProjectError> {
    tracing::info!(
        project = %settings.project_name,
        source = %settings.source_language,
        target = %settings.target_language,
        "creating project"
    );
    build_project(service, settings, now).map_err(|source| {
        tracing::error!(project = %settings.project_name, error = %source, "project creation failed");
        ProjectError::CreationFailed {
            project: settings.project_name.clone(),
            source,
        }
    })
}

fn build_project<S: ProjectService>(
    service: &mut S,
    settings: &ProjectSettings,
    now: DateTime<Utc>,
) -> Result<CreationReport<S::Project>, StageError> {
    let info = ProjectInfo::from_settings(settings, now);
    let mut project = service
        .create_project(&info)
        .map_err(StageError::at(Stage::CreateContainer))?;
    service
        .add_folder_with_files(&mut project, &settings.input_folder, true)
        .map_err(StageError::at(Stage::AddFiles))?;

    let sequence = run_task_sequence(service, &mut project, settings)?;

    service
        .save(&mut project)
        .map_err(StageError::at(Stage::Save))?;
    tracing::info!(project = %info.name, "project saved");

    Ok(CreationReport {
        project,
        info,
        source_files: sequence.source_files,
        target_files: sequence.target_files,
        mappings: sequence.mappings,
        stages: sequence.stages,
    })
}

struct SequenceOutcome {
    source_files: Vec<ProjectFile>,
    target_files: Vec<ProjectFile>,
    mappings: Vec<BilingualFileMapping>,
    stages: Vec<StageReport>,
}

fn run_task_sequence<S: ProjectService>(
    service: &mut S,
    project: &mut S::Project,
    settings: &ProjectSettings,
) -> Result<SequenceOutcome, StageError> {
    let policy = settings.status_policy;

    let source_files = service
        .source_language_files(project)
        .map_err(StageError::at(Stage::ListSourceFiles))?;
    let mappings = compute_bilingual_file_mappings(
        &settings.target_languages(),
        &source_files,
        settings.reference_root(),
    );
    tracing::info!(count = mappings.len(), "adding bilingual reference files");
    service
        .add_bilingual_reference_files(project, &mappings)
        .map_err(StageError::at(Stage::AddReferenceFiles))?;

    let mut stages = Vec::with_capacity(SOURCE_TASKS.len() + TARGET_TASKS.len());
    let source_ids = file_ids(&source_files);
    for template in SOURCE_TASKS {
        let run = run_named_task(service, project, &source_ids, template)?;
        stages.push(inspect(run, FileScope::Source, source_ids.len(), policy)?);
    }

    // From here on the tasks work on the target-language view.
    let target_files = service
        .target_language_files(project, &settings.target_language)
        .map_err(StageError::at(Stage::ListTargetFiles))?;
    let target_ids = file_ids(&target_files);
    for template in TARGET_TASKS {
        let run = run_named_task(service, project, &target_ids, template)?;
        stages.push(inspect(run, FileScope::Target, target_ids.len(), policy)?);
    }

    Ok(SequenceOutcome {
        source_files,
        target_files,
        mappings,
        stages,
    })
}

/// Run one task template over `file_ids` and return its completed record.
pub fn run_named_task<S: ProjectService>(
    service: &mut S,
    project: &mut S::Project,
    file_ids: &[FileId],
    template: TaskTemplateId,
) -> Result<TaskRun, StageError> {
    tracing::info!(template = %template, files = file_ids.len(), "running task");
    let run = service
        .run_automatic_task(project, file_ids, template)
        .map_err(StageError::at(Stage::RunTask(template)))?;
    tracing::debug!(
        template = %template,
        statuses = run.statuses.len(),
        messages = run.messages.len(),
        "task returned"
    );
    Ok(run)
}

/// Consume the diagnostics of one run and decide whether the sequence goes on.
///
/// Takes the run by value: once inspected, its status and message events are
/// gone and cannot leak into the next stage.
pub fn inspect(
    run: TaskRun,
    scope: FileScope,
    file_count: usize,
    policy: StatusPolicy,
) -> Result<StageReport, StageError> {
    let template = run.template;
    for message in &run.messages {
        let file = message.file_id.as_ref().map(|id| id.0.as_str()).unwrap_or("-");
        match message.level {
            MessageLevel::Information => {
                tracing::debug!(template = %template, source = %message.source, file, "{}", message.text)
            }
            MessageLevel::Warning => {
                tracing::warn!(template = %template, source = %message.source, file, "{}", message.text)
            }
            MessageLevel::Error => {
                tracing::error!(template = %template, source = %message.source, file, "{}", message.text)
            }
        }
    }

    // Escalation outranks halting wherever it appears in the run.
    let first_with = |action: StatusAction| {
        run.statuses
            .iter()
            .map(|e| e.status)
            .find(|s| status_action(policy, *s) == action)
    };
    if let Some(status) = first_with(StatusAction::Escalate) {
        let errors = run
            .messages
            .iter()
            .filter(|m| m.level == MessageLevel::Error)
            .map(|m| m.text.clone())
            .collect();
        return Err(StageError::TaskEscalated {
            template,
            status,
            errors,
        });
    }
    if let Some(status) = first_with(StatusAction::Halt) {
        tracing::warn!(template = %template, status = %status, "stopping task sequence");
        return Err(StageError::SequenceHalted { template, status });
    }

    let report = StageReport {
        template,
        scope,
        file_count,
        final_status: run.final_status(),
        percent_complete: run.statuses.last().map_or(0, |e| e.percent_complete),
        status_events: run.statuses.len(),
        warnings: run.count(MessageLevel::Warning),
        errors: run.count(MessageLevel::Error),
    };
    tracing::info!(
        template = %template,
        status = ?report.final_status,
        warnings = report.warnings,
        errors = report.errors,
        "task inspected"
    );
    Ok(report)
}

/// Import a project package into `output` and save it. No tasks are run.
pub fn create_project_from_package<S: ProjectService>(
    service: &mut S,
    package: &Path,
    output: &Path,
) -> Result<ImportReport<S::Project>, ProjectError> {
    tracing::info!(package = %package.display(), output = %output.display(), "importing package");
    let fail = |source: ImportCause| {
        tracing::error!(package = %package.display(), error = %source, "package import failed");
        ProjectError::ImportFailed {
            package: Some(package.to_path_buf()),
            source,
        }
    };

    let (mut project, import) = service
        .create_from_package(package, output)
        .map_err(|e| fail(e.into()))?;
    service.save(&mut project).map_err(|e| fail(e.into()))?;
    Ok(ImportReport { project, import })
}

/// [`create_project_from_package`] using `settings.package_path` and
/// `settings.output_path`.
pub fn import_from_settings<S: ProjectService>(
    service: &mut S,
    settings: &ProjectSettings,
) -> Result<ImportReport<S::Project>, ProjectError> {
    match settings.package_path.as_deref() {
        Some(package) => create_project_from_package(service, package, &settings.output_path),
        None => Err(ProjectError::ImportFailed {
            package: None,
            source: ImportCause::MissingPackagePath,
        }),
    }
}

fn file_ids(files: &[ProjectFile]) -> Vec<FileId> {
    files.iter().map(|f| f.id.clone()).collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
