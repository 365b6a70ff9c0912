//! In-process project service that validates a run without producing a project.
//!
//! [`DryRunService`] lists real input files and checks the inputs and task
//! ordering a host would check, but keeps everything in memory: `save` marks
//! the project saved and writes nothing.
//!
//! Task prerequisites:
//!
//! | Task                               | Requires                      |
//! |------------------------------------|-------------------------------|
//! | Scan                               | —                             |
//! | ConvertToTranslatableFormat        | Scan                          |
//! | CopyToTargetLanguages              | ConvertToTranslatableFormat   |
//! | PerfectMatch                       | CopyToTargetLanguages         |
//! | AnalyzeFiles                       | CopyToTargetLanguages         |
//! | PreTranslateFiles                  | AnalyzeFiles                  |
//! | PopulateProjectTranslationMemories | PreTranslateFiles             |

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use lingo_core::{
    BilingualFileMapping, FileId, Language, MessageLevel, PackageImport, ProjectFile, ProjectId,
    ProjectInfo, ServiceError, TaskMessage, TaskRun, TaskStatus, TaskStatusEvent,
    TaskTemplateId,
};

use crate::mapping::bilingual_file_name;
use crate::service::ProjectService;

/// Extension of project packages accepted by [`DryRunService::create_from_package`].
pub const PACKAGE_EXTENSION: &str = "sdlppx";

const MESSAGE_SOURCE: &str = "dry-run";

/// Template that must have completed before `template` may run.
pub fn prerequisite(template: TaskTemplateId) -> Option<TaskTemplateId> {
    match template {
        TaskTemplateId::Scan => None,
        TaskTemplateId::ConvertToTranslatableFormat => Some(TaskTemplateId::Scan),
        TaskTemplateId::CopyToTargetLanguages => Some(TaskTemplateId::ConvertToTranslatableFormat),
        TaskTemplateId::PerfectMatch | TaskTemplateId::AnalyzeFiles => {
            Some(TaskTemplateId::CopyToTargetLanguages)
        }
        TaskTemplateId::PreTranslateFiles => Some(TaskTemplateId::AnalyzeFiles),
        TaskTemplateId::PopulateProjectTranslationMemories => {
            Some(TaskTemplateId::PreTranslateFiles)
        }
    }
}

/// Whether `template` works on the target-language view.
pub fn runs_on_target_files(template: TaskTemplateId) -> bool {
    !matches!(
        template,
        TaskTemplateId::Scan
            | TaskTemplateId::ConvertToTranslatableFormat
            | TaskTemplateId::CopyToTargetLanguages
    )
}

#[derive(Debug, Clone)]
struct SourceEntry {
    relative: PathBuf,
    file: ProjectFile,
}

/// In-memory project held by [`DryRunService`].
#[derive(Debug, Clone)]
pub struct DryRunProject {
    pub id: ProjectId,
    pub name: String,
    pub source_language: Option<Language>,
    pub target_languages: Vec<Language>,
    pub local_project_folder: PathBuf,
    sources: Vec<SourceEntry>,
    targets: BTreeMap<Language, Vec<ProjectFile>>,
    reference_files: Vec<BilingualFileMapping>,
    history: Vec<TaskTemplateId>,
    saved: bool,
}

impl DryRunProject {
    fn new(id: ProjectId, name: String, folder: PathBuf) -> Self {
        Self {
            id,
            name,
            source_language: None,
            target_languages: Vec::new(),
            local_project_folder: folder,
            sources: Vec::new(),
            targets: BTreeMap::new(),
            reference_files: Vec::new(),
            history: Vec::new(),
            saved: false,
        }
    }

    /// Templates that completed, in run order.
    pub fn history(&self) -> &[TaskTemplateId] {
        &self.history
    }

    pub fn reference_files(&self) -> &[BilingualFileMapping] {
        &self.reference_files
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    fn has_completed(&self, template: TaskTemplateId) -> bool {
        self.history.contains(&template)
    }

    fn knows_file(&self, id: &FileId, target: bool) -> bool {
        if target {
            self.targets.values().flatten().any(|f| &f.id == id)
        } else {
            self.sources.iter().any(|e| &e.file.id == id)
        }
    }

    fn materialize_targets(&mut self) {
        let mut targets = BTreeMap::new();
        for language in &self.target_languages {
            let files = self
                .sources
                .iter()
                .map(|entry| {
                    let mut bilingual = self
                        .local_project_folder
                        .join(language.tag())
                        .join(&entry.relative);
                    bilingual.set_file_name(bilingual_file_name(&entry.file.name));
                    ProjectFile {
                        id: file_id(language, &entry.relative),
                        name: entry.file.name.clone(),
                        language: language.clone(),
                        local_path: bilingual,
                    }
                })
                .collect::<Vec<_>>();
            targets.insert(language.clone(), files);
        }
        self.targets = targets;
    }
}

/// Stable identifier for `relative` in the `language` view.
fn file_id(language: &Language, relative: &Path) -> FileId {
    let key = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    let mut h = Sha256::new();
    h.update(language.tag().as_bytes());
    h.update(b":");
    h.update(key.as_bytes());
    let digest = hex::encode(h.finalize());
    FileId(digest[..16].to_owned())
}

fn not_found(path: &Path, what: &str) -> ServiceError {
    ServiceError::Io {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::NotFound, format!("{what} does not exist")),
    }
}

fn message(level: MessageLevel, text: String, file_id: Option<FileId>) -> TaskMessage {
    TaskMessage {
        level,
        source: MESSAGE_SOURCE.to_owned(),
        text,
        file_id,
    }
}

/// Project service that never touches the disk beyond listing input files
/// and checking package paths.
#[derive(Debug, Default)]
pub struct DryRunService {
    next_id: u64,
}

impl DryRunService {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ProjectId {
        self.next_id += 1;
        ProjectId(format!("dry-run-{}", self.next_id))
    }
}

impl ProjectService for DryRunService {
    type Project = DryRunProject;

    fn create_project(&mut self, info: &ProjectInfo) -> Result<DryRunProject, ServiceError> {
        if info.name.trim().is_empty() {
            return Err(ServiceError::Creation("project name is empty".into()));
        }
        if info.local_project_folder.as_os_str().is_empty() {
            return Err(ServiceError::Creation("project folder is empty".into()));
        }
        if info.target_languages.is_empty() {
            return Err(ServiceError::Creation("no target languages".into()));
        }
        if info.target_languages.contains(&info.source_language) {
            return Err(ServiceError::Creation(format!(
                "source language {} is also a target language",
                info.source_language
            )));
        }

        let mut project = DryRunProject::new(
            self.allocate_id(),
            info.name.clone(),
            info.local_project_folder.clone(),
        );
        project.source_language = Some(info.source_language.clone());
        project.target_languages = info.target_languages.clone();
        tracing::debug!(id = %project.id, name = %project.name, "dry-run project created");
        Ok(project)
    }

    fn add_folder_with_files(
        &mut self,
        project: &mut DryRunProject,
        folder: &Path,
        recursive: bool,
    ) -> Result<(), ServiceError> {
        if !folder.is_dir() {
            return Err(not_found(folder, "input folder"));
        }
        let language = project
            .source_language
            .clone()
            .ok_or_else(|| ServiceError::Creation("project has no source language".into()))?;

        let mut walker = WalkDir::new(folder).min_depth(1).sort_by_file_name();
        if !recursive {
            walker = walker.max_depth(1);
        }
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(folder).to_path_buf();
                ServiceError::Io {
                    path,
                    source: e.into(),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(folder)
                .unwrap_or(entry.path())
                .to_path_buf();
            if project.sources.iter().any(|e| e.relative == relative) {
                continue;
            }
            let file = ProjectFile {
                id: file_id(&language, &relative),
                name: entry.file_name().to_string_lossy().into_owned(),
                language: language.clone(),
                local_path: entry.path().to_path_buf(),
            };
            project.sources.push(SourceEntry { relative, file });
        }
        tracing::debug!(count = project.sources.len(), folder = %folder.display(), "files added");
        Ok(())
    }

    fn create_from_package(
        &mut self,
        package: &Path,
        output: &Path,
    ) -> Result<(DryRunProject, PackageImport), ServiceError> {
        if !package.is_file() {
            return Err(ServiceError::Import {
                path: package.to_path_buf(),
                reason: "package not found".into(),
            });
        }
        let is_package = package
            .extension()
            .map(|e| e.to_string_lossy().eq_ignore_ascii_case(PACKAGE_EXTENSION))
            .unwrap_or(false);
        if !is_package {
            return Err(ServiceError::Import {
                path: package.to_path_buf(),
                reason: format!("not a .{PACKAGE_EXTENSION} project package"),
            });
        }
        if output.as_os_str().is_empty() {
            return Err(ServiceError::Creation("project folder is empty".into()));
        }

        let name = package
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let project = DryRunProject::new(self.allocate_id(), name, output.to_path_buf());
        let import = PackageImport {
            package_path: package.to_path_buf(),
            status: TaskStatus::Completed,
        };
        Ok((project, import))
    }

    fn save(&mut self, project: &mut DryRunProject) -> Result<(), ServiceError> {
        if project.local_project_folder.as_os_str().is_empty() {
            return Err(ServiceError::Persistence("project folder is empty".into()));
        }
        project.saved = true;
        Ok(())
    }

    fn source_language_files(&self, project: &DryRunProject) -> Result<Vec<ProjectFile>, ServiceError> {
        Ok(project.sources.iter().map(|e| e.file.clone()).collect())
    }

    fn target_language_files(
        &self,
        project: &DryRunProject,
        language: &Language,
    ) -> Result<Vec<ProjectFile>, ServiceError> {
        if !project.target_languages.contains(language) {
            return Err(ServiceError::Creation(format!(
                "{language} is not a target language of '{}'",
                project.name
            )));
        }
        Ok(project.targets.get(language).cloned().unwrap_or_default())
    }

    fn add_bilingual_reference_files(
        &mut self,
        project: &mut DryRunProject,
        mappings: &[BilingualFileMapping],
    ) -> Result<(), ServiceError> {
        for mapping in mappings {
            if !project.knows_file(&mapping.file_id, false) {
                return Err(ServiceError::Creation(format!(
                    "reference file {} points at unknown file {}",
                    mapping.bilingual_path.display(),
                    mapping.file_id
                )));
            }
        }
        project.reference_files.extend_from_slice(mappings);
        Ok(())
    }

    fn run_automatic_task(
        &mut self,
        project: &mut DryRunProject,
        file_ids: &[FileId],
        template: TaskTemplateId,
    ) -> Result<TaskRun, ServiceError> {
        let mut run = TaskRun::new(template);
        run.statuses.push(TaskStatusEvent::new(TaskStatus::Created, 0));

        if let Some(required) = prerequisite(template) {
            if !project.has_completed(required) {
                run.messages.push(message(
                    MessageLevel::Error,
                    format!("{template} requires {required} to have completed"),
                    None,
                ));
                run.statuses.push(TaskStatusEvent::new(TaskStatus::Failed, 0));
                return Ok(run);
            }
        }

        let target = runs_on_target_files(template);
        if let Some(stray) = file_ids.iter().find(|id| !project.knows_file(id, target)) {
            let view = if target { "target" } else { "source" };
            run.messages.push(message(
                MessageLevel::Error,
                format!("{template} expects {view}-language files"),
                Some(stray.clone()),
            ));
            run.statuses.push(TaskStatusEvent::new(TaskStatus::Invalid, 0));
            return Ok(run);
        }

        run.statuses.push(TaskStatusEvent::new(TaskStatus::Assigned, 0));
        run.statuses.push(TaskStatusEvent::new(TaskStatus::Started, 0));
        if file_ids.is_empty() {
            run.messages.push(message(
                MessageLevel::Warning,
                format!("{template} has no files to process"),
                None,
            ));
        } else {
            run.messages.push(message(
                MessageLevel::Information,
                format!("would run {template} over {} file(s)", file_ids.len()),
                None,
            ));
        }

        if template == TaskTemplateId::PerfectMatch {
            for mapping in &project.reference_files {
                run.messages.push(message(
                    MessageLevel::Information,
                    format!("perfect match source {}", mapping.bilingual_path.display()),
                    Some(mapping.file_id.clone()),
                ));
            }
        }
        if template == TaskTemplateId::CopyToTargetLanguages {
            project.materialize_targets();
        }

        project.history.push(template);
        run.statuses.push(TaskStatusEvent::new(TaskStatus::Completed, 100));
        Ok(run)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
