//! The project service the sequencer drives.
//!
//! The service owns the project store, task engine, translation memories and
//! file conversion. The sequencer only issues commands against the handle it
//! gets back from [`ProjectService::create_project`] or
//! [`ProjectService::create_from_package`].

use std::path::Path;

use lingo_core::{
    BilingualFileMapping, FileId, Language, PackageImport, ProjectFile, ProjectInfo,
    ServiceError, TaskRun, TaskTemplateId,
};

pub trait ProjectService {
    /// Opaque handle to a project owned by the service.
    type Project;

    /// Create an empty project container at `info.local_project_folder`.
    fn create_project(&mut self, info: &ProjectInfo) -> Result<Self::Project, ServiceError>;

    /// Add every file under `folder` as a source document.
    fn add_folder_with_files(
        &mut self,
        project: &mut Self::Project,
        folder: &Path,
        recursive: bool,
    ) -> Result<(), ServiceError>;

    /// Build a project from a project package, unpacked under `output`.
    fn create_from_package(
        &mut self,
        package: &Path,
        output: &Path,
    ) -> Result<(Self::Project, PackageImport), ServiceError>;

    fn save(&mut self, project: &mut Self::Project) -> Result<(), ServiceError>;

    /// Source-language documents, in project order.
    fn source_language_files(&self, project: &Self::Project)
        -> Result<Vec<ProjectFile>, ServiceError>;

    /// Target-language view of the documents for `language`, in project order.
    fn target_language_files(
        &self,
        project: &Self::Project,
        language: &Language,
    ) -> Result<Vec<ProjectFile>, ServiceError>;

    fn add_bilingual_reference_files(
        &mut self,
        project: &mut Self::Project,
        mappings: &[BilingualFileMapping],
    ) -> Result<(), ServiceError>;

    /// Run `template` over `file_ids` and return once the engine has stopped
    /// reporting for this run. The returned record holds every status and
    /// message event of this run and nothing else.
    fn run_automatic_task(
        &mut self,
        project: &mut Self::Project,
        file_ids: &[FileId],
        template: TaskTemplateId,
    ) -> Result<TaskRun, ServiceError>;
}
