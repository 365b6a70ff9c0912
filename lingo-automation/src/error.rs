//! Error types for lingo-automation.
//!
//! Callers only ever see [`ProjectError`]: `CreationFailed` or `ImportFailed`,
//! each carrying the underlying cause via `source()`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use lingo_core::{ServiceError, TaskStatus, TaskTemplateId};

/// A step of project creation, used to annotate service failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CreateContainer,
    AddFiles,
    ListSourceFiles,
    AddReferenceFiles,
    RunTask(TaskTemplateId),
    ListTargetFiles,
    Save,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::CreateContainer => write!(f, "create project container"),
            Stage::AddFiles => write!(f, "add input files"),
            Stage::ListSourceFiles => write!(f, "list source-language files"),
            Stage::AddReferenceFiles => write!(f, "add bilingual reference files"),
            Stage::RunTask(template) => write!(f, "run task {template}"),
            Stage::ListTargetFiles => write!(f, "list target-language files"),
            Stage::Save => write!(f, "save project"),
        }
    }
}

/// Why a single step of project creation stopped the run.
#[derive(Debug, Error)]
pub enum StageError {
    /// The project service returned an error.
    #[error("{stage} failed: {source}")]
    Service {
        stage: Stage,
        #[source]
        source: ServiceError,
    },

    /// A task reported Failed, Rejected or Invalid.
    #[error("task {template} reported {status} ({} error message(s))", .errors.len())]
    TaskEscalated {
        template: TaskTemplateId,
        status: TaskStatus,
        errors: Vec<String>,
    },

    /// A task was cancelled; the remaining tasks were not started.
    #[error("task {template} was {status}; remaining tasks skipped")]
    SequenceHalted {
        template: TaskTemplateId,
        status: TaskStatus,
    },
}

impl StageError {
    /// Closure adapter for `map_err` on service calls.
    pub(crate) fn at(stage: Stage) -> impl FnOnce(ServiceError) -> StageError {
        move |source| StageError::Service { stage, source }
    }
}

/// Cause of a failed package import.
#[derive(Debug, Error)]
pub enum ImportCause {
    #[error("settings do not name a package")]
    MissingPackagePath,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// The only two errors surfaced to callers of the sequencer.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("problem during creation of project '{project}'")]
    CreationFailed {
        project: String,
        #[source]
        source: StageError,
    },

    #[error("{}", import_failed_message(.package))]
    ImportFailed {
        /// `None` when the settings named no package.
        package: Option<PathBuf>,
        #[source]
        source: ImportCause,
    },
}

fn import_failed_message(package: &Option<PathBuf>) -> String {
    match package {
        Some(path) => format!("problem during import of package '{}'", path.display()),
        None => "problem during package import".to_owned(),
    }
}
