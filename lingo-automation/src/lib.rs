//! # lingo-automation
//!
//! Project creation driven through a [`ProjectService`].
//!
//! Call [`create_project`] to build a project from settings and run the fixed
//! batch-task sequence, or [`create_project_from_package`] to import a
//! project package. [`DryRunService`] validates a run without a host.

pub mod dry_run;
pub mod error;
pub mod mapping;
pub mod sequencer;
pub mod service;

pub use dry_run::{DryRunProject, DryRunService};
pub use error::{ImportCause, ProjectError, Stage, StageError};
pub use mapping::compute_bilingual_file_mappings;
pub use sequencer::{
    create_project, create_project_at, create_project_from_package, import_from_settings,
    run_named_task, CreationReport, FileScope, ImportReport, StageReport, SOURCE_TASKS,
    TARGET_TASKS,
};
pub use service::ProjectService;
