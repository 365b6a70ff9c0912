//! Lingo core library — domain types, settings persistence, errors.
//!
//! - [`types`] — newtypes, settings, project and task records
//! - [`error`] — [`SettingsError`], [`ServiceError`]
//! - [`settings`] — load / save / validate settings files
//! - [`content`] — capability traits for bilingual content processors

pub mod content;
pub mod error;
pub mod settings;
pub mod types;

pub use error::{ServiceError, SettingsError};
pub use types::{
    BilingualFileMapping, FileId, Language, MessageLevel, PackageImport, ProjectFile, ProjectId,
    ProjectInfo, ProjectSettings, StatusPolicy, TaskMessage, TaskRun, TaskStatus,
    TaskStatusEvent, TaskTemplateId,
};
