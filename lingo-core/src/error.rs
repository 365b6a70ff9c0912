//! Error types for lingo-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::TaskTemplateId;

/// All errors that can arise from loading or saving settings files.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Underlying I/O failure (permission denied, disk full, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed settings file; carries the path and serde_yaml line context.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The settings file did not exist at the expected path.
    #[error("settings not found at {path}")]
    NotFound { path: PathBuf },

    /// A field parsed but holds an unusable value.
    #[error("invalid settings field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failures reported by a project service implementation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The project container could not be created (bad path, bad language).
    #[error("cannot create project: {0}")]
    Creation(String),

    /// The package is corrupt, missing or incompatible.
    #[error("cannot import package {path}: {reason}")]
    Import { path: PathBuf, reason: String },

    /// The project could not be saved.
    #[error("cannot save project: {0}")]
    Persistence(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The task engine refused or could not execute a template.
    #[error("task {template} could not run: {reason}")]
    Task {
        template: TaskTemplateId,
        reason: String,
    },
}

/// Convenience constructor for [`SettingsError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SettingsError {
    SettingsError::Io {
        path: path.into(),
        source,
    }
}
