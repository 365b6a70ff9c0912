//! Project settings files.
//!
//! Settings are plain YAML:
//!
//! ```text
//! project_name: brochure
//! source_language: en-US
//! target_language: fr-FR
//! input_folder: /work/brochure/source
//! output_path: /work/brochure/project
//! package_path: /work/brochure/brochure.sdlppx   # optional
//! reference_project: /work/brochure-2023         # optional, defaults to output_path
//! status_policy: strict                          # strict | lenient
//! ```
//!
//! Saving is atomic: serialize → `.yaml.tmp` sibling → `rename`.

use std::path::Path;

use crate::error::{io_err, SettingsError};
use crate::types::ProjectSettings;

/// Load and validate settings from `path`.
///
/// Returns `SettingsError::NotFound` if absent, `SettingsError::Parse` (with
/// path + line context) if malformed, and `SettingsError::Invalid` if a
/// required field is blank.
pub fn load(path: &Path) -> Result<ProjectSettings, SettingsError> {
    if !path.exists() {
        return Err(SettingsError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let settings: ProjectSettings =
        serde_yaml::from_str(&contents).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
    validate(&settings)?;
    Ok(settings)
}

/// Atomically write `settings` to `path`, creating parent directories.
pub fn save(path: &Path, settings: &ProjectSettings) -> Result<(), SettingsError> {
    validate(settings)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "settings.yaml".to_owned());
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    let yaml = serde_yaml::to_string(settings)?;
    std::fs::write(&tmp_path, yaml).map_err(|e| io_err(&tmp_path, e))?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(path, e));
    }
    Ok(())
}

/// Reject blank names and paths. Languages are validated when parsed.
pub fn validate(settings: &ProjectSettings) -> Result<(), SettingsError> {
    if settings.project_name.trim().is_empty() {
        return Err(invalid("project_name", "must not be empty"));
    }
    if settings.input_folder.as_os_str().is_empty() {
        return Err(invalid("input_folder", "must not be empty"));
    }
    if settings.output_path.as_os_str().is_empty() {
        return Err(invalid("output_path", "must not be empty"));
    }
    if settings.source_language == settings.target_language {
        return Err(invalid(
            "target_language",
            "must differ from source_language",
        ));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: &str) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
