//! Bilingual reference-file discovery.
//!
//! Given the previous project root `/old`, languages `{fr-FR, de-DE}` and
//! files `{a.docx, b.docx}`, the probe looks for:
//!
//! ```text
//! /old/fr-FR/a.docx.sdlxliff
//! /old/fr-FR/b.docx.sdlxliff
//! /old/de-DE/a.docx.sdlxliff
//! /old/de-DE/b.docx.sdlxliff
//! ```
//!
//! Files that are already bilingual (`x.sdlxliff`) are probed as-is.

use std::path::{Path, PathBuf};

use lingo_core::{BilingualFileMapping, Language, ProjectFile};

/// Extension of bilingual files.
pub const BILINGUAL_EXTENSION: &str = ".sdlxliff";

/// Name of the bilingual file for `file_name`: the extension is appended
/// unless already present.
pub fn bilingual_file_name(file_name: &str) -> String {
    if file_name.ends_with(BILINGUAL_EXTENSION) {
        file_name.to_owned()
    } else {
        format!("{file_name}{BILINGUAL_EXTENSION}")
    }
}

/// Path at which a previous translation of `file_name` into `language` would live.
pub fn candidate_path(previous_project_root: &Path, language: &Language, file_name: &str) -> PathBuf {
    previous_project_root
        .join(language.tag())
        .join(bilingual_file_name(file_name))
}

/// Map each translatable file to an existing bilingual file in the previous
/// project, per target language. Files without a match are skipped.
pub fn compute_bilingual_file_mappings(
    target_languages: &[Language],
    translatable_files: &[ProjectFile],
    previous_project_root: &Path,
) -> Vec<BilingualFileMapping> {
    let mut mappings = Vec::new();
    for language in target_languages {
        for file in translatable_files {
            let candidate = candidate_path(previous_project_root, language, &file.name);
            if candidate.is_file() {
                tracing::debug!(
                    file = %file.name,
                    language = %language,
                    path = %candidate.display(),
                    "found bilingual reference file"
                );
                mappings.push(BilingualFileMapping {
                    bilingual_path: candidate,
                    language: language.clone(),
                    file_id: file.id.clone(),
                });
            }
        }
    }
    mappings
}
