//! Domain types for project automation.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Types that appear in settings files are serializable via serde + serde_yaml.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A language tag such as `fr-FR` or `de-DE`.
///
/// The tag is used verbatim as a directory name when probing previous
/// projects, so it may not be empty or contain path separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub fn tag(&self) -> &str {
        &self.0
    }
}

/// Rejected language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLanguage(pub String);

impl fmt::Display for InvalidLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid language tag '{}'", self.0)
    }
}

impl std::error::Error for InvalidLanguage {}

impl FromStr for Language {
    type Err = InvalidLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let separator = |c: char| c == '/' || c == '\\';
        if tag.is_empty() || tag.contains(separator) || tag == "." || tag == ".." {
            return Err(InvalidLanguage(s.to_owned()));
        }
        Ok(Self(tag.to_owned()))
    }
}

impl TryFrom<String> for Language {
    type Error = InvalidLanguage;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Language> for String {
    fn from(l: Language) -> Self {
        l.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque identifier the project service assigns to a project file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(pub String);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FileId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FileId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Opaque identifier the project service assigns to a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// How the sequencer reacts to the task statuses reported after each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// Failed, Rejected and Invalid abort the run; Cancelling and Cancelled
    /// stop the remaining sequence.
    #[default]
    Strict,
    /// Every status is inspected and ignored.
    Lenient,
}

impl fmt::Display for StatusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusPolicy::Strict => write!(f, "strict"),
            StatusPolicy::Lenient => write!(f, "lenient"),
        }
    }
}

/// Input for a single orchestration run. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub project_name: String,
    pub source_language: Language,
    pub target_language: Language,
    /// Folder whose files (recursively) seed the project.
    pub input_folder: PathBuf,
    /// Local project folder.
    pub output_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_path: Option<PathBuf>,
    /// Root of a previous project probed for bilingual reference files.
    /// Falls back to `output_path` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_project: Option<PathBuf>,
    #[serde(default)]
    pub status_policy: StatusPolicy,
}

impl ProjectSettings {
    /// Directory probed for `<lang>/<file>.sdlxliff` artifacts.
    pub fn reference_root(&self) -> &Path {
        self.reference_project.as_deref().unwrap_or(&self.output_path)
    }

    pub fn target_languages(&self) -> Vec<Language> {
        vec![self.target_language.clone()]
    }
}

// ---------------------------------------------------------------------------
// Project metadata
// ---------------------------------------------------------------------------

pub const PROJECT_CREATED_BY: &str = "API automation";
pub const PROJECT_DESCRIPTION: &str = "Project created by API";
pub const DUE_DATE_OFFSET_DAYS: i64 = 7;

/// Metadata handed to the project service when a new project is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub source_language: Language,
    pub target_languages: Vec<Language>,
    pub local_project_folder: PathBuf,
}

impl ProjectInfo {
    /// Builds metadata for `settings`, due [`DUE_DATE_OFFSET_DAYS`] after `now`.
    pub fn from_settings(settings: &ProjectSettings, now: DateTime<Utc>) -> Self {
        Self {
            name: settings.project_name.clone(),
            description: PROJECT_DESCRIPTION.to_owned(),
            created_by: PROJECT_CREATED_BY.to_owned(),
            created_at: now,
            due_date: now + Duration::days(DUE_DATE_OFFSET_DAYS),
            source_language: settings.source_language.clone(),
            target_languages: settings.target_languages(),
            local_project_folder: settings.output_path.clone(),
        }
    }
}

/// A document inside a project, in one language view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub id: FileId,
    /// File name including extension, e.g. `report.docx`.
    pub name: String,
    pub language: Language,
    pub local_path: PathBuf,
}

/// Links a project file to a bilingual artifact from a previous project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BilingualFileMapping {
    pub bilingual_path: PathBuf,
    pub language: Language,
    pub file_id: FileId,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Named automated task templates understood by the project service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskTemplateId {
    Scan,
    ConvertToTranslatableFormat,
    CopyToTargetLanguages,
    PerfectMatch,
    AnalyzeFiles,
    PreTranslateFiles,
    PopulateProjectTranslationMemories,
}

impl TaskTemplateId {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskTemplateId::Scan => "Scan",
            TaskTemplateId::ConvertToTranslatableFormat => "ConvertToTranslatableFormat",
            TaskTemplateId::CopyToTargetLanguages => "CopyToTargetLanguages",
            TaskTemplateId::PerfectMatch => "PerfectMatch",
            TaskTemplateId::AnalyzeFiles => "AnalyzeFiles",
            TaskTemplateId::PreTranslateFiles => "PreTranslateFiles",
            TaskTemplateId::PopulateProjectTranslationMemories => {
                "PopulateProjectTranslationMemories"
            }
        }
    }
}

impl fmt::Display for TaskTemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state reported by the task engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Created,
    Assigned,
    Started,
    Completed,
    Cancelling,
    Cancelled,
    Rejected,
    Invalid,
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Created => "created",
            TaskStatus::Assigned => "assigned",
            TaskStatus::Started => "started",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelling => "cancelling",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::Rejected => "rejected",
            TaskStatus::Invalid => "invalid",
            TaskStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One lifecycle transition of a task run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusEvent {
    pub status: TaskStatus,
    pub percent_complete: u8,
}

impl TaskStatusEvent {
    pub fn new(status: TaskStatus, percent_complete: u8) -> Self {
        Self {
            status,
            percent_complete: percent_complete.min(100),
        }
    }
}

/// Severity of a task message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Information,
    Warning,
    Error,
}

/// An informational, warning or error message emitted while a task runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMessage {
    pub level: MessageLevel,
    /// Component that raised the message.
    pub source: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<FileId>,
}

/// Completed record of one task invocation.
///
/// Each invocation gets a fresh record; diagnostics never carry over from a
/// previous run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRun {
    pub template: TaskTemplateId,
    pub statuses: Vec<TaskStatusEvent>,
    pub messages: Vec<TaskMessage>,
}

impl TaskRun {
    pub fn new(template: TaskTemplateId) -> Self {
        Self {
            template,
            statuses: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Last status reported, if any.
    pub fn final_status(&self) -> Option<TaskStatus> {
        self.statuses.last().map(|e| e.status)
    }

    pub fn count(&self, level: MessageLevel) -> usize {
        self.messages.iter().filter(|m| m.level == level).count()
    }
}

/// Outcome of importing a project package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageImport {
    pub package_path: PathBuf,
    pub status: TaskStatus,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ProjectSettings {
        ProjectSettings {
            project_name: "brochure".into(),
            source_language: "en-US".parse().unwrap(),
            target_language: "fr-FR".parse().unwrap(),
            input_folder: PathBuf::from("/in"),
            output_path: PathBuf::from("/out"),
            package_path: None,
            reference_project: None,
            status_policy: StatusPolicy::default(),
        }
    }

    #[test]
    fn language_rejects_empty_and_separators() {
        assert!("".parse::<Language>().is_err());
        assert!("  ".parse::<Language>().is_err());
        assert!("fr/FR".parse::<Language>().is_err());
        assert!("..".parse::<Language>().is_err());
        assert_eq!("de-DE".parse::<Language>().unwrap().tag(), "de-DE");
    }

    #[test]
    fn language_serde_validates() {
        let err = serde_yaml::from_str::<Language>("''").unwrap_err();
        assert!(err.to_string().contains("invalid language tag"));
        let lang: Language = serde_yaml::from_str("ja-JP").expect("parse");
        assert_eq!(lang.to_string(), "ja-JP");
    }

    #[test]
    fn reference_root_defaults_to_output() {
        let mut s = settings();
        assert_eq!(s.reference_root(), Path::new("/out"));
        s.reference_project = Some(PathBuf::from("/old"));
        assert_eq!(s.reference_root(), Path::new("/old"));
    }

    #[test]
    fn project_info_due_in_seven_days() {
        let now = Utc::now();
        let info = ProjectInfo::from_settings(&settings(), now);
        assert_eq!(info.due_date - info.created_at, Duration::days(7));
        assert_eq!(info.created_by, "API automation");
        assert_eq!(info.description, "Project created by API");
        assert_eq!(info.target_languages.len(), 1);
        assert_eq!(info.local_project_folder, PathBuf::from("/out"));
    }

    #[test]
    fn task_run_summaries() {
        let mut run = TaskRun::new(TaskTemplateId::Scan);
        assert_eq!(run.final_status(), None);
        run.statuses.push(TaskStatusEvent::new(TaskStatus::Started, 0));
        run.statuses.push(TaskStatusEvent::new(TaskStatus::Completed, 250));
        run.messages.push(TaskMessage {
            level: MessageLevel::Warning,
            source: "scan".into(),
            text: "empty file".into(),
            file_id: None,
        });
        assert_eq!(run.final_status(), Some(TaskStatus::Completed));
        assert_eq!(run.statuses[1].percent_complete, 100);
        assert_eq!(run.count(MessageLevel::Warning), 1);
        assert_eq!(run.count(MessageLevel::Error), 0);
    }

    #[test]
    fn template_display() {
        assert_eq!(TaskTemplateId::PerfectMatch.to_string(), "PerfectMatch");
        assert_eq!(StatusPolicy::Lenient.to_string(), "lenient");
        assert_eq!(TaskStatus::Cancelling.to_string(), "cancelling");
    }
}
