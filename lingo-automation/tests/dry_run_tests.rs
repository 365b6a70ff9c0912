//! End-to-end runs of the sequencer against the dry-run service.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use lingo_automation::{
    create_project, import_from_settings, DryRunService, FileScope, ImportCause, ProjectError,
    StageError, SOURCE_TASKS, TARGET_TASKS,
};
use lingo_core::{ProjectSettings, ServiceError, StatusPolicy, TaskStatus};
use tempfile::TempDir;

fn write(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"content").unwrap();
}

fn workspace() -> (TempDir, ProjectSettings) {
    let root = TempDir::new().expect("tempdir");
    let input = root.path().join("source");
    write(&input, "report.docx");
    write(&input, "chapters/one.docx");
    write(&input, "chapters/deep/two.txt");
    write(&input, "legacy.sdlxliff");

    let old = root.path().join("previous");
    write(&old, "fr-FR/report.docx.sdlxliff");
    write(&old, "fr-FR/legacy.sdlxliff");

    let settings = ProjectSettings {
        project_name: "brochure".into(),
        source_language: "en-US".parse().unwrap(),
        target_language: "fr-FR".parse().unwrap(),
        input_folder: input,
        output_path: root.path().join("project"),
        package_path: None,
        reference_project: Some(old),
        status_policy: StatusPolicy::Strict,
    };
    (root, settings)
}

#[test]
fn source_files_match_recursive_listing() {
    let (_root, settings) = workspace();
    let mut service = DryRunService::new();
    let report = create_project(&mut service, &settings).expect("create");

    let listed: BTreeSet<PathBuf> = walk(&settings.input_folder);
    let in_project: BTreeSet<PathBuf> = report
        .source_files
        .iter()
        .map(|f| f.local_path.clone())
        .collect();
    assert_eq!(in_project, listed);
    assert_eq!(report.target_files.len(), listed.len());
}

#[test]
fn full_run_completes_every_stage_in_order() {
    let (_root, settings) = workspace();
    let mut service = DryRunService::new();
    let report = create_project(&mut service, &settings).expect("create");

    let expected: Vec<_> = SOURCE_TASKS.iter().chain(TARGET_TASKS.iter()).copied().collect();
    assert_eq!(report.project.history(), expected.as_slice());
    let ran: Vec<_> = report.stages.iter().map(|s| s.template).collect();
    assert_eq!(ran, expected);

    assert!(report.stages[..3].iter().all(|s| s.scope == FileScope::Source));
    assert!(report.stages[3..].iter().all(|s| s.scope == FileScope::Target));
    assert!(report
        .stages
        .iter()
        .all(|s| s.final_status == Some(TaskStatus::Completed) && s.errors == 0));
    assert!(report.project.is_saved());
}

#[test]
fn reference_files_are_attached() {
    let (_root, settings) = workspace();
    let mut service = DryRunService::new();
    let report = create_project(&mut service, &settings).expect("create");

    let mut names: Vec<_> = report
        .mappings
        .iter()
        .map(|m| m.bilingual_path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["legacy.sdlxliff", "report.docx.sdlxliff"]);
    assert_eq!(report.project.reference_files(), report.mappings.as_slice());
}

#[test]
fn target_names_follow_bilingual_naming() {
    let (_root, settings) = workspace();
    let mut service = DryRunService::new();
    let report = create_project(&mut service, &settings).expect("create");

    let mut names: Vec<String> = report
        .target_files
        .iter()
        .map(|f| f.local_path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["legacy.sdlxliff", "one.docx.sdlxliff", "report.docx.sdlxliff", "two.txt.sdlxliff"]
    );
    let legacy = report
        .target_files
        .iter()
        .find(|f| f.name == "legacy.sdlxliff")
        .expect("legacy target");
    assert_eq!(
        legacy.local_path,
        settings.output_path.join("fr-FR").join("legacy.sdlxliff")
    );
    assert!(report.stages.iter().all(|s| s.percent_complete == 100));
}

#[test]
fn dry_run_writes_nothing() {
    let (_root, settings) = workspace();
    let mut service = DryRunService::new();
    create_project(&mut service, &settings).expect("create");
    assert!(!settings.output_path.exists(), "dry run must not create the project folder");
}

#[test]
fn empty_input_folder_completes_with_warnings() {
    let (root, mut settings) = workspace();
    settings.input_folder = root.path().join("empty");
    fs::create_dir_all(&settings.input_folder).unwrap();

    let mut service = DryRunService::new();
    let report = create_project(&mut service, &settings).expect("create");
    assert!(report.source_files.is_empty());
    assert!(report.stages.iter().all(|s| s.warnings == 1 && s.file_count == 0));
}

#[test]
fn missing_input_folder_is_creation_failure() {
    let (root, mut settings) = workspace();
    settings.input_folder = root.path().join("missing");

    let mut service = DryRunService::new();
    let err = create_project(&mut service, &settings).unwrap_err();
    let ProjectError::CreationFailed { source, .. } = err else {
        panic!("expected CreationFailed");
    };
    assert!(matches!(
        source,
        StageError::Service {
            source: ServiceError::Io { .. },
            ..
        }
    ));
}

#[test]
fn package_import_through_settings() {
    let (root, mut settings) = workspace();
    let package = root.path().join("brochure.sdlppx");
    fs::write(&package, b"PK").unwrap();
    settings.package_path = Some(package.clone());

    let mut service = DryRunService::new();
    let report = import_from_settings(&mut service, &settings).expect("import");
    assert!(report.project.is_saved());
    assert!(report.project.history().is_empty());
    assert_eq!(report.import.package_path, package);
}

#[test]
fn missing_package_is_import_failure() {
    let (root, mut settings) = workspace();
    settings.package_path = Some(root.path().join("gone.sdlppx"));

    let mut service = DryRunService::new();
    let err = import_from_settings(&mut service, &settings).unwrap_err();
    assert!(matches!(
        err,
        ProjectError::ImportFailed {
            source: ImportCause::Service(ServiceError::Import { .. }),
            ..
        }
    ));
}

fn walk(dir: &Path) -> BTreeSet<PathBuf> {
    let mut out = BTreeSet::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                out.insert(path);
            }
        }
    }
    out
}
