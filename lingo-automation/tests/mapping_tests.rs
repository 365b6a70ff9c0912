//! Bilingual reference-file probing against real directory trees.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use lingo_automation::compute_bilingual_file_mappings;
use lingo_core::{FileId, Language, ProjectFile};
use rstest::rstest;
use tempfile::TempDir;

fn lang(tag: &str) -> Language {
    tag.parse().unwrap()
}

fn source(id: &str, name: &str) -> ProjectFile {
    ProjectFile {
        id: FileId::from(id),
        name: name.into(),
        language: lang("en-US"),
        local_path: PathBuf::from("/in").join(name),
    }
}

fn touch(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"<xliff/>").unwrap();
    path
}

#[test]
fn existing_bilingual_file_yields_one_mapping() {
    let old = TempDir::new().unwrap();
    let expected = touch(old.path(), "fr-FR/report.docx.sdlxliff");

    let mappings = compute_bilingual_file_mappings(
        &[lang("fr-FR")],
        &[source("f1", "report.docx")],
        old.path(),
    );
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].bilingual_path, expected);
    assert_eq!(mappings[0].language, lang("fr-FR"));
    assert_eq!(mappings[0].file_id, FileId::from("f1"));
}

#[test]
fn missing_bilingual_file_yields_nothing() {
    let old = TempDir::new().unwrap();
    fs::create_dir_all(old.path().join("fr-FR")).unwrap();

    let mappings = compute_bilingual_file_mappings(
        &[lang("fr-FR")],
        &[source("f1", "report.docx")],
        old.path(),
    );
    assert!(mappings.is_empty());
}

#[test]
fn missing_previous_project_yields_nothing() {
    let mappings = compute_bilingual_file_mappings(
        &[lang("fr-FR")],
        &[source("f1", "report.docx")],
        Path::new("/no/such/previous/project"),
    );
    assert!(mappings.is_empty());
}

#[rstest]
#[case("x.sdlxliff", "fr-FR/x.sdlxliff", true)]
#[case("x.sdlxliff", "fr-FR/x.sdlxliff.sdlxliff", false)]
#[case("x.docx", "fr-FR/x.docx.sdlxliff", true)]
#[case("x.docx", "fr-FR/x.docx", false)]
#[case("x.docx", "de-DE/x.docx.sdlxliff", false)]
fn suffix_is_appended_only_when_missing(
    #[case] name: &str,
    #[case] on_disk: &str,
    #[case] found: bool,
) {
    let old = TempDir::new().unwrap();
    touch(old.path(), on_disk);

    let mappings = compute_bilingual_file_mappings(&[lang("fr-FR")], &[source("f1", name)], old.path());
    assert_eq!(!mappings.is_empty(), found, "{name} vs {on_disk}");
}

#[test]
fn directory_named_like_bilingual_file_is_ignored() {
    let old = TempDir::new().unwrap();
    fs::create_dir_all(old.path().join("fr-FR/report.docx.sdlxliff")).unwrap();

    let mappings = compute_bilingual_file_mappings(
        &[lang("fr-FR")],
        &[source("f1", "report.docx")],
        old.path(),
    );
    assert!(mappings.is_empty());
}

#[test]
fn language_order_does_not_change_the_result() {
    let old = TempDir::new().unwrap();
    touch(old.path(), "fr-FR/a.docx.sdlxliff");
    touch(old.path(), "fr-FR/b.docx.sdlxliff");
    touch(old.path(), "de-DE/b.docx.sdlxliff");
    let files = [source("a", "a.docx"), source("b", "b.docx"), source("c", "c.docx")];

    let forward: BTreeSet<_> =
        compute_bilingual_file_mappings(&[lang("fr-FR"), lang("de-DE")], &files, old.path())
            .into_iter()
            .collect();
    let backward: BTreeSet<_> =
        compute_bilingual_file_mappings(&[lang("de-DE"), lang("fr-FR")], &files, old.path())
            .into_iter()
            .collect();

    assert_eq!(forward, backward);
    assert_eq!(forward.len(), 3);
    assert!(forward.iter().all(|m| m.file_id != FileId::from("c")));
}
