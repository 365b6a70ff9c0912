//! Capability traits for bilingual content processors.
//!
//! A processor implements only the capabilities it needs and overrides only
//! the callbacks it cares about; every method has a no-op default.
//!
//! Callback order for one document:
//!
//! ```text
//! initialize → (set_file_properties → process_paragraph_unit* → file_complete)* → complete
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::types::Language;

/// Document-level properties passed to [`BilingualContentHandler::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentProperties {
    pub source_language: Language,
    pub target_language: Option<Language>,
}

/// Per-file properties passed to [`BilingualContentHandler::set_file_properties`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProperties {
    pub original_path: PathBuf,
    pub file_type_id: String,
}

/// A paragraph with source and optional target text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphUnit {
    pub id: String,
    pub source: String,
    pub target: Option<String>,
    /// Structure units carry layout (headings, tables) rather than
    /// localizable text.
    pub is_structure: bool,
}

/// Output file settings supplied before native output is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeOutputProperties {
    pub output_path: PathBuf,
}

/// Output file name proposed by the host for a converted file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputFileInfo {
    pub file_name: Option<String>,
}

/// Objects shared between components of one conversion.
#[derive(Debug, Clone, Default)]
pub struct SharedObjects {
    entries: HashMap<String, String>,
}

impl SharedObjects {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

/// Receives bilingual content as a document is parsed.
pub trait BilingualContentHandler {
    fn initialize(&mut self, _document: &DocumentProperties) {}
    fn set_file_properties(&mut self, _file: &FileProperties) {}
    fn process_paragraph_unit(&mut self, _unit: &ParagraphUnit) {}
    fn file_complete(&mut self) {}
    fn complete(&mut self) {}
}

/// Participates in native output generation.
pub trait NativeOutputSettingsAware {
    fn set_output_properties(&mut self, _properties: &NativeOutputProperties) {}
    fn proposed_output_file(&mut self, _file: &FileProperties, _proposed: &mut OutputFileInfo) {}
}

/// Receives the shared object registry of the conversion.
pub trait SharedObjectsAware {
    fn set_shared_objects(&mut self, _objects: &SharedObjects) {}
}

/// Implements every capability and overrides nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopContentHandler;

impl BilingualContentHandler for NoopContentHandler {}
impl NativeOutputSettingsAware for NoopContentHandler {}
impl SharedObjectsAware for NoopContentHandler {}

/// Records every paragraph unit and the most recent properties it saw.
#[derive(Debug, Default, Clone)]
pub struct ParagraphCollector {
    pub paragraph_units: Vec<ParagraphUnit>,
    pub last_document_properties: Option<DocumentProperties>,
    pub last_file_properties: Option<FileProperties>,
    pub last_structure_unit: Option<ParagraphUnit>,
    pub last_localizable_unit: Option<ParagraphUnit>,
    pub previous_localizable_unit: Option<ParagraphUnit>,
    pub files_completed: usize,
    pub completed: bool,
}

impl BilingualContentHandler for ParagraphCollector {
    fn initialize(&mut self, document: &DocumentProperties) {
        self.last_document_properties = Some(document.clone());
        self.completed = false;
    }

    fn set_file_properties(&mut self, file: &FileProperties) {
        self.last_file_properties = Some(file.clone());
    }

    fn process_paragraph_unit(&mut self, unit: &ParagraphUnit) {
        if unit.is_structure {
            self.last_structure_unit = Some(unit.clone());
        } else {
            self.previous_localizable_unit = self.last_localizable_unit.replace(unit.clone());
        }
        self.paragraph_units.push(unit.clone());
    }

    fn file_complete(&mut self) {
        self.files_completed += 1;
    }

    fn complete(&mut self) {
        self.completed = true;
    }
}

impl SharedObjectsAware for ParagraphCollector {}

/// Feed a parsed document through `handler` in callback order.
pub fn replay<H: BilingualContentHandler + ?Sized>(
    handler: &mut H,
    document: &DocumentProperties,
    files: &[(FileProperties, Vec<ParagraphUnit>)],
) {
    handler.initialize(document);
    for (file, units) in files {
        handler.set_file_properties(file);
        for unit in units {
            handler.process_paragraph_unit(unit);
        }
        handler.file_complete();
    }
    handler.complete();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str, is_structure: bool) -> ParagraphUnit {
        ParagraphUnit {
            id: id.into(),
            source: format!("text {id}"),
            target: None,
            is_structure,
        }
    }

    fn document() -> DocumentProperties {
        DocumentProperties {
            source_language: "en-US".parse().unwrap(),
            target_language: Some("fr-FR".parse().unwrap()),
        }
    }

    fn file(name: &str) -> FileProperties {
        FileProperties {
            original_path: PathBuf::from(name),
            file_type_id: "SimpleText v1.0".into(),
        }
    }

    #[test]
    fn collector_tracks_last_and_previous_units() {
        let mut collector = ParagraphCollector::default();
        replay(
            &mut collector,
            &document(),
            &[(
                file("a.txt"),
                vec![unit("1", false), unit("h", true), unit("2", false), unit("3", false)],
            )],
        );

        assert_eq!(collector.paragraph_units.len(), 4);
        assert_eq!(collector.last_structure_unit.as_ref().unwrap().id, "h");
        assert_eq!(collector.last_localizable_unit.as_ref().unwrap().id, "3");
        assert_eq!(collector.previous_localizable_unit.as_ref().unwrap().id, "2");
        assert_eq!(collector.files_completed, 1);
        assert!(collector.completed);
        assert_eq!(collector.last_document_properties, Some(document()));
    }

    #[test]
    fn collector_keeps_last_file_properties() {
        let mut collector = ParagraphCollector::default();
        replay(
            &mut collector,
            &document(),
            &[(file("a.txt"), vec![]), (file("b.txt"), vec![unit("1", false)])],
        );
        assert_eq!(collector.files_completed, 2);
        assert_eq!(
            collector.last_file_properties.unwrap().original_path,
            PathBuf::from("b.txt")
        );
        assert!(collector.previous_localizable_unit.is_none());
    }

    #[test]
    fn noop_handler_accepts_every_callback() {
        let mut handler = NoopContentHandler;
        replay(&mut handler, &document(), &[(file("a.txt"), vec![unit("1", false)])]);

        let mut proposed = OutputFileInfo::default();
        handler.set_output_properties(&NativeOutputProperties {
            output_path: PathBuf::from("out/a.txt"),
        });
        handler.proposed_output_file(&file("a.txt"), &mut proposed);
        assert_eq!(proposed, OutputFileInfo::default());

        let mut shared = SharedObjects::default();
        shared.insert("segmenter", "default");
        handler.set_shared_objects(&shared);
        assert_eq!(shared.get("segmenter"), Some("default"));
    }

    #[test]
    fn handlers_work_as_trait_objects() {
        let mut handlers: Vec<Box<dyn BilingualContentHandler>> = Vec::new();
        handlers.push(Box::new(NoopContentHandler));
        handlers.push(Box::new(ParagraphCollector::default()));
        for handler in handlers.iter_mut() {
            replay(handler.as_mut(), &document(), &[(file("a.txt"), vec![unit("1", false)])]);
        }
    }
}
