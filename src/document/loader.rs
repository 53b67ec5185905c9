//! Document loading and saving
//!
//! This module contains `DocxDocument`, the in-memory form of a `.docx`
//! package that split and merge accumulate into. Loading validates the file,
//! reads the package and parses the three parts the tool rewrites; saving
//! serializes those parts back and copies every other part unchanged.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::io::{read_package_from, validate_docx_file, validate_package, write_package};
use super::models::{BodyElement, ElementKind, CONTENT_TYPES_PART};
use super::package::{rels_path_for, split_part_name, Package};
use super::parsing::body::MainDocument;
use super::parsing::content_types::ContentTypes;
use super::parsing::relationships::Relationships;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct DocxDocument {
    pub(crate) package: Package,
    pub(crate) main_part: String,
    pub(crate) main: MainDocument,
    pub(crate) relationships: Relationships,
    pub(crate) content_types: ContentTypes,
    source: Option<PathBuf>,
}

impl DocxDocument {
    /// Load a `.docx` file
    ///
    /// Fails with `Error::NotFound` or `Error::UnsupportedFormat` before
    /// touching the file contents.
    pub fn open(file_path: &Path) -> Result<Self> {
        // Validate file type before attempting to parse
        validate_docx_file(file_path)?;

        let package = Package::open(file_path)?;
        let mut document = Self::from_package(package)?;
        document.source = Some(file_path.to_path_buf());

        debug!(
            "Loaded {} with {} body elements",
            file_path.display(),
            document.elements().len()
        );
        Ok(document)
    }

    pub fn from_package(package: Package) -> Result<Self> {
        let main_part = package.main_document_name()?;
        validate_package(&package, &main_part)?;

        let main_xml = part_text(&package, &main_part)
            .ok_or_else(|| Error::InvalidPackage(format!("missing {main_part}")))?;
        let main = MainDocument::parse(&main_xml)?;

        let relationships = match part_text(&package, &rels_path_for(&main_part)) {
            Some(xml) => Relationships::parse(&xml)?,
            None => Relationships::default(),
        };
        let content_types = match part_text(&package, CONTENT_TYPES_PART) {
            Some(xml) => ContentTypes::parse(&xml)?,
            None => ContentTypes::default(),
        };

        Ok(Self {
            package,
            main_part,
            main,
            relationships,
            content_types,
            source: None,
        })
    }

    /// A new, empty document with the default styles and page setup
    pub fn blank() -> Result<Self> {
        let mut buffer = Cursor::new(Vec::new());
        docx_rs::Docx::new()
            .build()
            .pack(&mut buffer)
            .map_err(|e| Error::InvalidPackage(format!("failed to build blank document: {e}")))?;
        buffer.set_position(0);

        let mut document = Self::from_package(read_package_from(buffer)?)?;
        document.main.elements.clear();
        Ok(document)
    }

    /// An empty document sharing this one's parts, styles and section properties
    pub fn empty_like(&self) -> Self {
        let mut document = self.clone();
        document.main.elements.clear();
        document
    }

    /// Path the document was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn elements(&self) -> &[BodyElement] {
        &self.main.elements
    }

    pub fn push(&mut self, element: BodyElement) {
        self.main.elements.push(element);
    }

    /// Append a page-break paragraph written in this document's prefix
    pub fn append_page_break(&mut self) {
        let page_break = self.main.page_break();
        self.main.elements.push(page_break);
    }

    pub fn paragraph_count(&self) -> usize {
        self.count(ElementKind::Paragraph)
    }

    pub fn table_count(&self) -> usize {
        self.count(ElementKind::Table)
    }

    pub fn break_count(&self) -> usize {
        self.count(ElementKind::Break)
    }

    /// No paragraphs and no tables
    ///
    /// A paragraph holding only a page break still counts as a paragraph;
    /// only body-level breaks and markers such as bookmarks do not.
    pub fn is_empty(&self) -> bool {
        !self
            .main
            .elements
            .iter()
            .any(|element| element.is_paragraph() || element.kind() == ElementKind::Table)
    }

    /// Body-level section properties (page size, margins, headers)
    pub fn section_properties(&self) -> Option<&str> {
        self.main.section.as_deref()
    }

    /// Raw bytes of a package part
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.package.part(name)
    }

    /// Target part of a relationship of the main document
    pub fn relationship_target(&self, id: &str) -> Option<String> {
        let rel = self.relationships.get(id)?;
        if rel.external {
            return Some(rel.target.clone());
        }
        Some(super::package::resolve_target(self.main_dir(), &rel.target))
    }

    pub(crate) fn main_dir(&self) -> &str {
        split_part_name(&self.main_part).0
    }

    fn count(&self, kind: ElementKind) -> usize {
        self.main
            .elements
            .iter()
            .filter(|element| element.kind() == kind)
            .count()
    }

    pub fn save(&self, file_path: &Path) -> Result<()> {
        let mut replacements = vec![(self.main_part.clone(), self.main.to_xml().into_bytes())];
        if self.relationships.is_modified() {
            replacements.push((
                rels_path_for(&self.main_part),
                self.relationships.to_xml().into_bytes(),
            ));
        }
        if self.content_types.is_modified() {
            replacements.push((
                CONTENT_TYPES_PART.to_string(),
                self.content_types.to_xml().into_bytes(),
            ));
        }

        write_package(file_path, &self.package, &replacements)?;
        info!(
            "Saved {} ({} body elements)",
            file_path.display(),
            self.elements().len()
        );
        Ok(())
    }
}

fn part_text(package: &Package, name: &str) -> Option<String> {
    package
        .part(name)
        .map(|data| String::from_utf8_lossy(data).into_owned())
}
