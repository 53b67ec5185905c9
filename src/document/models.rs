//! Core data structures for document representation
//!
//! This module defines the public types used to represent a loaded package:
//! body elements with their kind, package relationships and content types.

use serde::{Deserialize, Serialize};

/// Namespace of relationship ids used inside part XML (`r:id`, `r:embed`, ...)
pub const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// WordprocessingML main namespace (`w:`)
pub const WORDPROCESSINGML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Namespace of `_rels/*.rels` parts
pub const PACKAGE_RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

/// Namespace of the `[Content_Types].xml` part
pub const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Relationship type that points from the package root to the main document part
pub const OFFICE_DOCUMENT_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const PACKAGE_RELS_PART: &str = "_rels/.rels";
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Discriminant of a body-level element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Paragraph,
    Table,
    /// Page-break marker: split delimiter and merge separator
    Break,
    Other,
}

/// One element directly under `w:body`, kept as raw XML
///
/// The markup is never rewritten except to re-target relationship ids when
/// the element moves to another package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyElement {
    kind: ElementKind,
    xml: String,
    /// The markup is a `w:p`, even when classified as a break
    paragraph: bool,
}

impl BodyElement {
    pub fn new(kind: ElementKind, xml: impl Into<String>) -> Self {
        Self {
            kind,
            xml: xml.into(),
            paragraph: kind == ElementKind::Paragraph,
        }
    }

    /// A `w:p` holding nothing but page breaks
    pub fn break_paragraph(xml: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Break,
            xml: xml.into(),
            paragraph: true,
        }
    }

    /// The paragraph `add_page_break` style editors insert: one run holding a page break
    ///
    /// Under a default namespace the `type` attribute still needs the
    /// WordprocessingML namespace, so a local `w` prefix is declared for it.
    pub fn page_break(prefix: &str) -> Self {
        let p = qualify(prefix, "p");
        let r = qualify(prefix, "r");
        let br = qualify(prefix, "br");
        let xml = if prefix.is_empty() {
            format!(
                "<{p}><{r}><{br} xmlns:w=\"{WORDPROCESSINGML_NS}\" w:type=\"page\"/></{r}></{p}>"
            )
        } else {
            format!("<{p}><{r}><{br} {prefix}:type=\"page\"/></{r}></{p}>")
        };
        Self::break_paragraph(xml)
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn xml(&self) -> &str {
        &self.xml
    }

    pub fn is_break(&self) -> bool {
        self.kind == ElementKind::Break
    }

    /// True for every `w:p`, page-break paragraphs included
    pub fn is_paragraph(&self) -> bool {
        self.paragraph
    }

    pub(crate) fn with_xml(&self, xml: String) -> Self {
        Self {
            kind: self.kind,
            xml,
            paragraph: self.paragraph,
        }
    }
}

/// Qualified XML name for `local` under `prefix` (empty prefix means default namespace)
pub(crate) fn qualify(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{prefix}:{local}")
    }
}

/// A single entry of a `.rels` part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// A `Default` or `Override` entry of `[Content_Types].xml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTypeEntry {
    Default {
        extension: String,
        content_type: String,
    },
    Override {
        part_name: String,
        content_type: String,
    },
}
