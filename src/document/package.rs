//! OPC package container
//!
//! A `.docx` file is a zip of parts addressed by path. The package keeps
//! every part as raw bytes in archive order so parts the tool does not touch
//! are written back unchanged.

use std::path::Path;

use super::io::read_package;
use super::models::{DEFAULT_MAIN_PART, OFFICE_DOCUMENT_REL_TYPE, PACKAGE_RELS_PART};
use super::parsing::relationships::Relationships;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Part {
    /// Zip entry name, no leading slash (`word/media/image1.png`)
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    pub fn open(path: &Path) -> Result<Self> {
        read_package(path)
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|part| part.name == name)
            .map(|part| part.data.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|part| part.name == name)
    }

    /// Replace the part of the same name, or append a new one
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|part| part.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// Name of the main document part, from the package relationships
    pub fn main_document_name(&self) -> Result<String> {
        let Some(data) = self.part(PACKAGE_RELS_PART) else {
            return Ok(DEFAULT_MAIN_PART.to_string());
        };

        let rels = Relationships::parse(&String::from_utf8_lossy(data))?;
        let name = rels
            .find_by_type(OFFICE_DOCUMENT_REL_TYPE)
            .map(|rel| resolve_target("", &rel.target))
            .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());
        Ok(name)
    }

    /// A part name not yet used in the package, derived from `desired`
    ///
    /// `word/media/image1.png` becomes `word/media/image1_2.png`, `_3`, ...
    pub fn unique_part_name(&self, desired: &str) -> String {
        if !self.contains(desired) {
            return desired.to_string();
        }

        let (dir, file) = split_part_name(desired);
        let (stem, extension) = match file.rsplit_once('.') {
            Some((stem, extension)) => (stem, format!(".{extension}")),
            None => (file, String::new()),
        };

        let mut n = 2;
        loop {
            let file = format!("{stem}_{n}{extension}");
            let candidate = if dir.is_empty() {
                file
            } else {
                format!("{dir}/{file}")
            };
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Split a part name into (directory, file name)
pub(crate) fn split_part_name(name: &str) -> (&str, &str) {
    name.rsplit_once('/').unwrap_or(("", name))
}

/// The `.rels` part holding the relationships of `part`
pub(crate) fn rels_path_for(part: &str) -> String {
    let (dir, file) = split_part_name(part);
    if dir.is_empty() {
        format!("_rels/{file}.rels")
    } else {
        format!("{dir}/_rels/{file}.rels")
    }
}

/// Resolve a relationship target against the directory of its source part
pub(crate) fn resolve_target(base_dir: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None if base_dir.is_empty() => target.to_string(),
        None => format!("{base_dir}/{target}"),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

/// Relationship target pointing from `base_dir` to `part`
pub(crate) fn relative_target(base_dir: &str, part: &str) -> String {
    if base_dir.is_empty() {
        return part.to_string();
    }
    match part.strip_prefix(base_dir).and_then(|rest| rest.strip_prefix('/')) {
        Some(relative) => relative.to_string(),
        None => format!("/{part}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(names: &[&str]) -> Package {
        Package::new(
            names
                .iter()
                .map(|name| Part {
                    name: name.to_string(),
                    data: Vec::new(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(rels_path_for("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(rels_path_for("word/charts/chart1.xml"), "word/charts/_rels/chart1.xml.rels");
        assert_eq!(rels_path_for("document.xml"), "_rels/document.xml.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("word", "media/image1.png"), "word/media/image1.png");
        assert_eq!(resolve_target("word/charts", "../embeddings/a.xlsx"), "word/embeddings/a.xlsx");
        assert_eq!(resolve_target("word", "/word/media/x.png"), "word/media/x.png");
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
    }

    #[test]
    fn test_relative_target() {
        assert_eq!(relative_target("word", "word/media/image1_2.png"), "media/image1_2.png");
        assert_eq!(relative_target("word/charts", "word/embeddings/a.xlsx"), "/word/embeddings/a.xlsx");
        assert_eq!(relative_target("word", "wordy/x.xml"), "/wordy/x.xml");
    }

    #[test]
    fn test_unique_part_name() {
        let package = package(&["word/media/image1.png", "word/media/image1_2.png"]);
        assert_eq!(package.unique_part_name("word/media/image2.png"), "word/media/image2.png");
        assert_eq!(package.unique_part_name("word/media/image1.png"), "word/media/image1_3.png");
    }

    #[test]
    fn test_main_document_defaults_without_package_rels() {
        let package = package(&["word/document.xml"]);
        assert_eq!(package.main_document_name().unwrap(), "word/document.xml");
    }

    #[test]
    fn test_main_document_from_package_rels() {
        let mut package = package(&[]);
        package.set_part(
            PACKAGE_RELS_PART,
            br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/word/document2.xml"/></Relationships>"#.to_vec(),
        );
        assert_eq!(package.main_document_name().unwrap(), "word/document2.xml");
    }
}
