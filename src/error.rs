//! Error types for docx-splice.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docx-splice operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while splitting or merging documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The package could not be read or written as a zip archive.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A package part is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The input file does not exist.
    #[error("File '{}' not found.", .0.display())]
    NotFound(PathBuf),

    /// The input file does not carry the .docx extension.
    #[error(
        "Invalid file format. Expected .docx file, got '{}'\n\
        Note: only Word .docx files are supported (not .doc, .xlsx, .zip, etc.)",
        .0.display()
    )]
    UnsupportedFormat(PathBuf),

    /// The document has no paragraphs and no tables.
    #[error("The document '{}' is empty.", .0.display())]
    EmptyDocument(PathBuf),

    /// The archive opened but is not a usable Word document.
    #[error("Invalid .docx file: {0}")]
    InvalidPackage(String),

    /// The configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Conditions the tool anticipates and reports to the user instead of failing.
    pub fn is_reportable(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::UnsupportedFormat(_) | Error::EmptyDocument(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anticipated_errors_are_reportable() {
        assert!(Error::NotFound(PathBuf::from("a.docx")).is_reportable());
        assert!(Error::UnsupportedFormat(PathBuf::from("a.txt")).is_reportable());
        assert!(Error::EmptyDocument(PathBuf::from("a.docx")).is_reportable());
        assert!(!Error::InvalidPackage("missing body".into()).is_reportable());
        assert!(!Error::Io(io::Error::other("denied")).is_reportable());
    }

    #[test]
    fn test_not_found_message_names_the_file() {
        let message = Error::NotFound(PathBuf::from("report.docx")).to_string();
        assert_eq!(message, "File 'report.docx' not found.");
    }
}
