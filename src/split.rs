//! Splitting a document at page breaks

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::document::DocxDocument;
use crate::error::{Error, Result};

/// Prefix of split outputs when none is configured
pub const DEFAULT_SPLIT_PREFIX: &str = "split_part_";

#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Outputs are written to `<prefix><n>.docx`, n starting at 1
    pub prefix: String,
    /// Do not write the segment after the last break when it has no elements
    pub skip_empty_trailing: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_SPLIT_PREFIX.to_string(),
            skip_empty_trailing: false,
        }
    }
}

impl SplitOptions {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn skip_empty_trailing(mut self, skip: bool) -> Self {
        self.skip_empty_trailing = skip;
        self
    }

    /// Path of the `index`-th output (1-based)
    pub fn part_path(&self, index: usize) -> PathBuf {
        PathBuf::from(format!("{}{}.docx", self.prefix, index))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub source: PathBuf,
    pub files: Vec<PathBuf>,
}

impl SplitReport {
    pub fn files_created(&self) -> usize {
        self.files.len()
    }
}

/// Split `file_path` into one document per page-break-delimited segment
///
/// Every output keeps the source's styles, media and section properties.
/// Missing and empty sources are rejected before anything is written.
pub fn split_docx(file_path: &Path, options: &SplitOptions) -> Result<SplitReport> {
    let source = DocxDocument::open(file_path)?;

    if source.is_empty() {
        return Err(Error::EmptyDocument(file_path.to_path_buf()));
    }

    debug!(
        "Splitting {} at {} breaks",
        file_path.display(),
        source.break_count()
    );

    let mut files = Vec::new();
    let mut current = source.empty_like();
    let mut split_count = 1;

    for element in source.elements() {
        if element.is_break() {
            let path = options.part_path(split_count);
            current.save(&path)?;
            files.push(path);

            current = source.empty_like();
            split_count += 1;
        } else {
            current.push(element.clone());
        }
    }

    if options.skip_empty_trailing && current.elements().is_empty() && split_count > 1 {
        debug!("Skipping empty trailing segment {split_count}");
    } else {
        let path = options.part_path(split_count);
        current.save(&path)?;
        files.push(path);
    }

    info!(
        "Split {} into {} files",
        file_path.display(),
        files.len()
    );

    Ok(SplitReport {
        source: file_path.to_path_buf(),
        files,
    })
}
