//! Merging documents into one

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::document::{has_docx_extension, DocxDocument};
use crate::error::Result;

/// Output file of a merge when none is configured
pub const DEFAULT_MERGE_OUTPUT: &str = "merged.docx";

#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub output: PathBuf,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_MERGE_OUTPUT),
        }
    }
}

impl MergeOptions {
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}

/// Why an input was left out of the merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnsupportedFormat,
    NotFound,
    Empty,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedInput {
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match self.reason {
            SkipReason::UnsupportedFormat => {
                write!(f, "Skipping {path} due to unsupported format.")
            }
            SkipReason::NotFound => write!(f, "Error: File {path} not found. Skipping . . ."),
            SkipReason::Empty => write!(f, "Skipping {path} due to it being empty."),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub output: PathBuf,
    /// Inputs whose content was merged, in order
    pub merged: Vec<PathBuf>,
    pub skipped: Vec<SkippedInput>,
}

/// Merge `inputs` in order into a single document written to `options.output`
///
/// Each merged input is followed by a page break, the last one included.
/// The first mergeable input provides styles and page setup for the output;
/// media referenced by later inputs is copied in. Inputs that are not
/// `.docx`, do not exist or are empty are skipped and listed in the report.
pub fn merge_docx<P: AsRef<Path>>(inputs: &[P], options: &MergeOptions) -> Result<MergeReport> {
    merge_docx_with(inputs, options, |_| {})
}

/// Like [`merge_docx`], calling `on_skip` as soon as an input is skipped
///
/// Skips seen before a fatal error have already been reported when the
/// error is returned.
pub fn merge_docx_with<P, F>(
    inputs: &[P],
    options: &MergeOptions,
    mut on_skip: F,
) -> Result<MergeReport>
where
    P: AsRef<Path>,
    F: FnMut(&SkippedInput),
{
    let mut merged_doc: Option<DocxDocument> = None;
    let mut merged = Vec::new();
    let mut skipped = Vec::new();

    for input in inputs {
        let input = input.as_ref();

        let reason = if !has_docx_extension(input) {
            Some(SkipReason::UnsupportedFormat)
        } else if !input.exists() {
            Some(SkipReason::NotFound)
        } else {
            None
        };
        if let Some(reason) = reason {
            skip(&mut skipped, input, reason, &mut on_skip);
            continue;
        }

        let doc = DocxDocument::open(input)?;
        if doc.is_empty() {
            skip(&mut skipped, input, SkipReason::Empty, &mut on_skip);
            continue;
        }

        if let Some(target) = merged_doc.as_mut() {
            target.append_document(&doc)?;
            target.append_page_break();
        } else {
            // The first input is the base: its parts already match its elements
            let mut base = doc;
            base.append_page_break();
            merged_doc = Some(base);
        }

        debug!("Merged {}", input.display());
        merged.push(input.to_path_buf());
    }

    let merged_doc = match merged_doc {
        Some(doc) => doc,
        None => DocxDocument::blank()?,
    };
    merged_doc.save(&options.output)?;
    info!(
        "Merged {} of {} inputs into {}",
        merged.len(),
        inputs.len(),
        options.output.display()
    );

    Ok(MergeReport {
        output: options.output.clone(),
        merged,
        skipped,
    })
}

fn skip<F: FnMut(&SkippedInput)>(
    skipped: &mut Vec<SkippedInput>,
    path: &Path,
    reason: SkipReason,
    on_skip: &mut F,
) {
    warn!("Skipping {}: {:?}", path.display(), reason);
    let input = SkippedInput {
        path: path.to_path_buf(),
        reason,
    };
    on_skip(&input);
    skipped.push(input);
}
