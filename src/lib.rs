//! docx-splice: split and merge .docx files
//!
//! This library splits Microsoft Word documents into several documents at
//! page breaks and merges several documents into one, keeping formatting
//! and embedded media intact.

pub mod config;
pub mod document;
pub mod error;
pub mod merge;
pub mod split;

// Re-export commonly used types
pub use config::Config;
pub use document::{BodyElement, DocxDocument, ElementKind};
pub use error::{Error, Result};
pub use merge::{
    merge_docx, merge_docx_with, MergeOptions, MergeReport, SkipReason, SkippedInput,
};
pub use split::{split_docx, SplitOptions, SplitReport};
