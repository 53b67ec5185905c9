//! Document package handling
//!
//! This module provides loading and saving of Microsoft Word (.docx)
//! packages as an ordered list of body elements, and copying elements
//! between packages together with the parts they reference.

pub(crate) mod import;
pub mod io;
pub mod loader;
pub mod models;
pub mod package;
pub(crate) mod parsing;

pub use io::{has_docx_extension, DOCX_EXTENSION};
pub use loader::DocxDocument;
pub use models::*;
pub use package::{Package, Part};
