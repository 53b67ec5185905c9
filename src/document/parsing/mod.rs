//! Package part parsing
//!
//! This module contains the XML readers and writers for the three parts
//! the tool rewrites: the main document, its relationships and the
//! package content types.

pub(crate) mod body;
pub(crate) mod content_types;
pub(crate) mod relationships;
