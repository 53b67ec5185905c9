//! File I/O operations and validation
//!
//! This module handles file validation and reading/writing package archives.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use log::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::package::{Package, Part};
use crate::error::{Error, Result};

pub const DOCX_EXTENSION: &str = "docx";

/// True when the path carries the `.docx` extension
pub fn has_docx_extension(file_path: &Path) -> bool {
    file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == DOCX_EXTENSION)
}

/// Validates that the file is a legitimate .docx file
pub(crate) fn validate_docx_file(file_path: &Path) -> Result<()> {
    if !file_path.exists() {
        return Err(Error::NotFound(file_path.to_path_buf()));
    }

    if !has_docx_extension(file_path) {
        return Err(Error::UnsupportedFormat(file_path.to_path_buf()));
    }

    Ok(())
}

/// Checks that an opened archive is a Word document and not some other zip
pub(crate) fn validate_package(package: &Package, main_part: &str) -> Result<()> {
    if package.contains(main_part) {
        return Ok(());
    }

    // Check if it might be an Excel file
    if package.contains("xl/workbook.xml") {
        return Err(Error::InvalidPackage(
            "this appears to be an Excel file (.xlsx); only Word documents (.docx) are supported"
                .to_string(),
        ));
    }

    Err(Error::InvalidPackage(format!(
        "missing {main_part}; this file may be corrupted or is not a valid Word document"
    )))
}

pub(crate) fn read_package(file_path: &Path) -> Result<Package> {
    let file = File::open(file_path)?;
    read_package_from(BufReader::new(file))
}

/// Read every file entry of a zip archive, keeping archive order
pub(crate) fn read_package_from<R: Read + Seek>(reader: R) -> Result<Package> {
    let mut archive = ZipArchive::new(reader)?;
    let mut parts = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        parts.push(Part { name, data });
    }

    debug!("Read package with {} parts", parts.len());
    Ok(Package::new(parts))
}

/// Write the package, substituting `replacements` for parts of the same name
///
/// Replacements naming parts the package does not have are appended.
pub(crate) fn write_package(
    file_path: &Path,
    package: &Package,
    replacements: &[(String, Vec<u8>)],
) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    write_package_to(&mut writer, package, replacements)?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_package_to<W: Write + Seek>(
    writer: W,
    package: &Package,
    replacements: &[(String, Vec<u8>)],
) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let replacement_for = |name: &str| {
        replacements
            .iter()
            .find(|(replaced, _)| replaced == name)
            .map(|(_, data)| data.as_slice())
    };

    for part in package.parts() {
        let data = replacement_for(&part.name).unwrap_or(&part.data);
        zip.start_file(part.name.as_str(), options)?;
        zip.write_all(data)?;
    }

    for (name, data) in replacements {
        if !package.contains(name) {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }
    }

    zip.finish()?;
    Ok(())
}
