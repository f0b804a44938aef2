//! Zip archive writing and inspection

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::util::to_stored_path;

/// Errors during archive creation or inspection
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Create a deflate zip archive from a directory
///
/// Entry names are relative to `source_dir` and use `/` separators;
/// directories get their own entries so empty ones survive. Fails if
/// `output_path` already exists.
///
/// # Errors
/// Returns an error if archive creation fails
pub fn create_archive(source_dir: &Path, output_path: &Path) -> Result<(), ArchiveError> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(output_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let relative = path
            .strip_prefix(source_dir)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let name = to_stored_path(relative);

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
        } else if entry.file_type().is_file() {
            zip.start_file(name, options)?;
            let mut f = File::open(path)?;
            io::copy(&mut f, &mut zip)?;
        }
    }

    zip.finish()?;
    Ok(())
}

/// Entry names of an archive, in archive order
///
/// # Errors
/// Returns an error if the archive cannot be read
pub fn archive_entries(archive_path: &Path) -> Result<Vec<String>, ArchiveError> {
    let archive = ZipArchive::new(File::open(archive_path)?)?;
    Ok(archive.file_names().map(String::from).collect::<Vec<_>>())
}
