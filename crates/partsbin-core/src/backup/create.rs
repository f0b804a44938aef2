//! Point-in-time backup of the data directory

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::archive::{create_archive, ArchiveError};
use super::BackupError;
use crate::layout::{DataLayout, DATABASE_FILE, IMAGES_DIR};

/// Timestamp format used in archive names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Archive file name for a backup taken at `timestamp`
#[must_use]
pub fn archive_name(timestamp: &DateTime<Local>) -> String {
    format!("backup_{}.zip", timestamp.format(TIMESTAMP_FORMAT))
}

/// Back up the database and images into `destination_dir`, stamped now
///
/// # Errors
/// Returns an error if any copy or archive step fails
pub fn create_backup(layout: &DataLayout, destination_dir: &Path) -> Result<PathBuf, BackupError> {
    create_backup_at(layout, destination_dir, &Local::now())
}

/// Back up the database and images into `destination_dir`
///
/// Stages in the system temporary directory; see [`create_backup_staged_in`].
///
/// # Errors
/// Returns an error if any copy or archive step fails
pub fn create_backup_at(
    layout: &DataLayout,
    destination_dir: &Path,
    timestamp: &DateTime<Local>,
) -> Result<PathBuf, BackupError> {
    create_backup_staged_in(layout, destination_dir, timestamp, &std::env::temp_dir())
}

/// Back up the database and images into `destination_dir`
///
/// The database file and image tree are first copied into a private staging
/// directory under `staging_parent`, which is removed whether or not
/// archiving succeeds. No lock is taken; a concurrent writer in another
/// process can leave a torn copy.
///
/// # Errors
/// Returns `ArchiveExists` if an archive with the same name is already
/// present, or an error if any copy or archive step fails
pub fn create_backup_staged_in(
    layout: &DataLayout,
    destination_dir: &Path,
    timestamp: &DateTime<Local>,
    staging_parent: &Path,
) -> Result<PathBuf, BackupError> {
    let database = layout.database_path();
    if !database.is_file() {
        return Err(BackupError::MissingDatabase(database));
    }
    if !destination_dir.is_dir() {
        return Err(BackupError::InvalidDestination(destination_dir.to_path_buf()));
    }

    let archive_path = destination_dir.join(archive_name(timestamp));

    let staging = tempfile::Builder::new()
        .prefix("partsbin-backup-")
        .tempdir_in(staging_parent)?;
    log::debug!("staging backup in {}", staging.path().display());

    fs::copy(&database, staging.path().join(DATABASE_FILE))?;
    let files = copy_tree(&layout.images_dir(), &staging.path().join(IMAGES_DIR))?;

    // the archive is opened with create_new, which settles name collisions
    if let Err(e) = create_archive(staging.path(), &archive_path) {
        if matches!(&e, ArchiveError::Io(io) if io.kind() == std::io::ErrorKind::AlreadyExists) {
            return Err(BackupError::ArchiveExists(archive_path));
        }
        if let Err(cleanup) = fs::remove_file(&archive_path) {
            log::warn!(
                "could not remove partial archive {}: {cleanup}",
                archive_path.display()
            );
        }
        return Err(e.into());
    }

    if let Err(e) = staging.close() {
        log::warn!("could not remove backup staging directory: {e}");
    }

    log::info!(
        "backup written to {} ({files} image files)",
        archive_path.display()
    );
    Ok(archive_path)
}

/// Copy a directory tree, skipping symlinks; returns the number of files
///
/// A missing source still produces an empty target directory.
fn copy_tree(source: &Path, target: &Path) -> Result<usize, BackupError> {
    fs::create_dir_all(target)?;
    if !source.is_dir() {
        return Ok(0);
    }

    let mut files = 0;
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &dest)?;
            files += 1;
        }
    }

    Ok(files)
}
