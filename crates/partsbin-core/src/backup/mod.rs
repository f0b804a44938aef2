//! Backup of the database file and image directory into a zip archive

pub mod archive;
pub mod create;

use std::path::PathBuf;
use thiserror::Error;

pub use archive::{archive_entries, ArchiveError};
pub use create::{archive_name, create_backup, create_backup_at, create_backup_staged_in};

/// Errors while taking a backup
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Database file not found: {0}")]
    MissingDatabase(PathBuf),

    #[error("Backup destination is not a directory: {0}")]
    InvalidDestination(PathBuf),

    #[error("Backup archive already exists: {0}")]
    ArchiveExists(PathBuf),
}
