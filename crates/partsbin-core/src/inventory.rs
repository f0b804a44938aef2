//! Caller-facing inventory operations
//!
//! [`Inventory`] owns the database handle and the data layout. Front ends
//! create one at startup and pass it to whatever needs it.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::backup::{self, BackupError};
use crate::detail::{Detail, DetailInput, ValidationError};
use crate::images::{self, ImageError};
use crate::layout::DataLayout;
use crate::storage::{Database, DatabaseError, DetailStore};

/// Errors surfaced to callers
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Detail not found: {0}")]
    NotFound(i64),

    #[error("Image file not found: {0}")]
    FileMissing(PathBuf),

    #[error("Database error: {0}")]
    Database(DatabaseError),

    #[error("Backup failed: {0}")]
    Backup(#[from] BackupError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DatabaseError> for InventoryError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(id) => Self::NotFound(id),
            other => Self::Database(other),
        }
    }
}

impl From<ImageError> for InventoryError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::Io(io) => Self::Io(io),
            ImageError::Validation(v) => Self::Validation(v),
            ImageError::SourceMissing(path) => Self::FileMissing(path),
            ImageError::PathSecurity(p) => {
                Self::Validation(ValidationError::UnsafeImagePath(p.to_string()))
            }
        }
    }
}

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Details database plus its image directory
pub struct Inventory {
    layout: DataLayout,
    db: Database,
}

impl Inventory {
    /// Open the inventory under `layout`, creating directories and schema
    ///
    /// # Errors
    /// Returns an error if the directories or database cannot be created
    pub fn open(layout: DataLayout) -> InventoryResult<Self> {
        layout.ensure()?;
        let db = Database::open(&layout.database_path())?;
        Ok(Self { layout, db })
    }

    /// Paths this inventory reads and writes
    #[must_use]
    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    fn store(&self) -> DetailStore<'_> {
        DetailStore::new(self.db.connection())
    }

    /// Details whose name contains `filter`, in insertion order
    ///
    /// # Errors
    /// Returns an error if the query fails
    pub fn list(&self, filter: &str) -> InventoryResult<Vec<Detail>> {
        Ok(self.store().list(filter)?)
    }

    /// Fetch one detail by ID
    ///
    /// # Errors
    /// Returns `NotFound` if no detail has this ID
    pub fn get(&self, id: i64) -> InventoryResult<Detail> {
        Ok(self.store().get(id)?)
    }

    /// Number of stored details
    ///
    /// # Errors
    /// Returns an error if the query fails
    pub fn count(&self) -> InventoryResult<u64> {
        Ok(self.store().count()?)
    }

    /// Store a new detail; its image must already be in the data directory
    ///
    /// # Errors
    /// Returns `FileMissing` if the image does not exist
    pub fn create(&self, input: &DetailInput) -> InventoryResult<i64> {
        self.check_image(input.image_path())?;
        Ok(self.store().create(input)?)
    }

    /// Replace all fields of a detail
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown ID, `FileMissing` if the image does
    /// not exist
    pub fn update(&self, id: i64, input: &DetailInput) -> InventoryResult<()> {
        self.check_image(input.image_path())?;
        self.store().update(id, input)?;
        Ok(())
    }

    /// Replace all fields of a detail and drop its old image if orphaned
    ///
    /// # Errors
    /// Same as [`Inventory::update`]; image removal failures after a
    /// successful update are logged, not returned
    pub fn replace(&self, id: i64, input: &DetailInput) -> InventoryResult<Detail> {
        let previous = self.get(id)?;
        self.update(id, input)?;

        if previous.image_path != input.image_path() {
            if let Err(e) = self.discard_image(&previous.image_path) {
                log::warn!("could not remove old image {}: {e}", previous.image_path);
            }
        }

        Ok(input.clone().into_detail(id))
    }

    /// Delete a detail and its image
    ///
    /// The image goes first: if it cannot be removed the row is kept. An image
    /// still used by another detail is left in place.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown ID, or the image removal error
    pub fn delete(&self, id: i64) -> InventoryResult<Detail> {
        let store = self.store();
        let detail = store.get(id)?;

        if store.count_image_references(&detail.image_path)? <= 1 {
            images::remove_image(&self.layout, &detail.image_path)?;
        } else {
            log::debug!("image {} is shared, keeping it", detail.image_path);
        }

        store.delete(id)?;
        Ok(detail)
    }

    /// Copy a picked photo into the image directory
    ///
    /// # Errors
    /// Returns an error if the file is missing, unsupported, or cannot be copied
    pub fn import_image(&self, source: &Path) -> InventoryResult<String> {
        Ok(images::import_image(&self.layout, source)?)
    }

    /// Remove an image file unless some detail still points at it
    ///
    /// Returns whether the file was removed.
    ///
    /// # Errors
    /// Returns an error if the path is unsafe or the file cannot be removed
    pub fn discard_image(&self, image_path: &str) -> InventoryResult<bool> {
        if self.store().count_image_references(image_path)? > 0 {
            return Ok(false);
        }
        images::remove_image(&self.layout, image_path)?;
        Ok(true)
    }

    /// Absolute location of a stored image
    ///
    /// # Errors
    /// Returns a validation error if the path leaves the data directory
    pub fn image_location(&self, image_path: &str) -> InventoryResult<PathBuf> {
        self.layout
            .resolve(image_path)
            .map_err(|e| ValidationError::UnsafeImagePath(e.to_string()).into())
    }

    /// Write a timestamped backup archive into `destination_dir`
    ///
    /// # Errors
    /// Returns `Backup` wrapping the underlying failure
    pub fn backup(&self, destination_dir: &Path) -> InventoryResult<PathBuf> {
        Ok(backup::create_backup(&self.layout, destination_dir)?)
    }

    fn check_image(&self, image_path: &str) -> InventoryResult<()> {
        let location = self.image_location(image_path)?;
        if !location.is_file() {
            return Err(InventoryError::FileMissing(location));
        }
        Ok(())
    }
}
