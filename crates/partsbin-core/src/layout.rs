//! On-disk layout of a partsbin data directory
//!
//! ```text
//! <root>/
//!   details.db
//!   images/
//!   Logs/
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::util::{safe_join, PathError};

/// Database file name inside the data root and inside backup archives
pub const DATABASE_FILE: &str = "details.db";
/// Image directory name inside the data root and inside backup archives
pub const IMAGES_DIR: &str = "images";
/// Log directory name inside the data root
pub const LOGS_DIR: &str = "Logs";

/// Paths derived from a single data root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    /// Layout rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root and image directories if missing
    ///
    /// # Errors
    /// Returns an error if a directory cannot be created
    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(self.images_dir())?;
        Ok(())
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }

    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    #[must_use]
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    /// Resolve a stored image path against the root
    ///
    /// Both `/` and `\` are accepted as separators, so rows written on
    /// Windows resolve on every platform.
    ///
    /// # Errors
    /// Returns an error if the path would leave the data directory
    pub fn resolve(&self, stored_path: &str) -> Result<PathBuf, PathError> {
        safe_join(&self.root, &stored_path.replace('\\', "/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_derive_from_root() {
        let layout = DataLayout::new("/data/parts");
        assert_eq!(layout.database_path(), PathBuf::from("/data/parts/details.db"));
        assert_eq!(layout.images_dir(), PathBuf::from("/data/parts/images"));
        assert_eq!(layout.logs_dir(), PathBuf::from("/data/parts/Logs"));
    }

    #[test]
    fn test_resolve_rejects_escape() {
        let layout = DataLayout::new("/data/parts");
        assert!(layout.resolve("../secrets.png").is_err());
        assert_eq!(
            layout.resolve("images/a.png").unwrap(),
            PathBuf::from("/data/parts/images/a.png")
        );
    }

    #[test]
    fn test_resolve_accepts_backslash_separators() {
        let layout = DataLayout::new("/data/parts");
        assert_eq!(
            layout.resolve("images\\b1.png").unwrap(),
            PathBuf::from("/data/parts/images/b1.png")
        );
        assert!(layout.resolve("..\\secrets.png").is_err());
    }

    #[test]
    fn test_ensure_creates_images_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let layout = DataLayout::new(temp.path().join("nested"));
        layout.ensure().unwrap();
        assert!(layout.images_dir().is_dir());
    }
}
