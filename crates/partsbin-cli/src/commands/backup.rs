//! Backup CLI command
//!
//! Handles: partsbin backup <DEST>

use anyhow::{Context, Result};
use partsbin_core::backup::archive_entries;
use partsbin_core::Inventory;
use std::path::Path;

/// Write a backup archive into `destination`
///
/// # Errors
/// Returns an error if the backup cannot be written
pub fn run(inventory: &Inventory, destination: &Path) -> Result<()> {
    let archive_path = inventory
        .backup(destination)
        .with_context(|| format!("Could not back up into {}", destination.display()))?;

    let entries = archive_entries(&archive_path)?;
    println!("Backup created: {}", archive_path.display());
    println!("  {} entries", entries.len());
    Ok(())
}
