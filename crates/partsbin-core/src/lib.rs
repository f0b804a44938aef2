//! partsbin core - detail records, `SQLite` storage and backups
//!
//! This crate tracks physical parts (name, description, surface area, photo)
//! in a local `SQLite` file and snapshots the data directory into zip archives.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod backup;
pub mod detail;
pub mod images;
pub mod inventory;
pub mod layout;
pub mod storage;
pub mod util;

pub use detail::{Area, Detail, DetailInput, ValidationError};
pub use inventory::{Inventory, InventoryError, InventoryResult};
pub use layout::DataLayout;
