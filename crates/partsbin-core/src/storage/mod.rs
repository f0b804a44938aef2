//! Storage layer (`SQLite`)

pub mod db;
pub mod details;
pub mod migrations;

pub use db::{Database, DatabaseError};
pub use details::DetailStore;
