//! CLI command handlers
//!
//! `detail` covers browsing and editing records, `backup` the archive command.

pub mod backup;
pub mod detail;
