//! Domain layer for the export-sync engine.
//!
//! This crate contains:
//! - Export job records and the raw/UI status vocabularies
//! - The status mapper (raw status + result file -> UI status)
//! - Export creation payloads and their validation
//! - The notifier abstraction for terminal-failure notices

pub mod models;
pub mod services;
