//! Core domain logic for the cinevault movie-catalog importer.
//!
//! This crate has zero database or HTTP dependencies. It provides:
//!
//! - Lenient extraction of untrusted import records from raw JSON
//! - URL sanitization (bracket stripping)
//! - Row validation, import policies, and batch chunk math
//! - Output format and quality parameters for image re-encoding

pub mod compress;
pub mod error;
pub mod record;
pub mod sanitize;
pub mod types;
