//! HTTP handlers, grouped by resource domain.

pub mod images;
pub mod import;
pub mod library;
