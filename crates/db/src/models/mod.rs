//! Domain model structs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus an insert DTO where an insert carries more than a
//! couple of values.

pub mod image;
pub mod movie;
pub mod source_link;
