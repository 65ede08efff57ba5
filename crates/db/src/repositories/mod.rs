//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Methods that run inside the import engine's chunk transaction accept
//! `&mut sqlx::Transaction` so every write for a chunk shares one
//! transactional scope; read-only lookups accept `&PgPool`.

pub mod image_repo;
pub mod movie_repo;
pub mod source_link_repo;

pub use image_repo::ImageRepo;
pub use movie_repo::MovieRepo;
pub use source_link_repo::SourceLinkRepo;
