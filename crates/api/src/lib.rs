//! HTTP layer of the CineVault catalog service.
//!
//! Everything the binary wires together lives here as a library so the
//! integration tests can build the same router against a test database.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
