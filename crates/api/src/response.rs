//! Shared response envelope for API handlers.
//!
//! The image utility endpoints answer with a `{ "success": true, "data": ... }`
//! envelope. Use [`SuccessResponse`] instead of ad-hoc
//! `serde_json::json!({ "success": true, "data": ... })` to get compile-time
//! type safety and consistent serialization.
//!
//! The import endpoint does NOT use this envelope: its response fields
//! (`success`, `inserted`, `skipped`, `logs`) are a contract of their own and
//! live in [`crate::handlers::import`].

use serde::Serialize;

/// Standard `{ "success": true, "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    /// Wrap a payload in the success envelope.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
