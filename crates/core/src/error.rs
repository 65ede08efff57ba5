/// Failures surfaced by the domain layer.
///
/// `Validation` means the caller handed over something unusable and may see
/// the detail. `Internal` covers faults the caller cannot act on; the detail
/// stays server-side.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("internal: {0}")]
    Internal(String),
}
