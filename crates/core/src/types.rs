/// Generated key type for every catalog table (`BIGSERIAL` columns).
pub type DbId = i64;

/// Row timestamps; the schema stores TIMESTAMPTZ and the service never
/// works in a local zone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
