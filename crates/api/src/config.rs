use cinevault_core::record::{ImportOptions, MissingPosterPolicy, MissingYearPolicy};

/// Runtime settings for the HTTP server, read once at startup.
///
/// Every variable carries a default aimed at local development;
/// deployments override through the environment (a `.env` file works too).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind, `0.0.0.0` unless `HOST` says otherwise.
    pub host: String,
    /// Port to bind, `3000` unless `PORT` says otherwise.
    pub port: u16,
    /// Browser origins allowed by CORS, from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Seconds before an in-flight request is answered with 408.
    pub request_timeout_secs: u64,
    /// Upper bound on request bodies, JSON and multipart alike.
    pub max_body_bytes: usize,
    /// Batch import tuning (chunking, pacing, cap, fallback policies).
    pub import: ImportOptions,
    /// External image-host upload proxy settings.
    pub image_host: ImageHostConfig,
}

impl ServerConfig {
    /// Read the full configuration from the environment.
    ///
    /// ```text
    /// HOST                  0.0.0.0
    /// PORT                  3000
    /// CORS_ORIGINS          http://localhost:5173    comma separated
    /// REQUEST_TIMEOUT_SECS  30
    /// MAX_BODY_BYTES        10485760                 10 MiB
    /// ```
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| String::from("0.0.0.0"));

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            host,
            port: parsed_env("PORT", "3000"),
            cors_origins,
            request_timeout_secs: parsed_env("REQUEST_TIMEOUT_SECS", "30"),
            max_body_bytes: parsed_env("MAX_BODY_BYTES", "10485760"),
            import: import_options_from_env(),
            image_host: ImageHostConfig::from_env(),
        }
    }
}

/// Read `name` from the environment (or fall back to `default`) and parse it.
///
/// Panics with the variable name on malformed input; configuration mistakes
/// should stop the process at boot, not surface per request.
fn parsed_env<T: std::str::FromStr>(name: &str, default: &str) -> T
where
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .unwrap_or_else(|e| panic!("{name} must be numeric, got '{raw}': {e}"))
}

/// Build [`ImportOptions`] from the environment.
///
/// ```text
/// IMPORT_CHUNK_SIZE      50
/// IMPORT_CHUNK_PAUSE_MS  200
/// IMPORT_MAX_RECORDS     unset            uncapped when absent
/// IMPORT_MISSING_POSTER  insert_null_row
/// IMPORT_MISSING_YEAR    null
/// ```
pub fn import_options_from_env() -> ImportOptions {
    let defaults = ImportOptions::default();

    let max_records: Option<usize> = std::env::var("IMPORT_MAX_RECORDS").ok().map(|raw| {
        raw.parse()
            .unwrap_or_else(|e| panic!("IMPORT_MAX_RECORDS must be a count: {e}"))
    });

    let missing_poster = match std::env::var("IMPORT_MISSING_POSTER") {
        Ok(v) => MissingPosterPolicy::from_str(&v).unwrap_or_else(|| {
            panic!(
                "IMPORT_MISSING_POSTER must be one of {:?}",
                MissingPosterPolicy::ALL
            )
        }),
        Err(_) => defaults.missing_poster,
    };

    let missing_year = match std::env::var("IMPORT_MISSING_YEAR") {
        Ok(v) => MissingYearPolicy::from_str(&v).unwrap_or_else(|| {
            panic!(
                "IMPORT_MISSING_YEAR must be one of {:?}",
                MissingYearPolicy::ALL
            )
        }),
        Err(_) => defaults.missing_year,
    };

    ImportOptions {
        chunk_size: parsed_env("IMPORT_CHUNK_SIZE", &defaults.chunk_size.to_string()),
        chunk_pause_ms: parsed_env("IMPORT_CHUNK_PAUSE_MS", &defaults.chunk_pause_ms.to_string()),
        max_records,
        missing_poster,
        missing_year,
    }
}

/// Where uploaded images get proxied to.
///
/// The API key is optional on purpose: without it the upload endpoint
/// answers 503 while the rest of the service runs normally, since nothing
/// else depends on the image host.
#[derive(Debug, Clone)]
pub struct ImageHostConfig {
    /// Upload endpoint URL.
    pub upload_url: String,
    /// Credential for the image host; `None` disables the upload proxy.
    pub api_key: Option<String>,
}

impl ImageHostConfig {
    /// Read image-host settings from the environment.
    ///
    /// ```text
    /// IMAGE_HOST_UPLOAD_URL  https://freeimage.host/api/1/upload
    /// IMAGE_HOST_API_KEY     unset            proxy disabled when absent
    /// ```
    pub fn from_env() -> Self {
        let upload_url = std::env::var("IMAGE_HOST_UPLOAD_URL")
            .unwrap_or_else(|_| "https://freeimage.host/api/1/upload".into());

        let api_key = std::env::var("IMAGE_HOST_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        Self {
            upload_url,
            api_key,
        }
    }
}
