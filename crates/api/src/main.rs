use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinevault_api::config::ServerConfig;
use cinevault_api::{routes, state};

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Configuration loaded");

    // Refuse to start without a working database: the pool is created
    // eagerly, probed once, and migrated before any route is exposed.
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL is required");

    let pool = cinevault_db::create_pool(&database_url)
        .await
        .expect("Could not open a connection pool to Postgres");
    tracing::info!("Connection pool ready");

    cinevault_db::health_check(&pool)
        .await
        .expect("Postgres did not answer the startup probe");
    tracing::info!("Startup database probe succeeded");

    cinevault_db::run_migrations(&pool)
        .await
        .expect("Schema migration failed");
    tracing::info!("Schema migrations applied");

    let cors = cors_from_config(&config);

    // One reqwest client for every image-host call; its timeout mirrors the
    // server-side request timeout so an upstream stall cannot outlive us.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .expect("reqwest client construction failed");

    let max_body_bytes = config.max_body_bytes;
    let request_timeout_secs = config.request_timeout_secs;
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        http,
    };

    let request_id = HeaderName::from_static("x-request-id");

    // Health stays at the root; everything else is versioned under /api/v1.
    //
    // Later .layer() calls wrap earlier ones, so the list reads innermost
    // first: panics are caught right at the handler, and the resulting 500
    // still flows out through the trace span and CORS headers.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST is not a valid IP address"),
        config.port,
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Cannot listen on {addr}: {e}"));
    tracing::info!(%addr, "Accepting connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server terminated abnormally");

    tracing::info!("Shutdown complete");
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Setting `LOG_FORMAT=json`
/// switches to newline-delimited JSON for log collectors; the default is
/// the human-readable formatter.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cinevault_api=debug,tower_http=debug".into());

    let json_output = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Resolves when the process is told to stop.
///
/// Listens for Ctrl-C everywhere, plus SIGTERM on Unix since that is what
/// process managers and container runtimes send first.
async fn shutdown_signal() {
    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation failed")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.expect("Ctrl-C handler installation failed");
            tracing::info!("SIGINT received, draining connections");
        }
        () = sigterm => {
            tracing::info!("SIGTERM received, draining connections");
        }
    }
}

/// CORS layer for the configured browser origins.
///
/// An unparseable origin aborts startup rather than being skipped; a
/// dropped origin would only surface later as opaque browser failures.
fn cors_from_config(config: &ServerConfig) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = Vec::with_capacity(config.cors_origins.len());
    for origin in &config.cors_origins {
        let value = origin.parse().unwrap_or_else(|e| {
            panic!("CORS_ORIGINS entry '{origin}' is not a valid origin: {e}")
        });
        origins.push(value);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
