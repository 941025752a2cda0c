//! # deckctl: spreadsheet upload service for slide generation
//!
//! `deckctl` is the backend a browser frontend calls to turn spreadsheet data into a slide
//! deck. Today it exposes the upload contract only: `POST /powerpoint` accepts a spreadsheet
//! file and the core message its chart should convey, logs both, and acknowledges receipt.
//! Nothing is parsed, stored, or generated.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum). Every request passes
//! through a tracing layer and a CORS layer that admits exactly one configured browser origin
//! (with credentials, any method, any header) before reaching the router.
//!
//! - The **API layer** ([`api`]) holds the upload handler and the multipart form extractor that
//!   rejects incomplete submissions with a 422 before the handler runs.
//! - **Configuration** ([`config`]) is layered from defaults, a YAML file and `DECKCTL_`
//!   environment variables.
//! - **Errors** ([`errors`]) map to HTTP responses with a JSON `detail` body.
//! - **Telemetry** ([`telemetry`]) sets up structured logging and optional OTLP export.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use deckctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = deckctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     deckctl::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config)?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await
//! }
//! ```
pub mod api;
pub mod config;
pub mod errors;
mod openapi;
pub mod telemetry;

#[cfg(test)]
pub mod test_utils;

use crate::config::CorsConfig;
use crate::openapi::ApiDoc;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
pub use config::Config;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Create CORS layer from configuration.
///
/// The origin is matched as a list, so only requests from that origin get it echoed back.
/// Credentialed requests cannot use wildcard methods or headers, so both are mirrored from the
/// request instead: the allowed origin may use any method and send any header.
fn create_cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let origin = config.origin().parse::<HeaderValue>()?;

    let mut cors = CorsLayer::new()
        .allow_origin([origin])
        .allow_credentials(config.allow_credentials)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    if let Some(max_age) = config.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Body limit for upload routes. Unlimited unless configured.
fn upload_body_limit(config: &Config) -> anyhow::Result<DefaultBodyLimit> {
    Ok(match config.uploads.max_upload_size {
        Some(max) => DefaultBodyLimit::max(usize::try_from(max)?),
        None => DefaultBodyLimit::disable(),
    })
}

/// Build the application router with all endpoints and middleware.
///
/// - `POST /powerpoint` upload route
/// - `GET /healthz` liveness route
/// - OpenAPI document and interactive docs (if `enable_docs`)
/// - Prometheus metrics at `/internal/metrics` (if `enable_metrics`)
/// - CORS and tracing middleware
///
/// # Errors
///
/// Returns an error if the CORS origin cannot be used as a header value or the upload limit
/// does not fit in memory addressing.
#[instrument(skip_all)]
pub fn build_router(config: &Config) -> anyhow::Result<Router> {
    let mut router = Router::new()
        .route(
            "/powerpoint",
            post(api::handlers::powerpoint::convert_excel_to_pptx).layer(upload_body_limit(config)?),
        )
        .route("/healthz", get(|| async { "OK" }));

    if config.enable_docs {
        router = router
            .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
            .merge(Scalar::with_url("/docs", ApiDoc::openapi()));
    }

    if config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(move || async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(create_cors_layer(&config.cors)?).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The HTTP application.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] builds the router from configuration
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown future resolves, in-flight requests finish and telemetry
///    is flushed
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting deckctl with configuration: {:#?}", config);

        let router = build_router(&config)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "deckctl listening on http://{}, accepting browser requests from {}",
            bind_addr,
            self.config.cors.origin()
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
