//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, body limit, route gate, metrics)
//! - Serve plain TCP or TLS with graceful shutdown
//! - Serve the dashboard's static files behind the gate

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::handlers::{auth, proxy, public, status, upload};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response;
use crate::net::tls::load_tls_config;
use crate::observability::metrics;
use crate::routing::{route_gate_middleware, RouteGate};
use crate::session::SessionPolicy;
use crate::upstream::BackendClient;

/// How long in-flight TLS connections get to finish after shutdown.
const TLS_DRAIN_SECS: u64 = 10;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub backend: BackendClient,
    pub session_policy: Arc<SessionPolicy>,
    pub gate: Arc<RouteGate>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        let backend = BackendClient::from_config(&config.backend);
        Self::with_backend(config, backend)
    }

    /// Build state around an existing backend client.
    pub fn with_backend(config: GatewayConfig, backend: BackendClient) -> Self {
        let session_policy = Arc::new(SessionPolicy::from_config(
            &config.session,
            config.environment,
        ));
        let gate = Arc::new(RouteGate::from_config(&config.gate));
        Self {
            config: Arc::new(config),
            backend,
            session_policy,
            gate,
        }
    }
}

impl FromRef<AppState> for Arc<SessionPolicy> {
    fn from_ref(state: &AppState) -> Self {
        state.session_policy.clone()
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        Self::from_state(AppState::new(config))
    }

    pub fn from_state(state: AppState) -> Self {
        if !state.backend.is_configured() {
            tracing::warn!("Backend base URL not configured; API endpoints will answer 500");
        }
        let config = state.config.clone();
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/auth/login", post(auth::login))
            .route("/auth/logout", post(auth::logout))
            .route("/auth/session", get(auth::session_status))
            .route(
                "/proxy/{*path}",
                get(proxy::forward)
                    .post(proxy::forward)
                    .put(proxy::forward)
                    .patch(proxy::forward)
                    .delete(proxy::forward)
                    .fallback(method_not_allowed),
            )
            .route("/categories", get(public::categories))
            .route("/upload/avatar", post(upload::avatar))
            .route("/upload/image", post(upload::image))
            .route("/health", get(status::health))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .fallback(not_found)
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            ));

        let router = Router::new().nest("/api", api);

        let router = match &config.frontend.static_dir {
            Some(dir) => {
                let index = Path::new(dir).join("index.html");
                router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
            }
            None => router.fallback(not_found),
        };

        router
            .layer(middleware::from_fn_with_state(
                state.clone(),
                route_gate_middleware,
            ))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(middleware::map_response(envelope_oversized))
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;

        match self.config.listener.tls.clone() {
            Some(tls) => {
                let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;
                tracing::info!(address = %addr, "HTTPS server starting");

                let handle = axum_server::Handle::new();
                let drain = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    tracing::info!("Shutdown signal received");
                    drain.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
            None => {
                tracing::info!(address = %addr, "HTTP server starting");
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                        tracing::info!("Shutdown signal received");
                    })
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

async fn not_found() -> Response {
    response::failure(StatusCode::NOT_FOUND, "Not found")
}

async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed
}

/// The body limit layer answers oversized requests with plain text before
/// any handler runs; give those the envelope too.
async fn envelope_oversized(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return GatewayError::PayloadTooLarge.into_response();
    }
    response
}
