//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use super::auth::{AuthState, require_identity};
use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{bookings, health, spots, vehicles};
use crate::core::CoreApp;
use crate::core::config::AppConfig;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::data::TransactionalService;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Serve until shutdown is triggered; returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(
            app.config
                .server
                .host
                .parse()
                .with_context(|| format!("Invalid bind address: {}", app.config.server.host))?,
            app.config.server.port,
        );

        let router = build_router(app.database.clone(), &app.config, &allowed_origins);

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::debug!(%addr, "API server listening");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Assemble the full HTTP router
///
/// Resource routes under `/api/v1` require an identity; health and the
/// OpenAPI document are public.
pub fn build_router(
    database: Arc<TransactionalService>,
    config: &AppConfig,
    allowed_origins: &AllowedOrigins,
) -> Router {
    let auth_state = AuthState {
        enabled: config.auth.enabled,
    };

    let spots_routes = spots::routes(database.clone(), config.search.limits()).layer(
        axum::middleware::from_fn_with_state(auth_state.clone(), require_identity),
    );
    let vehicles_routes = vehicles::routes(database.clone()).layer(
        axum::middleware::from_fn_with_state(auth_state.clone(), require_identity),
    );
    let bookings_routes = bookings::routes(database.clone()).layer(
        axum::middleware::from_fn_with_state(auth_state, require_identity),
    );

    let health_routes = Router::new()
        .route("/", get(health::health))
        .with_state(health::HealthState { database });

    Router::new()
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .route("/api/docs/", get(swagger_ui_html))
        .nest("/api/v1/health", health_routes)
        .nest("/api/v1/spots", spots_routes)
        .nest("/api/v1/vehicles", vehicles_routes)
        .nest("/api/v1/bookings", bookings_routes)
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors(allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}
