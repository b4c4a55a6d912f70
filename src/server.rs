// server.rs - router assembly and the HTTP server lifecycle

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, SecurityConfig, StoreBackend};
use crate::database::{schema, DatabaseManager, EntityStore, MemoryStore, PgStore};
use crate::handlers::{protected, public};
use crate::middleware::require_auth;
use crate::repository::Repository;
use crate::services::DashboardService;

/// Shared handler state. Cloned per request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub repository: Repository,
    pub dashboard: DashboardService,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(repository: Repository, jwt_secret: &str) -> Self {
        Self {
            dashboard: DashboardService::new(repository.clone()),
            repository,
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API
        .nest("/api", api_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router.with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    use protected::{dashboard, maintenance, properties, tenants, transactions, user};

    Router::new()
        .route("/auth/user", get(user::current_user))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/properties", get(properties::list).post(properties::create))
        .route(
            "/properties/:id",
            get(properties::get)
                .put(properties::update)
                .delete(properties::delete),
        )
        .route("/properties/:id/tenants", get(properties::tenants))
        .route("/properties/:id/maintenance", get(properties::maintenance))
        .route("/properties/:id/transactions", get(properties::transactions))
        .route("/tenants", get(tenants::list).post(tenants::create))
        .route("/tenants/lease-alerts", get(tenants::lease_alerts))
        .route(
            "/tenants/:id",
            get(tenants::get).put(tenants::update).delete(tenants::delete),
        )
        .route("/maintenance", post(maintenance::create))
        .route(
            "/maintenance/:id",
            get(maintenance::get)
                .put(maintenance::update)
                .delete(maintenance::delete),
        )
        .route("/transactions", post(transactions::create))
        .route(
            "/transactions/:id",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route_layer(from_fn_with_state(state, require_auth))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Build the configured store, migrating PostgreSQL first when enabled
pub async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn EntityStore>> {
    match config.database.backend {
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database).await?;
            if config.database.run_migrations {
                let applied = schema::run_migrations(&pool).await?;
                info!(applied, "Migrations complete");
            }
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

/// `RUST_LOG` wins; otherwise info for this crate and request traces
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("landlord_api=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let store = connect_store(config).await?;
    let state = AppState::new(Repository::new(store), &config.security.jwt_secret);
    let app = app(state, config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Landlord API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
