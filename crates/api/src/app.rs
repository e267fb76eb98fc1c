use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::{CredentialStore, RaceOrderStore};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{health, race_orders};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RaceOrderStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub config: Arc<Config>,
}

pub fn create_app(
    config: Config,
    store: Arc<dyn RaceOrderStore>,
    credentials: Arc<dyn CredentialStore>,
) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        store,
        credentials,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Template management (admin API key checked by the AdminAuth extractor)
    let race_order_routes = Router::new()
        .route(
            "/",
            get(race_orders::list_race_orders).post(race_orders::submit_race_order),
        )
        .route("/new", get(race_orders::new_race_order))
        .route("/delete", post(race_orders::delete_race_orders))
        .route(
            "/:id",
            get(race_orders::get_race_order).delete(race_orders::delete_race_order),
        )
        .route("/:id/export", get(race_orders::export_race_order));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1/race-orders", race_order_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
