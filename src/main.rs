use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use rptgis_api::database::manager::DatabaseManager;
use rptgis_api::handlers;
use rptgis_api::is_production;
use rptgis_api::middleware::{
    admin_gate_middleware, jwt_auth_middleware, provincial_db_middleware,
};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rptgis_api=debug,tower_http=debug".into()),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = rptgis_api::config::config();
    tracing::info!("Starting RPT-GIS API in {:?} mode", config.environment);

    if is_production!() && config.security.jwt_secret.is_empty() {
        tracing::warn!("SECRET_KEY is not set; every protected request will be rejected");
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("RPTGIS_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 RPT-GIS API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_public_routes())
        // Routed tier: provincial users working inside their province DB
        .merge(provincial_routes())
        // Admin tier: directory management
        .merge(admin_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
}

fn provincial_routes() -> Router {
    use axum::routing::post;
    use handlers::protected::{schemas, sync};

    Router::new()
        .route("/api/list-schemas", get(schemas::list_schemas))
        .route(
            "/api/sync-config",
            get(sync::get_sync_config).post(sync::post_sync_config),
        )
        .route("/api/sync-push", post(sync::push))
        .route("/api/sync-pull", post(sync::pull))
        // Layers run bottom-up: JWT first, then provincial routing
        .layer(axum::middleware::from_fn(provincial_db_middleware))
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn admin_routes() -> Router {
    use axum::routing::put;
    use handlers::admin::users;

    Router::new()
        .route("/api/admin/users", get(users::list))
        .route("/api/admin/users/:id/access", put(users::set_access))
        .layer(axum::middleware::from_fn(admin_gate_middleware))
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "RPT-GIS API",
            "version": version,
            "description": "Provincial GIS backend with RPT JoinedTable synchronization",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/login, /api/auth/register (public - token acquisition)",
                "schemas": "/api/list-schemas (protected)",
                "sync": "/api/sync-config, /api/sync-push, /api/sync-pull (protected)",
                "admin": "/api/admin/users (admin)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
