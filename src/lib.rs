pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod files;
pub mod handlers;
pub mod middleware;
pub mod sessions;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store, StoreError};
use crate::error::ApiError;
use crate::sessions::{MemorySessionStore, PgSessionStore, SessionStore};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Memory-backed store and sessions
    pub fn in_memory(config: AppConfig) -> Self {
        let ttl = config.session_ttl();
        Self {
            store: Arc::new(MemoryStore::new()),
            sessions: Arc::new(MemorySessionStore::new(ttl)),
            config: Arc::new(config),
        }
    }

    /// PostgreSQL when a database URL is configured, memory otherwise
    pub async fn from_config(config: AppConfig, force_memory: bool) -> Result<Self, StoreError> {
        if force_memory || config.database.url.is_none() {
            tracing::warn!("Using in-memory store; data will not survive a restart");
            return Ok(Self::in_memory(config));
        }

        let pool = DatabaseManager::connect(&config.database).await?;
        DatabaseManager::migrate(&pool).await?;

        let ttl = config.session_ttl();
        Ok(Self {
            store: Arc::new(PgStore::new(pool.clone())),
            sessions: Arc::new(PgSessionStore::new(pool, ttl)),
            config: Arc::new(config),
        })
    }
}

/// Full application router
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes(state.clone()));

    router = match &config.server.static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("index.html"))),
        ),
        None => router.route("/", get(root)).fallback(not_found),
    };

    router
        // Global middleware
        .layer(DefaultBodyLimit::max(config.server.max_request_size_bytes))
        .layer(CookieManagerLayer::new())
        .layer(cors_layer(&config.server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    use axum::middleware::from_fn_with_state;
    use handlers::protected::{auth as session, images, projects};
    use handlers::public::auth;

    let public = Router::new()
        .route("/login", post(auth::login))
        .route("/registration", post(auth::register))
        .route("/logout", get(auth::logout));

    let protected = Router::new()
        .route("/session", post(session::session_check))
        .route("/projects/create", post(projects::project_create))
        .route("/projects/list", post(projects::project_list))
        .route("/projects/images", post(images::project_images))
        .route("/projects/update", post(images::update_image))
        .route("/projects/upload", post(images::project_upload))
        .route("/image/*path", get(images::serve_image))
        .route_layer(from_fn_with_state(state, middleware::session_auth_middleware));

    public.merge(protected).fallback(not_found)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "img-annotate-api",
        "version": version,
        "endpoints": {
            "auth": "/api/login, /api/registration, /api/logout (public), /api/session",
            "projects": "/api/projects/create, /api/projects/list",
            "images": "/api/projects/images, /api/projects/upload, /api/projects/update, /api/image/:fnu",
            "health": "/health",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(AppState::in_memory(AppConfig::development()))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok_for_memory_store() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["database"], "ok");
    }

    #[tokio::test]
    async fn unknown_api_path_is_json_404() {
        let response = test_app()
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], 404);
        assert_eq!(body["name"], "Not Found");
    }

    #[tokio::test]
    async fn protected_route_without_cookie_is_401() {
        let response = test_app()
            .oneshot(
                Request::post("/api/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["description"], "User unauthorized.");
    }

    #[tokio::test]
    async fn malformed_login_body_is_400() {
        let response = test_app()
            .oneshot(
                Request::post("/api/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"usr":"ada","pwd":"x","extra":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], 400);
    }
}
