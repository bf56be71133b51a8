use axum::{routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
// Conditionally import CORS and Swagger UI only when needed (not test)
#[cfg(not(test))]
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};
#[cfg(not(test))]
use utoipa_swagger_ui::SwaggerUi;

pub mod db;
pub mod entities;
pub mod error;
pub mod export;
pub mod jobs;
pub mod normalize;
pub mod routes;
pub mod store;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok" when the service is up
    pub status: String,
    /// Current server time (UTC ISO-8601)
    pub time: String,
}

/// Service liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "vcintel API",
        version = "0.1.0",
        description = "Read API over aggregated VC sourcing signals"
    ),
    paths(
        health_check,
        routes::news::list_news,
        routes::companies::list_companies,
        routes::stats::get_stats
    ),
    components(schemas(
        HealthResponse,
        routes::news::NewsItemResponse,
        routes::companies::CompanyResponse,
        routes::stats::StatsResponse,
        routes::stats::NewsStats,
        routes::stats::YcStats
    ))
)]
struct ApiDoc;

/// Create the application router with all routes and middleware
pub fn create_app(db: DatabaseConnection) -> Router {
    let state = AppState { db };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/news", get(routes::news::list_news))
        .route("/yc/companies", get(routes::companies::list_companies))
        .route("/stats", get(routes::stats::get_stats))
        .with_state(state);

    // Swagger UI is left out of test builds, which only exercise the API surface
    #[cfg(not(test))]
    let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());
    #[cfg(test)]
    let docs_router = Router::new();

    let app = Router::new().merge(api_routes).merge(docs_router);

    #[cfg(not(test))]
    let app = app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    app
}
