pub mod service_requests;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

pub use service_requests::ServerState;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health, service request CRUD, docs.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new().route("/health", get(health));

    let api = Router::new()
        .route(
            "/servicerequest",
            get(service_requests::list).post(service_requests::create),
        )
        .route(
            "/servicerequest/:id",
            get(service_requests::get)
                .put(service_requests::update)
                .delete(service_requests::delete),
        );

    let docs =
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi());

    public
        .merge(api)
        .merge(docs)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
