use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::catalog::{InstanceCatalog, SchemaCatalog};
use service::storage::JsonDocStore;

use crate::openapi::ApiDoc;

pub mod admin;
pub mod instances;
pub mod schemas;

/// Shared handler state; everything in it is a cheap handle over one store.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<JsonDocStore>,
    pub schemas: SchemaCatalog,
    pub instances: InstanceCatalog,
}

impl ServerState {
    pub fn new(store: Arc<JsonDocStore>) -> Self {
        Self {
            schemas: SchemaCatalog::new(Arc::clone(&store)),
            instances: InstanceCatalog::new(Arc::clone(&store)),
            store,
        }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: health, schema/instance routes, and admin listing
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    let schema_routes = Router::new()
        .route("/:user/schemas", get(schemas::list))
        .route("/:user/schemas/new", post(schemas::create))
        .route("/:user/schemas/save", post(schemas::save))
        .route("/:user/schemas/:id", get(schemas::get).delete(schemas::delete));

    let instance_routes = Router::new()
        .route("/:user/instances", get(instances::list))
        .route("/:user/instances/new", post(instances::create))
        .route("/:user/instances/save", post(instances::save))
        .route("/:user/instances/:id", get(instances::get).delete(instances::delete));

    let admin_routes = Router::new()
        .route("/admin/collections/:collection", get(admin::list_collection));

    public
        .merge(schema_routes)
        .merge(instance_routes)
        .merge(admin_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx responses are logged at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
