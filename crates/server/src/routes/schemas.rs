use axum::{extract::{Path, State}, http::StatusCode, Json};
use common::types::{NewSchema, Schema};
use tracing::info;

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::routes::ServerState;

#[utoipa::path(
    post, path = "/{user}/schemas/new", tag = "schemas",
    params(("user" = String, Path, description = "Owning user")),
    request_body = crate::openapi::NewSchemaDoc,
    responses((status = 200, description = "Created"), (status = 400, description = "Bad Request"))
)]
pub async fn create(
    State(state): State<ServerState>,
    Path(user): Path<String>,
    ApiJson(input): ApiJson<NewSchema>,
) -> Result<Json<Schema>, JsonApiError> {
    let schema = state.schemas.create(&user, input).await?;
    Ok(Json(schema))
}

#[utoipa::path(
    post, path = "/{user}/schemas/save", tag = "schemas",
    params(("user" = String, Path, description = "Owning user")),
    responses((status = 200, description = "Saved"), (status = 400, description = "Bad Request"))
)]
pub async fn save(
    State(state): State<ServerState>,
    Path(user): Path<String>,
    ApiJson(schema): ApiJson<Schema>,
) -> Result<&'static str, JsonApiError> {
    let saved = state.schemas.save(&user, schema).await?;
    info!(%user, id = %saved.id, "schema saved");
    Ok("schema saved")
}

#[utoipa::path(
    get, path = "/{user}/schemas", tag = "schemas",
    params(("user" = String, Path, description = "Owning user")),
    responses((status = 200, description = "OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<Schema>>, JsonApiError> {
    let schemas = state.schemas.list(&user).await?;
    Ok(Json(schemas))
}

#[utoipa::path(
    get, path = "/{user}/schemas/{id}", tag = "schemas",
    params(("user" = String, Path, description = "Owning user"), ("id" = String, Path, description = "Schema id")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(
    State(state): State<ServerState>,
    Path((user, id)): Path<(String, String)>,
) -> Result<Json<Schema>, JsonApiError> {
    Ok(Json(state.schemas.get(&user, &id).await?))
}

#[utoipa::path(
    delete, path = "/{user}/schemas/{id}", tag = "schemas",
    params(("user" = String, Path, description = "Owning user"), ("id" = String, Path, description = "Schema id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path((user, id)): Path<(String, String)>,
) -> Result<StatusCode, JsonApiError> {
    state.schemas.delete(&user, &id).await?;
    info!(%user, %id, "schema deleted");
    Ok(StatusCode::NO_CONTENT)
}
