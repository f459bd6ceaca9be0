use axum::{extract::{Path, State}, http::StatusCode, Json};
use common::types::{Instance, NewInstance};
use tracing::info;

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::routes::ServerState;

#[utoipa::path(
    post, path = "/{user}/instances/new", tag = "instances",
    params(("user" = String, Path, description = "Owning user")),
    request_body = crate::openapi::NewInstanceDoc,
    responses((status = 200, description = "Created"), (status = 400, description = "Invalid schema"))
)]
pub async fn create(
    State(state): State<ServerState>,
    Path(user): Path<String>,
    ApiJson(input): ApiJson<NewInstance>,
) -> Result<Json<Instance>, JsonApiError> {
    Ok(Json(state.instances.create(&user, input).await?))
}

#[utoipa::path(
    post, path = "/{user}/instances/save", tag = "instances",
    params(("user" = String, Path, description = "Owning user")),
    responses((status = 200, description = "Saved"), (status = 400, description = "Bad Request"))
)]
pub async fn save(
    State(state): State<ServerState>,
    Path(user): Path<String>,
    ApiJson(instance): ApiJson<Instance>,
) -> Result<&'static str, JsonApiError> {
    let saved = state.instances.save(&user, instance).await?;
    info!(%user, id = %saved.id, "instance saved");
    Ok("instance saved")
}

#[utoipa::path(
    get, path = "/{user}/instances", tag = "instances",
    params(("user" = String, Path, description = "Owning user")),
    responses((status = 200, description = "OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<Instance>>, JsonApiError> {
    Ok(Json(state.instances.list(&user).await?))
}

#[utoipa::path(
    get, path = "/{user}/instances/{id}", tag = "instances",
    params(("user" = String, Path, description = "Owning user"), ("id" = String, Path, description = "Instance id")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(
    State(state): State<ServerState>,
    Path((user, id)): Path<(String, String)>,
) -> Result<Json<Instance>, JsonApiError> {
    Ok(Json(state.instances.get(&user, &id).await?))
}

#[utoipa::path(
    delete, path = "/{user}/instances/{id}", tag = "instances",
    params(("user" = String, Path, description = "Owning user"), ("id" = String, Path, description = "Instance id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path((user, id)): Path<(String, String)>,
) -> Result<StatusCode, JsonApiError> {
    state.instances.delete(&user, &id).await?;
    info!(%user, %id, "instance deleted");
    Ok(StatusCode::NO_CONTENT)
}
