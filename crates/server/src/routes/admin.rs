use std::collections::BTreeMap;

use axum::{extract::{Path, State}, Json};
use common::{COLLECTION_INSTANCES, COLLECTION_SCHEMAS};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// Every user in a collection mapped to their entry ids.
#[utoipa::path(
    get, path = "/admin/collections/{collection}", tag = "admin",
    params(("collection" = String, Path, description = "`schemas` or `instances`")),
    responses((status = 200, description = "OK"), (status = 404, description = "Unknown collection"))
)]
pub async fn list_collection(
    State(state): State<ServerState>,
    Path(collection): Path<String>,
) -> Result<Json<BTreeMap<String, Vec<String>>>, JsonApiError> {
    let owners = match collection.as_str() {
        COLLECTION_SCHEMAS => state.schemas.owners().await?,
        COLLECTION_INSTANCES => state.instances.owners().await?,
        other => return Err(JsonApiError::not_found(format!("unknown collection {other}"))),
    };
    Ok(Json(owners))
}
