use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct NewSchemaDoc { pub name: String, pub description: String }

#[derive(ToSchema)]
pub struct NewInstanceDoc { pub name: String, pub description: String, pub schema_id: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::schemas::create,
        crate::routes::schemas::save,
        crate::routes::schemas::list,
        crate::routes::schemas::get,
        crate::routes::schemas::delete,
        crate::routes::instances::create,
        crate::routes::instances::save,
        crate::routes::instances::list,
        crate::routes::instances::get,
        crate::routes::instances::delete,
        crate::routes::admin::list_collection,
    ),
    components(
        schemas(
            HealthResponse,
            NewSchemaDoc,
            NewInstanceDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "schemas"),
        (name = "instances"),
        (name = "admin")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/health",
            "/{user}/schemas",
            "/{user}/schemas/{id}",
            "/{user}/instances/new",
            "/admin/collections/{collection}",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {expected} in {paths:?}");
        }
    }
}
