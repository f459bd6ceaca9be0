use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use common::types::{NewSchema, Schema};
use common::COLLECTION_SCHEMAS;
use tracing::info;
use uuid::Uuid;

use super::{load_all, require_id};
use crate::errors::ServiceError;
use crate::storage::JsonDocStore;

/// Schemas persisted under `schemas/<user>/<id>.json`.
#[derive(Clone)]
pub struct SchemaCatalog {
    store: Arc<JsonDocStore>,
}

impl SchemaCatalog {
    pub fn new(store: Arc<JsonDocStore>) -> Self {
        Self { store }
    }

    /// Create an empty schema at version 1 with a fresh id.
    pub async fn create(&self, user: &str, input: NewSchema) -> Result<Schema, ServiceError> {
        let now = Utc::now();
        let schema = Schema {
            id: Uuid::new_v4().to_string(),
            version: 1,
            user_version: 1,
            name: input.name,
            description: input.description,
            variables: Default::default(),
            visualizations: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.store.write(COLLECTION_SCHEMAS, user, &schema.id, &schema).await?;
        info!(%user, id = %schema.id, "schema created");
        Ok(schema)
    }

    /// Overwrite the stored schema with `schema`, stamping `updated_at`.
    pub async fn save(&self, user: &str, mut schema: Schema) -> Result<Schema, ServiceError> {
        require_id(&schema.id, "schema")?;
        schema.updated_at = Utc::now();
        self.store.write(COLLECTION_SCHEMAS, user, &schema.id, &schema).await?;
        Ok(schema)
    }

    pub async fn get(&self, user: &str, id: &str) -> Result<Schema, ServiceError> {
        self.store
            .read(COLLECTION_SCHEMAS, user, id)
            .await
            .map_err(|e| ServiceError::from_store("schema", e))
    }

    pub async fn delete(&self, user: &str, id: &str) -> Result<(), ServiceError> {
        self.store
            .delete(COLLECTION_SCHEMAS, user, id)
            .await
            .map_err(|e| ServiceError::from_store("schema", e))
    }

    pub async fn exists(&self, user: &str, id: &str) -> Result<bool, ServiceError> {
        Ok(self.store.exists(COLLECTION_SCHEMAS, user, id).await?)
    }

    pub async fn list(&self, user: &str) -> Result<Vec<Schema>, ServiceError> {
        load_all(&self.store, COLLECTION_SCHEMAS, user).await
    }

    /// Every user with schemas, mapped to their schema ids.
    pub async fn owners(&self) -> Result<BTreeMap<String, Vec<String>>, ServiceError> {
        Ok(self.store.list_all(COLLECTION_SCHEMAS).await?)
    }
}
