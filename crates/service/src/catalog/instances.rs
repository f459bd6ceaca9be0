use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use common::types::{Instance, NewInstance};
use common::{COLLECTION_INSTANCES, COLLECTION_SCHEMAS};
use tracing::info;
use uuid::Uuid;

use super::{load_all, require_id};
use crate::errors::{ServiceError, StoreError};
use crate::storage::JsonDocStore;

/// Instances persisted under `instances/<user>/<id>.json`.
#[derive(Clone)]
pub struct InstanceCatalog {
    store: Arc<JsonDocStore>,
}

impl InstanceCatalog {
    pub fn new(store: Arc<JsonDocStore>) -> Self {
        Self { store }
    }

    /// Create an instance of one of the user's schemas.
    pub async fn create(&self, user: &str, input: NewInstance) -> Result<Instance, ServiceError> {
        let schema_known = match self.store.exists(COLLECTION_SCHEMAS, user, &input.schema_id).await {
            Ok(found) => found,
            Err(StoreError::InvalidArgument(_)) => false,
            Err(e) => return Err(e.into()),
        };
        if !schema_known {
            return Err(ServiceError::Validation("invalid schema".into()));
        }

        let now = Utc::now();
        let instance = Instance {
            id: Uuid::new_v4().to_string(),
            schema_id: input.schema_id,
            user_id: user.to_string(),
            name: input.name,
            description: input.description,
            variables: Default::default(),
            created_at: now,
            updated_at: now,
        };
        self.store.write(COLLECTION_INSTANCES, user, &instance.id, &instance).await?;
        info!(%user, id = %instance.id, schema_id = %instance.schema_id, "instance created");
        Ok(instance)
    }

    /// Overwrite the stored instance, stamping `updated_at` and the owning user.
    pub async fn save(&self, user: &str, mut instance: Instance) -> Result<Instance, ServiceError> {
        require_id(&instance.id, "instance")?;
        instance.user_id = user.to_string();
        instance.updated_at = Utc::now();
        self.store.write(COLLECTION_INSTANCES, user, &instance.id, &instance).await?;
        Ok(instance)
    }

    pub async fn get(&self, user: &str, id: &str) -> Result<Instance, ServiceError> {
        self.store
            .read(COLLECTION_INSTANCES, user, id)
            .await
            .map_err(|e| ServiceError::from_store("instance", e))
    }

    pub async fn delete(&self, user: &str, id: &str) -> Result<(), ServiceError> {
        self.store
            .delete(COLLECTION_INSTANCES, user, id)
            .await
            .map_err(|e| ServiceError::from_store("instance", e))
    }

    pub async fn list(&self, user: &str) -> Result<Vec<Instance>, ServiceError> {
        load_all(&self.store, COLLECTION_INSTANCES, user).await
    }

    pub async fn owners(&self) -> Result<BTreeMap<String, Vec<String>>, ServiceError> {
        Ok(self.store.list_all(COLLECTION_INSTANCES).await?)
    }
}
