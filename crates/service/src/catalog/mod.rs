//! Schema and instance catalogs.
//!
//! Each catalog maps one collection of the document store onto typed records,
//! keyed by user (owner) and record id (entry).

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::errors::ServiceError;
use crate::storage::JsonDocStore;

pub mod instances;
pub mod schemas;

pub use instances::InstanceCatalog;
pub use schemas::SchemaCatalog;

/// Read every record a user owns in `collection`.
///
/// Entries that disappear or fail to decode between listing and reading are
/// skipped, so one corrupt file does not hide the rest.
pub(crate) async fn load_all<T: DeserializeOwned>(
    store: &Arc<JsonDocStore>,
    collection: &str,
    user: &str,
) -> Result<Vec<T>, ServiceError> {
    let ids = store.list_entries(collection, user).await?;
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        match store.read::<T>(collection, user, &id).await {
            Ok(rec) => out.push(rec),
            Err(e) => warn!(%collection, %user, %id, error = %e, "skipping unreadable record"),
        }
    }
    Ok(out)
}

pub(crate) fn require_id(id: &str, what: &str) -> Result<(), ServiceError> {
    if id.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{what} id must not be empty")));
    }
    Ok(())
}
