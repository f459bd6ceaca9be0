//! Runtime environment helpers
//!
//! Opens the document store described by the storage config, after making
//! sure its data directory is usable.

use std::{path::Path, sync::Arc};

use configs::StorageConfig;
use tracing::info;

use crate::storage::JsonDocStore;

pub async fn open_store(cfg: &StorageConfig) -> anyhow::Result<Arc<JsonDocStore>> {
    let base = Path::new(&cfg.base_dir);
    common::env::ensure_data_dir(base).await?;
    let store = JsonDocStore::open(base, cfg.lock_scope).await?;
    info!(base_dir = %base.display(), lock_scope = ?cfg.lock_scope, "document store opened");
    Ok(store)
}
