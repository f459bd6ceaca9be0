//! Environment/runtime helpers
//!
//! Sanity checks run once at startup before the store is opened.

use std::path::Path;

use tracing::{info, warn};

/// Make sure the data directory exists and is a directory.
pub async fn ensure_data_dir(data_dir: &Path) -> anyhow::Result<()> {
    match tokio::fs::metadata(data_dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!("{} exists but is not a directory", data_dir.display())),
        Err(_) => {
            warn!(data_dir = %data_dir.display(), "data directory missing; creating it");
            tokio::fs::create_dir_all(data_dir)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
            info!(data_dir = %data_dir.display(), "data directory created");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_and_rejects_files() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("ensure_data_dir_{}", std::process::id()));
        let dir = root.join("nested").join("data");
        ensure_data_dir(&dir).await?;
        assert!(dir.is_dir());
        ensure_data_dir(&dir).await?;

        let file = root.join("plain.txt");
        tokio::fs::write(&file, b"x").await?;
        assert!(ensure_data_dir(&file).await.is_err());

        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
