use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use configs::LockScope;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::ser::PrettyFormatter;
use tokio::{
    fs,
    sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock},
};

use crate::errors::{StoreError, StoreResult};

/// File extension of every persisted record.
pub const RECORD_EXT: &str = "json";

/// JSON file-backed document store.
///
/// Records live at `<base>/<collection>/<owner>/<entry>.json`, one file per
/// record, written as indented JSON. Listings are derived from what is on disk;
/// there is no separate index.
///
/// Writes and deletes take the lock exclusively, reads and listings take it
/// shared. With [`LockScope::Global`] a single lock covers the whole store, so
/// two writes to different owners are still serialized. [`LockScope::PerOwner`]
/// narrows the lock to one `(collection, owner)` pair.
pub struct JsonDocStore {
    base_dir: PathBuf,
    locks: LockTable,
}

impl JsonDocStore {
    /// Open a store rooted at `path` with the global lock. Creates the base directory if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> StoreResult<Arc<Self>> {
        Self::open(path, LockScope::Global).await
    }

    /// Open a store rooted at `path` using the given lock scope.
    pub async fn open<P: Into<PathBuf>>(path: P, scope: LockScope) -> StoreResult<Arc<Self>> {
        let base_dir = path.into();
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StoreError::io(&base_dir, e))?;
        Ok(Arc::new(Self { base_dir, locks: LockTable::new(scope) }))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn lock_scope(&self) -> LockScope {
        self.locks.scope
    }

    /// Persist `record` at `collection/owner/entry`, replacing any previous record.
    ///
    /// The record is encoded before anything on disk is touched, so an encoding
    /// failure leaves the old record in place.
    pub async fn write<T>(&self, collection: &str, owner: &str, entry: &str, record: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        validate_path(collection, owner, entry)?;
        let data = encode(record)?;

        let _guard = self.locks.exclusive(collection, owner).await;
        let dir = self.owner_dir(collection, owner);
        fs::create_dir_all(&dir).await.map_err(|e| StoreError::io(&dir, e))?;

        let path = dir.join(record_file_name(entry));
        fs::write(&path, data).await.map_err(|e| StoreError::io(&path, e))?;
        Ok(())
    }

    /// Load the record at `collection/owner/entry` and decode it as `T`.
    pub async fn read<T>(&self, collection: &str, owner: &str, entry: &str) -> StoreResult<T>
    where
        T: DeserializeOwned,
    {
        validate_path(collection, owner, entry)?;
        let path = self.entry_path(collection, owner, entry);

        let bytes = {
            let _guard = self.locks.shared(collection, owner).await;
            match fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound { path }),
                Err(e) => return Err(StoreError::io(&path, e)),
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Deserialization { path, source })
    }

    /// Remove the record at `collection/owner/entry`. Parent directories are left alone.
    pub async fn delete(&self, collection: &str, owner: &str, entry: &str) -> StoreResult<()> {
        validate_path(collection, owner, entry)?;
        let path = self.entry_path(collection, owner, entry);

        let _guard = self.locks.exclusive(collection, owner).await;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound { path }),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    /// Whether a record is currently persisted at `collection/owner/entry`.
    pub async fn exists(&self, collection: &str, owner: &str, entry: &str) -> StoreResult<bool> {
        validate_path(collection, owner, entry)?;
        let path = self.entry_path(collection, owner, entry);

        let _guard = self.locks.shared(collection, owner).await;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    /// Entry names stored under `collection/owner`, sorted. A missing owner yields an empty list.
    pub async fn list_entries(&self, collection: &str, owner: &str) -> StoreResult<Vec<String>> {
        validate_component("collection", collection)?;
        validate_component("owner", owner)?;
        let dir = self.owner_dir(collection, owner);

        let _guard = self.locks.shared(collection, owner).await;
        match scan_entries(&dir).await {
            Ok(names) => Ok(names),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::io(&dir, e)),
        }
    }

    /// Every owner under `collection` mapped to its entry names.
    ///
    /// Best effort: an owner whose directory cannot be scanned is left out of
    /// the result instead of failing the call. A missing collection yields an
    /// empty map.
    pub async fn list_all(&self, collection: &str) -> StoreResult<BTreeMap<String, Vec<String>>> {
        validate_component("collection", collection)?;
        let dir = self.base_dir.join(collection);

        // Held for the whole traversal; owner scans below must not lock again.
        let _global = self.locks.shared_store().await;

        let mut owners = match fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::io(&dir, e)),
        };

        let mut result = BTreeMap::new();
        while let Some(owner_entry) = owners.next_entry().await.map_err(|e| StoreError::io(&dir, e))? {
            let is_dir = owner_entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            let Some(owner) = owner_entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };

            let _shard = self.locks.shared_owner(collection, &owner).await;
            if let Ok(entries) = scan_entries(&owner_entry.path()).await {
                result.insert(owner, entries);
            }
        }
        Ok(result)
    }

    fn owner_dir(&self, collection: &str, owner: &str) -> PathBuf {
        self.base_dir.join(collection).join(owner)
    }

    fn entry_path(&self, collection: &str, owner: &str, entry: &str) -> PathBuf {
        self.owner_dir(collection, owner).join(record_file_name(entry))
    }
}

/// Read/write locks guarding the store, either one for everything or one per owner.
///
/// Per-owner locks are created on first use and dropped from the table as soon
/// as the last guard or waiter for that owner goes away, so the table only
/// holds owners with an operation in flight.
struct LockTable {
    scope: LockScope,
    global: Arc<RwLock<()>>,
    owners: DashMap<(String, String), Arc<RwLock<()>>>,
}

/// Lock guard that also releases its owner slot in the [`LockTable`].
///
/// Fields drop in declaration order: the lock is released before the slot is
/// considered for eviction.
struct ScopedGuard<'a, G> {
    _inner: G,
    _slot: Option<OwnerSlot<'a>>,
}

struct OwnerSlot<'a> {
    table: &'a LockTable,
    key: (String, String),
}

impl Drop for OwnerSlot<'_> {
    fn drop(&mut self) {
        // the table's own reference is the only one left
        self.table.owners.remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl LockTable {
    fn new(scope: LockScope) -> Self {
        Self { scope, global: Arc::new(RwLock::new(())), owners: DashMap::new() }
    }

    fn handle(&self, collection: &str, owner: &str) -> (Arc<RwLock<()>>, Option<OwnerSlot<'_>>) {
        match self.scope {
            LockScope::Global => (Arc::clone(&self.global), None),
            LockScope::PerOwner => {
                let key = (collection.to_string(), owner.to_string());
                let lock = self.owners.entry(key.clone()).or_default().value().clone();
                (lock, Some(OwnerSlot { table: self, key }))
            }
        }
    }

    async fn shared(&self, collection: &str, owner: &str) -> ScopedGuard<'_, OwnedRwLockReadGuard<()>> {
        let (lock, slot) = self.handle(collection, owner);
        ScopedGuard { _inner: lock.read_owned().await, _slot: slot }
    }

    async fn exclusive(&self, collection: &str, owner: &str) -> ScopedGuard<'_, OwnedRwLockWriteGuard<()>> {
        let (lock, slot) = self.handle(collection, owner);
        ScopedGuard { _inner: lock.write_owned().await, _slot: slot }
    }

    /// Shared guard over the whole store; only taken with the global scope.
    async fn shared_store(&self) -> Option<OwnedRwLockReadGuard<()>> {
        match self.scope {
            LockScope::Global => Some(Arc::clone(&self.global).read_owned().await),
            LockScope::PerOwner => None,
        }
    }

    /// Shared guard over one owner; only taken with the per-owner scope.
    async fn shared_owner(&self, collection: &str, owner: &str) -> Option<ScopedGuard<'_, OwnedRwLockReadGuard<()>>> {
        match self.scope {
            LockScope::Global => None,
            LockScope::PerOwner => Some(self.shared(collection, owner).await),
        }
    }
}

fn record_file_name(entry: &str) -> String {
    format!("{entry}.{RECORD_EXT}")
}

fn encode<T: Serialize + ?Sized>(record: &T) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    record.serialize(&mut ser).map_err(StoreError::Serialization)?;
    Ok(buf)
}

/// Names of `*.json` files directly under `dir`, extension stripped, sorted.
async fn scan_entries(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut rd = fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = rd.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

fn validate_path(collection: &str, owner: &str, entry: &str) -> StoreResult<()> {
    validate_component("collection", collection)?;
    validate_component("owner", owner)?;
    validate_component("entry", entry)
}

/// Reject identifiers that would escape or restructure the directory layout.
fn validate_component(kind: &str, value: &str) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::invalid(format!("{kind} must not be empty")));
    }
    if value == "." || value == ".." {
        return Err(StoreError::invalid(format!("{kind} must not be '{value}'")));
    }
    if value.chars().any(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(StoreError::invalid(format!("{kind} must not contain path separators")));
    }
    Ok(())
}
