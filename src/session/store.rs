use super::{SessionStore, StoreError, crypto, crypto::StoreKey};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
};
use tracing::{debug, instrument, warn};

/// Session store whose values are sealed with [`StoreKey`]. Optionally backed by a
/// JSON file mapping key names to sealed values; every write rewrites the file.
pub struct EncryptedStore {
    key: StoreKey,
    path: Option<PathBuf>,
    entries: RwLock<BTreeMap<String, String>>,
    loaded: OnceCell<()>,
}

impl EncryptedStore {
    #[must_use]
    pub fn in_memory(key: StoreKey) -> Self {
        Self {
            key,
            path: None,
            entries: RwLock::new(BTreeMap::new()),
            loaded: OnceCell::with_value(()),
        }
    }

    /// File-backed store. The file is read lazily on first access.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, key: StoreKey) -> Self {
        Self {
            key,
            path: Some(path.into()),
            entries: RwLock::new(BTreeMap::new()),
            loaded: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn ensure_loaded(&self) -> Result<(), StoreError> {
        self.loaded.get_or_try_init(|| self.load()).map(|_| ())
    }

    #[instrument(skip(self), fields(path = ?self.path))]
    fn load(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no session file yet, starting empty");
                return Ok(());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.clone(),
                    source,
                });
            }
        };

        let parsed: BTreeMap<String, String> = if contents.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&contents)
                .map_err(|err| StoreError::Corrupt(format!("{}: {err}", path.display())))?
        };

        debug!("loaded {} session entries", parsed.len());

        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        *entries = parsed;

        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let io_err = |source: io::Error| StoreError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let body = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Encode {
            key: path.display().to_string(),
            source,
        })?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, body).map_err(io_err)?;
        restrict_permissions(&tmp).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;

        Ok(())
    }

    /// Applies `change` to a copy of the entries and swaps it in only once the
    /// copy is on disk. `change` returns false when there is nothing to write.
    fn update<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        let mut next = entries.clone();

        if change(&mut next) {
            self.persist(&next)?;
            *entries = next;
        }

        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

impl SessionStore for EncryptedStore {
    fn hydrate(&self) -> Result<(), StoreError> {
        self.ensure_loaded()
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.ensure_loaded()?;

        let sealed = {
            let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
            entries.get(key).cloned()
        };

        let Some(sealed) = sealed else {
            return Ok(None);
        };

        let plaintext = crypto::open(&self.key, key, &sealed).inspect_err(|_| {
            warn!("session value for {} could not be opened", key);
        })?;

        serde_json::from_slice(&plaintext)
            .map(Some)
            .map_err(|err| StoreError::Corrupt(format!("{key}: {err}")))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.ensure_loaded()?;

        let plaintext = serde_json::to_vec(&value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        let sealed = crypto::seal(&self.key, key, &plaintext)?;

        self.update(|entries| {
            entries.insert(key.to_string(), sealed);
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.ensure_loaded()?;

        self.update(|entries| entries.remove(key).is_some())
    }

    /// Wipes the store without reading it first, so a corrupt file can be reset.
    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        self.persist(&BTreeMap::new())?;
        entries.clear();
        drop(entries);

        // The file now matches the empty map; skip any later load.
        let _ = self.loaded.set(());
        Ok(())
    }
}

impl std::fmt::Debug for EncryptedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedStore")
            .field("key", &"***")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::keys;
    use serde_json::json;

    #[test]
    fn roundtrip_is_byte_equal() {
        let store = EncryptedStore::in_memory(StoreKey::generate());
        let values = [
            json!("eyJhbGciOiJIUzI1NiJ9.payload.sig"),
            json!("ünïcødé ✓"),
            json!(["https://github.com/a", "https://x.com/b"]),
            json!({"nested": {"n": 1.5, "flag": true}}),
        ];

        for value in values {
            store.set(keys::ABOUT, value.clone()).unwrap();
            let read = store.get(keys::ABOUT).unwrap().unwrap();
            assert_eq!(
                serde_json::to_vec(&read).unwrap(),
                serde_json::to_vec(&value).unwrap()
            );
        }
    }

    #[test]
    fn values_are_not_stored_in_clear() {
        let store = EncryptedStore::in_memory(StoreKey::generate());
        store.set(keys::EMAIL, json!("learner@example.com")).unwrap();

        let entries = store.entries.read().unwrap();
        let sealed = entries.get(keys::EMAIL).unwrap();
        assert!(!sealed.contains("learner"));
    }

    #[test]
    fn value_moved_to_other_key_fails_to_open() {
        let store = EncryptedStore::in_memory(StoreKey::generate());
        store.set(keys::TOKEN, json!("access")).unwrap();

        {
            let mut entries = store.entries.write().unwrap();
            let sealed = entries.get(keys::TOKEN).cloned().unwrap();
            entries.insert(keys::ROLE.to_string(), sealed);
        }

        assert!(matches!(
            store.get(keys::ROLE),
            Err(StoreError::Decrypt(_))
        ));
    }

    #[test]
    fn missing_key_is_none() {
        let store = EncryptedStore::in_memory(StoreKey::generate());
        assert!(store.get(keys::NAME).unwrap().is_none());
        store.remove(keys::NAME).unwrap();
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let key = StoreKey::generate();

        let first = EncryptedStore::open(&path, key.clone());
        first.set(keys::TOKEN, json!("access-1")).unwrap();
        first.set(keys::NAME, json!("Ada")).unwrap();
        first.remove(keys::NAME).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("access-1"));

        let second = EncryptedStore::open(&path, key);
        second.hydrate().unwrap();
        assert_eq!(second.get(keys::TOKEN).unwrap(), Some(json!("access-1")));
        assert!(second.get(keys::NAME).unwrap().is_none());
    }

    #[test]
    fn file_store_with_other_key_cannot_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        EncryptedStore::open(&path, StoreKey::generate())
            .set(keys::TOKEN, json!("access"))
            .unwrap();

        let other = EncryptedStore::open(&path, StoreKey::generate());
        assert!(other.get(keys::TOKEN).is_err());
    }

    #[test]
    fn missing_file_hydrates_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = EncryptedStore::open(dir.path().join("absent.json"), StoreKey::builtin());
        store.hydrate().unwrap();
        assert!(store.get(keys::TOKEN).unwrap().is_none());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = EncryptedStore::open(&path, StoreKey::builtin());
        assert!(matches!(store.hydrate(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn clear_empties_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let key = StoreKey::generate();

        let store = EncryptedStore::open(&path, key.clone());
        store.set(keys::TOKEN, json!("a")).unwrap();
        store.set(keys::ROLE, json!("user")).unwrap();
        store.clear().unwrap();

        let reopened = EncryptedStore::open(&path, key);
        assert!(reopened.get(keys::TOKEN).unwrap().is_none());
        assert!(reopened.get(keys::ROLE).unwrap().is_none());
    }

    #[test]
    fn clear_resets_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let key = StoreKey::generate();
        fs::write(&path, "{truncated").unwrap();

        let store = EncryptedStore::open(&path, key.clone());
        store.clear().unwrap();

        store.hydrate().unwrap();
        assert!(store.get(keys::TOKEN).unwrap().is_none());
        store.set(keys::TOKEN, json!("fresh")).unwrap();

        let reopened = EncryptedStore::open(&path, key);
        assert_eq!(reopened.get(keys::TOKEN).unwrap(), Some(json!("fresh")));
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = EncryptedStore::open(&path, StoreKey::generate());
        store.set(keys::TOKEN, json!("written")).unwrap();
        store.set(keys::ROLE, json!("user")).unwrap();

        // A directory where the temp file goes makes every write fail.
        fs::create_dir(path.with_extension("tmp")).unwrap();

        assert!(matches!(
            store.set(keys::TOKEN, json!("lost")),
            Err(StoreError::Io { .. })
        ));
        assert!(store.remove(keys::ROLE).is_err());
        assert!(store.clear().is_err());

        assert_eq!(store.get(keys::TOKEN).unwrap(), Some(json!("written")));
        assert_eq!(store.get(keys::ROLE).unwrap(), Some(json!("user")));
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = EncryptedStore::open(&path, StoreKey::generate());
        store.set(keys::TOKEN, json!("a")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
