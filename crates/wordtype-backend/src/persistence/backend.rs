use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
};
use wordtype_bridge::host::NativeBridge;

use super::PersistenceError;

/// Directory-backed key-value string store. Each key is kept in its own
/// `<key>.json` file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    directory: PathBuf,
}

impl LocalStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Whether `key` names a file directly inside the store directory.
    pub fn is_valid_key(key: &str) -> bool {
        !key.is_empty() && key != "." && key != ".." && !key.contains(['/', '\\'])
    }

    fn path_for(&self, key: &str, extension: &str) -> Result<PathBuf, PersistenceError> {
        if !Self::is_valid_key(key) {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.directory.join(format!("{key}.{extension}")))
    }

    /// Returns the value stored under `key`, or `None` if nothing was stored.
    pub async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key, "json")?).await {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Stores `value` under `key` using an atomic write (write to a temporary
    /// file, fsync, rename). Creates the store directory if needed.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key, "json")?;
        let tmp_path = self.path_for(key, "tmp")?;
        fs::create_dir_all(&self.directory).await?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)
            .await?;
        file.write_all(value.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, path).await?;
        Ok(())
    }
}

/// Where the application state is persisted. Chosen once at startup.
#[derive(Clone)]
pub enum PersistenceBackend {
    /// Storage injected by a native host; used exclusively when present.
    NativeBridge(Arc<dyn NativeBridge>),
    /// Local key-value store, the payload kept under `key`.
    LocalStore { store: LocalStore, key: String },
}

impl PersistenceBackend {
    /// Picks the native bridge if the host provides one, the local store
    /// otherwise.
    pub fn detect(
        native_bridge: Option<Arc<dyn NativeBridge>>,
        store: LocalStore,
        key: impl Into<String>,
    ) -> Self {
        match native_bridge {
            Some(bridge) => {
                log::info!("Persisting state through the host's native bridge");
                PersistenceBackend::NativeBridge(bridge)
            }
            None => {
                let key = key.into();
                log::info!(
                    "Persisting state in local store {:?} under key {key:?}",
                    store.directory()
                );
                PersistenceBackend::LocalStore { store, key }
            }
        }
    }

    /// Short name of the active backend, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PersistenceBackend::NativeBridge(_) => "native bridge",
            PersistenceBackend::LocalStore { .. } => "local store",
        }
    }

    /// Reads the raw payload. Empty payloads are reported as `None`.
    pub async fn read(&self) -> Result<Option<String>, PersistenceError> {
        let payload = match self {
            PersistenceBackend::NativeBridge(bridge) => bridge.read(),
            PersistenceBackend::LocalStore { store, key } => store.get(key).await?,
        };
        Ok(payload.filter(|payload| !payload.trim().is_empty()))
    }

    /// Replaces the stored payload.
    pub async fn write(&self, payload: &str) -> Result<(), PersistenceError> {
        match self {
            PersistenceBackend::NativeBridge(bridge) => Ok(bridge.write(payload)?),
            PersistenceBackend::LocalStore { store, key } => store.set(key, payload).await,
        }
    }
}

impl std::fmt::Debug for PersistenceBackend {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceBackend::NativeBridge(_) => formatter.write_str("NativeBridge"),
            PersistenceBackend::LocalStore { store, key } => formatter
                .debug_struct("LocalStore")
                .field("directory", &store.directory())
                .field("key", key)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());

        assert!(store.get("state").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_creates_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("deep").join("store"));

        store.set("state", "first").await.unwrap();
        store.set("state", "second").await.unwrap();

        assert_eq!(store.get("state").await.unwrap().as_deref(), Some("second"));
        assert!(!dir.path().join("deep").join("store").join("state.tmp").exists());
    }

    #[tokio::test]
    async fn blank_payload_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let backend = PersistenceBackend::detect(None, LocalStore::new(dir.path()), "state");

        backend.write("  \n").await.unwrap();

        assert!(backend.read().await.unwrap().is_none());
        assert_eq!(backend.kind(), "local store");
    }

    #[tokio::test]
    async fn keys_cannot_leave_the_store_directory() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("store"));

        for key in ["../escaped", "nested/state", "nested\\state", "..", ""] {
            assert!(
                matches!(
                    store.set(key, "{}").await,
                    Err(PersistenceError::InvalidKey(rejected)) if rejected == key
                ),
                "{key:?} should be rejected"
            );
            assert!(matches!(
                store.get(key).await,
                Err(PersistenceError::InvalidKey(_))
            ));
        }

        assert!(!dir.path().join("escaped.json").exists());
        assert!(!dir.path().join("store").exists());
        assert!(LocalStore::is_valid_key("state"));
        assert!(LocalStore::is_valid_key("profile.v2"));
    }
}
