//! Persistence of the application state.
//!
//! The [`PersistenceAdapter`] converts an [`AppState`] to and from a single
//! JSON payload and stores it through the [`PersistenceBackend`] selected at
//! startup. Failures never reach the caller of [`PersistenceAdapter::load`]
//! or [`PersistenceAdapter::save`]: loading falls back to the default state
//! and write failures are logged.

mod backend;
mod payload;

pub use backend::{LocalStore, PersistenceBackend};

use wordtype_bridge::{
    dictionary::{DictionaryResource, find_by_id},
    host::NativeBridgeError,
    state::AppState,
};

use payload::{PersistedState, PersistedStatePatch};

/// Errors that can occur while reading or writing the persisted state.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The payload is present but is not a state record.
    #[error("malformed persisted state: {0}")]
    MalformedPersistedState(#[source] serde_json::Error),
    /// The state could not be encoded.
    #[error("failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),
    /// The storage key does not name a file inside the store directory.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    /// The local store could not be read or written.
    #[error("local store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The host's native bridge refused the write.
    #[error(transparent)]
    NativeBridge(#[from] NativeBridgeError),
}

/// Bridges [`AppState`] values to the durable payload of the active backend.
#[derive(Debug, Clone)]
pub struct PersistenceAdapter {
    backend: PersistenceBackend,
    dictionaries: DictionaryResource,
    prefers_dark_mode: bool,
}

impl PersistenceAdapter {
    pub fn new(
        backend: PersistenceBackend,
        dictionaries: DictionaryResource,
        prefers_dark_mode: bool,
    ) -> Self {
        Self {
            backend,
            dictionaries,
            prefers_dark_mode,
        }
    }

    pub fn backend(&self) -> &PersistenceBackend {
        &self.backend
    }

    /// The state used when nothing valid was persisted.
    pub fn default_state(&self) -> AppState {
        AppState::default_with(&self.dictionaries, self.prefers_dark_mode)
    }

    /// Encodes every field of `state` except `dictionaries`.
    pub fn serialize(&self, state: &AppState) -> Result<String, PersistenceError> {
        serde_json::to_string(&PersistedState::from(state)).map_err(PersistenceError::Serialize)
    }

    /// Decodes a payload into a complete state. Missing fields take their
    /// default value and `dictionaries` is always the live list.
    ///
    /// A persisted dictionary selection is resolved by id against the live
    /// list. If the dictionary no longer exists, the first dictionary is
    /// selected and the chapter reset.
    pub fn deserialize(&self, payload: &str) -> Result<AppState, PersistenceError> {
        let mut patch: PersistedStatePatch =
            serde_json::from_str(payload).map_err(PersistenceError::MalformedPersistedState)?;
        let selection = patch.selected_dictionary.take();

        let mut state = self.default_state();
        patch.apply_to(&mut state);

        if let Some(selection) = selection {
            match find_by_id(&state.dictionaries, &selection.id) {
                Some(dictionary) => state.selected_dictionary = dictionary.clone(),
                None => {
                    log::warn!(
                        "Persisted dictionary {:?} is no longer available, selecting {:?}",
                        selection.id,
                        self.dictionaries.first().id
                    );
                    state.selected_dictionary = self.dictionaries.first().clone();
                    state.selected_chapter = 0;
                }
            }
        }

        Ok(state)
    }

    /// Returns the persisted state, or the default state if none exists or
    /// it cannot be read.
    pub async fn load(&self) -> AppState {
        let payload = match self.backend.read().await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                log::info!("No persisted state in {}, using defaults", self.backend.kind());
                return self.default_state();
            }
            Err(error) => {
                log::error!("Failed to read persisted state: {error}");
                return self.default_state();
            }
        };

        if payload.trim() == "null" {
            return self.default_state();
        }

        match self.deserialize(&payload) {
            Ok(state) => {
                log::info!("Restored persisted state from {}", self.backend.kind());
                state
            }
            Err(error) => {
                log::warn!("Discarding persisted state: {error}");
                self.default_state()
            }
        }
    }

    /// Writes `state` to the active backend. Failures are logged and
    /// otherwise ignored.
    pub async fn save(&self, state: &AppState) {
        if let Err(error) = self.try_save(state).await {
            log::error!("PersistenceWriteFailure on {}: {error}", self.backend.kind());
        }
    }

    async fn try_save(&self, state: &AppState) -> Result<(), PersistenceError> {
        let payload = self.serialize(state)?;
        self.backend.write(&payload).await
    }
}
