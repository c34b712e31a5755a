//! Backend runtime setup and orchestration.
//!
//! This module wires together configuration, backend selection, and the
//! message dispatch loop that listens to frontend bridge requests.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use tokio::sync::mpsc::{Sender, UnboundedReceiver};
use wordtype_bridge::{
    MessageFromBackend, MessageToBackend,
    config::{Config, DEFAULT_STORAGE_KEY},
    host::HostEnvironment,
};

use crate::app::AppContext;
use crate::persistence::{LocalStore, PersistenceAdapter, PersistenceBackend};

/// Builds the persistence adapter for the given host and configuration.
pub fn build_adapter(host: HostEnvironment, config: &Config) -> PersistenceAdapter {
    let directory = crate::config::resolve_storage_dir(config).unwrap_or_else(|error| {
        let fallback = std::env::temp_dir().join("wordtype");
        log::warn!("{error}, keeping state in {fallback:?}");
        fallback
    });

    let mut key = config.storage.key.clone();
    if !LocalStore::is_valid_key(&key) {
        log::warn!("Invalid storage key {key:?}, using {DEFAULT_STORAGE_KEY:?}");
        key = DEFAULT_STORAGE_KEY.to_string();
    }

    let backend = PersistenceBackend::detect(host.native_bridge, LocalStore::new(directory), key);
    PersistenceAdapter::new(
        backend,
        host.dictionaries,
        config.appearance.prefers_dark_mode,
    )
}

/// Initialize the persistence adapter and start processing frontend messages.
async fn setup_backend(
    rx: UnboundedReceiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
    host: HostEnvironment,
    config: Option<Config>,
) {
    let config = match config {
        Some(config) => config,
        None => crate::config::load_config().await.unwrap_or_else(|error| {
            log::error!("Failed to load config, using defaults: {error}");
            Config::default()
        }),
    };

    let adapter = build_adapter(host, &config);
    let context = Arc::new(AppContext { adapter, tx });
    context.consume_bridge_messages(rx).await;
}

fn spawn_backend(
    rx: UnboundedReceiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
    host: HostEnvironment,
    config: Option<Config>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(error) => {
                log::error!("Failed to build tokio runtime, state will not persist: {error}");
                return;
            }
        };
        runtime.block_on(async { setup_backend(rx, tx, host, config).await });
    })
}

/// Spawn the backend runtime with the configuration found in the user's
/// configuration directory and begin processing bridge messages.
///
/// The returned handle finishes once every frontend sender is dropped.
pub fn run(
    rx: UnboundedReceiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
    host: HostEnvironment,
) -> JoinHandle<()> {
    spawn_backend(rx, tx, host, None)
}

/// Same as [`run`], with an explicit configuration.
pub fn run_with_config(
    rx: UnboundedReceiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
    host: HostEnvironment,
    config: Config,
) -> JoinHandle<()> {
    spawn_backend(rx, tx, host, Some(config))
}
