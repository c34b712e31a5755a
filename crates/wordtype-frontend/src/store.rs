//! The state container holding the canonical [`AppState`].
//!
//! The container exposes two primitives: reading the current snapshot and
//! replacing it as a whole. Every replacement notifies the subscribers and
//! queues a save on the backend bridge before the write lock is released, so
//! saves reach the backend in the same order the states were published.

use std::sync::Arc;

use tokio::sync::watch;
use wordtype_bridge::state::AppState;

use crate::BackendBridge;
use crate::sync::{DocumentRoot, sync_dark_mode};

/// Current value of the container: `None` until the persisted state has
/// been restored.
pub type Snapshot = Option<Arc<AppState>>;

struct Shared {
    state: watch::Sender<Snapshot>,
    document_root: Arc<dyn DocumentRoot>,
}

impl Shared {
    /// The document root is synced under the write lock, before readers and
    /// `ready` waiters can observe the restored state.
    fn hydrate(&self, state: AppState) -> bool {
        self.state.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            sync_dark_mode(self.document_root.as_ref(), state.dark_mode);
            *current = Some(Arc::new(state));
            true
        })
    }
}

/// Shared handle to the application state. Clones refer to the same state.
#[derive(Clone)]
pub struct StateContainer {
    shared: Arc<Shared>,
    bridge: BackendBridge,
}

impl StateContainer {
    /// Creates a container that is not ready yet. It becomes ready on the
    /// first [`StateContainer::hydrate`] or [`StateContainer::dispatch`].
    pub fn new(bridge: BackendBridge, document_root: Arc<dyn DocumentRoot>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                state,
                document_root,
            }),
            bridge,
        }
    }

    /// Returns the current snapshot. Snapshots are immutable; changes go
    /// through [`StateContainer::dispatch`].
    pub fn get(&self) -> Snapshot {
        self.shared.state.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.shared.state.borrow().is_some()
    }

    /// Replaces the canonical state with `next`, notifies every subscriber
    /// and queues `next` for persistence.
    pub fn dispatch(&self, next: AppState) {
        let next = Arc::new(next);
        self.shared.state.send_modify(|current| {
            self.bridge.save_state(Arc::clone(&next));
            *current = Some(next);
        });
    }

    /// Builds the next state from the current one and dispatches it, all
    /// under the write lock. Nothing happens when the container is not ready
    /// or when `build` returns `None`. Returns whether a state was dispatched.
    ///
    /// `build` must not call back into the container.
    pub fn update(&self, build: impl FnOnce(&AppState) -> Option<AppState>) -> bool {
        self.shared.state.send_if_modified(|current| {
            let Some(state) = current.as_deref() else {
                log::debug!("State is not ready yet, ignoring update");
                return false;
            };
            let Some(next) = build(state) else {
                return false;
            };
            let next = Arc::new(next);
            self.bridge.save_state(Arc::clone(&next));
            *current = Some(next);
            true
        })
    }

    /// Installs a restored state if the container is not ready yet. A state
    /// dispatched before the restored one arrived is kept. The restored state
    /// is not persisted again.
    pub fn hydrate(&self, state: AppState) -> bool {
        self.shared.hydrate(state)
    }

    /// Receiver notified on every replacement.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.state.subscribe()
    }

    /// Waits until the container holds a state and returns it.
    pub async fn ready(&self) -> Arc<AppState> {
        let mut receiver = self.subscribe();
        loop {
            if let Some(state) = receiver.borrow_and_update().clone() {
                return state;
            }
            // The sender lives in `self`, so the channel stays open.
            let _ = receiver.changed().await;
        }
    }

    /// Whether both handles refer to the same container.
    pub fn same(&self, other: &StateContainer) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    pub(crate) fn document_root(&self) -> &dyn DocumentRoot {
        self.shared.document_root.as_ref()
    }

    pub(crate) fn hydrator(&self) -> Hydrator {
        Hydrator {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Installs restored states without holding on to the backend bridge, so
/// the listener thread never keeps the backend alive.
pub(crate) struct Hydrator {
    shared: Arc<Shared>,
}

impl Hydrator {
    pub fn hydrate(&self, state: AppState) -> bool {
        self.shared.hydrate(state)
    }
}
