//! Frontend side of the application state.
//!
//! The [`StateContainer`] holds the canonical state shared by every UI
//! consumer. Accessors give each consumer a narrow view of one field, and
//! every change is forwarded to the backend for persistence.

use std::{sync::Arc, thread};

use anyhow::Context;
use tokio::sync::mpsc;
use wordtype_bridge::{MessageFromBackend, MessageToBackend, state::AppState};

pub mod accessors;
pub mod formatting;
pub mod store;
pub mod sync;

pub use crate::store::StateContainer;
use crate::sync::DocumentRoot;

#[derive(Clone)]
pub struct BackendBridge {
    to_backend: mpsc::UnboundedSender<MessageToBackend>,
}

impl BackendBridge {
    pub fn new(to_backend: mpsc::UnboundedSender<MessageToBackend>) -> Self {
        Self { to_backend }
    }

    pub fn request_state(&self) -> anyhow::Result<()> {
        self.to_backend
            .send(MessageToBackend::LoadStateRequest)
            .context("failed to request the persisted state")
    }

    /// Queues a state for persistence. Never blocks; if the backend is gone
    /// the state is only kept in memory.
    pub fn save_state(&self, state: Arc<AppState>) {
        if self
            .to_backend
            .send(MessageToBackend::SaveStateRequest(state))
            .is_err()
        {
            log::warn!("Backend is not running, state will not persist");
        }
    }
}

/// Creates the state container, starts listening to backend messages and
/// requests the persisted state. The container is not ready until the
/// backend answers (see [`StateContainer::ready`]).
pub fn run(
    mut rx: mpsc::Receiver<MessageFromBackend>,
    tx: mpsc::UnboundedSender<MessageToBackend>,
    document_root: Arc<dyn DocumentRoot>,
) -> anyhow::Result<StateContainer> {
    let bridge = BackendBridge::new(tx);
    let container = StateContainer::new(bridge.clone(), document_root);

    let hydrator = container.hydrator();
    thread::Builder::new()
        .name("backend-listener".to_string())
        .spawn(move || {
            while let Some(message) = rx.blocking_recv() {
                match message {
                    MessageFromBackend::StateLoaded(state) => {
                        log::debug!("Got the persisted state from backend");
                        if !hydrator.hydrate(state) {
                            log::info!("State changed before it was restored, keeping the newer one");
                        }
                    }
                }
            }
        })
        .context("failed to spawn the backend listener")?;

    bridge.request_state()?;
    Ok(container)
}

#[cfg(test)]
pub(crate) type TestContainer = (
    StateContainer,
    mpsc::UnboundedReceiver<MessageToBackend>,
    sync::ClassList,
);

#[cfg(test)]
pub(crate) fn test_container() -> TestContainer {
    let (tx, rx) = mpsc::unbounded_channel();
    let classes = sync::ClassList::default();
    let container = StateContainer::new(BackendBridge::new(tx), Arc::new(classes.clone()));
    (container, rx, classes)
}

/// Document root that takes `delay` to apply every class change.
#[cfg(test)]
pub(crate) struct SlowRoot {
    classes: sync::ClassList,
    delay: std::time::Duration,
}

#[cfg(test)]
impl DocumentRoot for SlowRoot {
    fn set_class(&self, class: &str, enabled: bool) {
        thread::sleep(self.delay);
        self.classes.set_class(class, enabled);
    }
}

#[cfg(test)]
pub(crate) fn slow_test_container(delay: std::time::Duration) -> TestContainer {
    let (tx, rx) = mpsc::unbounded_channel();
    let classes = sync::ClassList::default();
    let root = SlowRoot {
        classes: classes.clone(),
        delay,
    };
    let container = StateContainer::new(BackendBridge::new(tx), Arc::new(root));
    (container, rx, classes)
}
