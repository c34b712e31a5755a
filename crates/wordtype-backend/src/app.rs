//! Application context and message dispatching utilities.
//!
//! The context owns the persistence adapter and provides helpers for sending
//! responses back to the frontend bridge.

use std::sync::Arc;

use tokio::sync::mpsc::{Sender, UnboundedReceiver};
use wordtype_bridge::{MessageFromBackend, MessageToBackend};

use crate::persistence::PersistenceAdapter;
use crate::services;

/// Shared application context passed to services and message handlers.
pub(crate) struct AppContext {
    /// Adapter bound to the backend selected at startup.
    pub adapter: PersistenceAdapter,
    /// Outbound channel to the frontend bridge.
    pub tx: Sender<MessageFromBackend>,
}

impl AppContext {
    /// Read and dispatch messages from the frontend bridge until it closes.
    pub async fn consume_bridge_messages(self: &Arc<Self>, mut rx: UnboundedReceiver<MessageToBackend>) {
        while let Some(message) = rx.recv().await {
            log::debug!("Got a frontend message: {message:?}");
            self.dispatch_message(message).await;
        }
        log::info!("Frontend bridge closed, stopping backend");
    }

    /// Dispatches the received message from frontend down to individual
    /// service handlers.
    async fn dispatch_message(self: &Arc<Self>, message: MessageToBackend) {
        match message {
            MessageToBackend::LoadStateRequest => {
                services::state_service::handle_load_state_request(self.clone()).await;
            }
            MessageToBackend::SaveStateRequest(state) => {
                services::state_service::handle_save_state_request(self.clone(), state).await;
            }
        }
    }

    /// Send a message to the frontend bridge. A closed frontend is logged,
    /// not treated as an error.
    pub async fn send(&self, message: MessageFromBackend) {
        if let Err(error) = self.tx.send(message).await {
            log::warn!("Frontend is gone, dropping message: {:?}", error.0);
        }
    }
}
