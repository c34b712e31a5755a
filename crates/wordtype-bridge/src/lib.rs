//! Communication bridge between frontend and backend.
//!
//! This crate defines the application state shared by every UI consumer,
//! the dictionaries it refers to, the contract a native host implements to
//! provide durable storage, and the messages exchanged between the frontend
//! state container and the backend persistence worker.
//!
//! The frontend sends commands (load the persisted state, save a new state)
//! and the backend answers with the restored state. Communication happens
//! over [`tokio::sync::mpsc`] channels wrapped in [`BridgeChannels`].

pub mod config;
pub mod dictionary;
pub mod host;
pub mod state;

use std::sync::Arc;

use tokio::sync::mpsc::{self, Receiver, Sender, UnboundedReceiver, UnboundedSender};

/// Messages emitted by the backend to inform the frontend of state updates.
#[derive(Debug, Clone)]
pub enum MessageFromBackend {
    /// Response to [`MessageToBackend::LoadStateRequest`]: the restored
    /// state, or the default state if nothing valid was persisted.
    StateLoaded(state::AppState),
}

/// Commands issued by the frontend to the backend.
#[derive(Debug, Clone)]
pub enum MessageToBackend {
    /// Request for the persisted application state.
    LoadStateRequest,
    /// Request to persist a newly dispatched state. Requests are handled in
    /// the order they were sent.
    SaveStateRequest(Arc<state::AppState>),
}

/// Paired `tokio::mpsc` channels for bidirectional communication between
/// frontend and backend.
///
/// The frontend-to-backend direction is unbounded so that dispatching a new
/// state never blocks and never drops a save request.
pub struct BridgeChannels {
    /// Receiver used by the frontend to get messages from the backend.
    pub frontend_rx: Receiver<MessageFromBackend>,
    /// Sender used by the frontend to send commands to the backend.
    pub frontend_tx: UnboundedSender<MessageToBackend>,

    /// Receiver used by the backend to get commands from the frontend.
    pub backend_rx: UnboundedReceiver<MessageToBackend>,
    /// Sender used by the backend to send events/responses to the frontend.
    pub backend_tx: Sender<MessageFromBackend>,
}

impl BridgeChannels {
    /// Creates a new pair of bridged channels, the backend-to-frontend one
    /// with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (to_backend_tx, to_backend_rx) = mpsc::unbounded_channel();
        let (to_frontend_tx, to_frontend_rx) = mpsc::channel(buffer);
        Self {
            frontend_tx: to_backend_tx,
            frontend_rx: to_frontend_rx,
            backend_rx: to_backend_rx,
            backend_tx: to_frontend_tx,
        }
    }
}

impl Default for BridgeChannels {
    fn default() -> Self {
        Self::new(16)
    }
}
