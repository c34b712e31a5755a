use std::{fmt, sync::Arc};

use crate::dictionary::DictionaryResource;

/// Error reported by a host's native bridge when a write cannot be stored.
#[derive(Debug, thiserror::Error)]
#[error("native bridge write failed: {0}")]
pub struct NativeBridgeError(pub String);

/// Durable storage injected by a native host.
///
/// When a host provides one, it replaces the local key-value store for both
/// loading and saving the application state.
pub trait NativeBridge: Send + Sync {
    /// Returns the last written payload, or `None` (or an empty string) when
    /// nothing has been written yet.
    fn read(&self) -> Option<String>;

    /// Stores the payload durably, replacing the previous one.
    fn write(&self, payload: &str) -> Result<(), NativeBridgeError>;
}

/// Capabilities and resources supplied by the host at startup.
#[derive(Clone)]
pub struct HostEnvironment {
    /// Native bridge, if the host injected one.
    pub native_bridge: Option<Arc<dyn NativeBridge>>,
    /// Dictionaries available for practice.
    pub dictionaries: DictionaryResource,
}

impl HostEnvironment {
    /// Environment of a plain desktop process: bundled dictionaries and no
    /// native bridge.
    pub fn standalone() -> Self {
        Self {
            native_bridge: None,
            dictionaries: DictionaryResource::builtin(),
        }
    }

    pub fn with_native_bridge(mut self, bridge: Arc<dyn NativeBridge>) -> Self {
        self.native_bridge = Some(bridge);
        self
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HostEnvironment")
            .field("native_bridge", &self.native_bridge.is_some())
            .field("dictionaries", &self.dictionaries)
            .finish()
    }
}
