//! Backend service handlers for frontend-driven requests.
//!
//! Handlers operate on the shared `AppContext`, perform the persistence side
//! effects and answer the frontend through the bridge.

pub mod state_service;

/// Represents a type that is used in all handlers as an application context.
pub(crate) type AppContextHandle = std::sync::Arc<crate::app::AppContext>;
