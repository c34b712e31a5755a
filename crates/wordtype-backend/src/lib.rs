//! Backend runtime entry point and public API surface.
//!
//! This crate owns the persistence worker: it selects the storage backend,
//! restores the application state on request, and writes every dispatched
//! state in the order it was dispatched.

mod app;
mod config;
pub mod persistence;
mod runtime;
mod services;

pub use crate::config::{ConfigError, load_config, load_config_from};
pub use crate::runtime::{build_adapter, run, run_with_config};
