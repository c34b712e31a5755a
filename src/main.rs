use std::sync::Arc;

use anyhow::Context;
use wordtype_bridge::{BridgeChannels, host::HostEnvironment};
use wordtype_frontend::{formatting::{format_chapter, format_opacity}, sync::ClassList};

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()
        .context("failed to build logger instance")?;

    let channels = BridgeChannels::default();
    let backend = wordtype_backend::run(
        channels.backend_rx,
        channels.backend_tx,
        HostEnvironment::standalone(),
    );
    let container = wordtype_frontend::run(
        channels.frontend_rx,
        channels.frontend_tx,
        Arc::new(ClassList::default()),
    )?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to build tokio runtime")?;
    let state = runtime.block_on(container.ready());
    log::info!(
        "Practicing {} (chapter {}), opacity {}, dark mode {}",
        state.selected_dictionary.name,
        format_chapter(state.selected_chapter),
        format_opacity(state.opacity),
        state.dark_mode,
    );

    drop(container);
    if backend.join().is_err() {
        log::error!("Backend thread panicked");
    }
    Ok(())
}
