use std::sync::Arc;

use wordtype_bridge::{MessageFromBackend, state::AppState};

/// Handles an incoming state request (see
/// [`wordtype_bridge::MessageToBackend::LoadStateRequest`]).
pub async fn handle_load_state_request(context: super::AppContextHandle) {
    let state = context.adapter.load().await;
    context.send(MessageFromBackend::StateLoaded(state)).await;
}

/// Handles a save request (see
/// [`wordtype_bridge::MessageToBackend::SaveStateRequest`]). Requests are
/// awaited one at a time, so the last write always holds the last state.
pub async fn handle_save_state_request(context: super::AppContextHandle, state: Arc<AppState>) {
    log::debug!("Persisting state through {}", context.adapter.backend().kind());
    context.adapter.save(&state).await;
}
