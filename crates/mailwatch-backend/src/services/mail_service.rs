use mailwatch_bridge::presentation::MouseButton;

/// Handles a change of the new message count reported by the engine (see
/// [`mailwatch_bridge::MessageToController::NewMessageCountChanged`]).
pub async fn handle_new_message_count(context: super::AppContextHandle, count: u32) {
    log::debug!("New message count is {count}");
    context
        .update(|controller| controller.on_new_message_count_changed(count))
        .await;
}

/// Handles a click on the applet button.
pub async fn handle_click(context: super::AppContextHandle, button: MouseButton) {
    context
        .update(|controller| controller.on_click(button))
        .await;
}

/// Handles a request for an immediate mail check.
pub async fn handle_force_update(context: super::AppContextHandle) {
    let state = context.state.read().await;
    state.controller.on_force_update();
}
