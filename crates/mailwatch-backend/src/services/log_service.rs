use mailwatch_bridge::{MessageFromController, log::LogEntry};

/// Handles a log entry emitted by the engine (see
/// [`mailwatch_bridge::MessageToController::LogMessage`]).
pub async fn handle_log_message(context: super::AppContextHandle, entry: LogEntry) {
    context
        .update(|controller| controller.on_log_message(entry))
        .await;
}

/// Handles an explicit acknowledgment of the logged severity.
pub async fn handle_acknowledge(context: super::AppContextHandle) {
    context.update(|controller| controller.on_acknowledge()).await;
}

/// Handles a request to clear the log scrollback.
pub async fn handle_clear_log(context: super::AppContextHandle) {
    context.update(|controller| controller.on_clear_log()).await;
}

/// Handles the log viewer being opened or re-presented.
pub async fn handle_log_viewer_opened(context: super::AppContextHandle) {
    context
        .update(|controller| controller.on_log_viewer_opened())
        .await;
}

/// Handles the log viewer being closed.
pub async fn handle_log_viewer_closed(context: super::AppContextHandle) {
    context
        .update(|controller| controller.on_log_viewer_closed())
        .await;
}

/// Sends the log scrollback without acknowledging anything.
pub async fn handle_log_snapshot_request(context: super::AppContextHandle) {
    let snapshot = {
        let state = context.state.read().await;
        state.controller.log().snapshot()
    };
    context
        .send(MessageFromController::LogSnapshot(snapshot))
        .await;
}
