use mailwatch_bridge::{MessageFromController, presentation::PanelGeometry};

/// Handles a change of the space the panel allots to the applet.
pub async fn handle_panel_resized(context: super::AppContextHandle, geometry: PanelGeometry) {
    log::debug!("Panel geometry changed to {geometry:?}");
    context
        .update(|controller| controller.on_panel_resized(geometry))
        .await;
}

/// Resends the current tooltip and icon to a presentation layer that
/// attached late.
pub async fn handle_presentation_request(context: super::AppContextHandle) {
    let (icon, tooltip) = {
        let mut state = context.state.write().await;
        state.controller.presentation()
    };
    context
        .send(MessageFromController::TooltipChanged(tooltip))
        .await;
    match icon {
        Some(icon) => context.send(MessageFromController::IconChanged(icon)).await,
        None => log::debug!("No icon available to resend"),
    }
}
