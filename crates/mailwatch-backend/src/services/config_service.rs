use mailwatch_bridge::{MessageFromController, config::Config};
use mailwatch_icon::FilesystemTheme;

/// Handles an incoming configuration request (see
/// [`mailwatch_bridge::MessageToController::ConfigurationRequest`]).
pub async fn handle_config_request(context: super::AppContextHandle) {
    let config = {
        let state = context.state.read().await;
        state.controller.config().clone()
    };
    context
        .send(MessageFromController::ConfigurationResponse(config))
        .await;
}

/// Applies an updated configuration and persists it.
pub async fn handle_config_update(context: super::AppContextHandle, config: Config) {
    let (theme_changed, config_path) = {
        let state = context.state.read().await;
        (
            state.controller.config().icons.theme != config.icons.theme,
            state.config_path.clone(),
        )
    };

    if let Some(config_path) = config_path {
        // keep going on failure, the in-memory config is still applied
        if let Err(err) = crate::config::save_config(&config, &config_path).await {
            log::error!("Could not save configuration to {config_path:?}: {err}");
        }
    }

    context
        .update(|controller| {
            if theme_changed {
                let theme = FilesystemTheme::system(config.icons.theme.as_deref());
                controller.set_icon_theme(theme);
            }
            controller.apply_config(config)
        })
        .await;
}
