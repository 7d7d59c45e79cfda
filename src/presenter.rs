//! Headless presentation side: applies controller updates by writing the
//! composed icon to the cache directory and logging everything else.

use std::path::PathBuf;

use directories::ProjectDirs;
use mailwatch_bridge::{
    MessageFromController,
    log::LogEntry,
    presentation::{ComposedIcon, Tooltip},
};
use tokio::sync::mpsc::Receiver;

/// Where composed icons end up.
pub fn icon_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "mailwatch", "mailwatch")
        .map(|dirs| dirs.cache_dir().join("icon.png"))
}

pub struct Presenter {
    icon_path: Option<PathBuf>,
}

impl Presenter {
    pub fn new(icon_path: Option<PathBuf>) -> Self {
        Self { icon_path }
    }

    /// Applies updates until the controller drops its sender.
    pub async fn run(self, mut rx: Receiver<MessageFromController>) {
        while let Some(message) = rx.recv().await {
            match message {
                MessageFromController::IconChanged(icon) => self.show_icon(&icon).await,
                MessageFromController::TooltipChanged(tooltip) => show_tooltip(&tooltip),
                MessageFromController::LogSnapshot(entries) => show_log(&entries),
                MessageFromController::ConfigurationResponse(config) => {
                    log::info!("Current configuration: {config:?}");
                }
            }
        }
        log::debug!("Controller closed the presentation channel");
    }

    async fn show_icon(&self, icon: &ComposedIcon) {
        let (width, height) = icon.size_request;
        log::info!(
            "Icon is now {}x{} (requesting {width}x{height})",
            icon.width(),
            icon.height()
        );

        let Some(path) = &self.icon_path else {
            return;
        };
        if let Some(parent) = path.parent()
            && let Err(err) = tokio::fs::create_dir_all(parent).await
        {
            log::warn!("Could not create {parent:?}: {err}");
            return;
        }
        if let Err(err) = icon.image.save(path) {
            log::warn!("Could not write icon to {path:?}: {err}");
        }
    }
}

fn show_tooltip(tooltip: &Tooltip) {
    let kind = match tooltip {
        Tooltip::Plain(_) => "plain",
        Tooltip::Markup(_) => "markup",
    };
    log::info!("Tooltip ({kind}): {}", tooltip.text());
}

fn show_log(entries: &[LogEntry]) {
    log::info!("Log viewer shows {} entries", entries.len());
    for entry in entries {
        log::info!(
            "  {} {:?} {}",
            entry.display_timestamp(),
            entry.level,
            entry.display_message()
        );
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use mailwatch_bridge::BridgeChannels;

    use super::*;

    #[tokio::test]
    async fn writes_composed_icons_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache/icon.png");
        let channels = BridgeChannels::new(4);

        let icon = ComposedIcon {
            image: RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])),
            size_request: (4, 6),
        };
        channels
            .controller_tx
            .send(MessageFromController::IconChanged(icon))
            .await
            .unwrap();
        drop(channels.controller_tx);

        Presenter::new(Some(path.clone()))
            .run(channels.presentation_rx)
            .await;

        let written = image::open(&path).unwrap().into_rgba8();
        assert_eq!(written.dimensions(), (4, 4));
        assert_eq!(written.get_pixel(0, 0), &Rgba([9, 9, 9, 255]));
    }
}
