//! Icon composition for the mail notification applet.
//!
//! This crate turns the applet's state into a single flattened bitmap. It
//! focuses on:
//! - Snapping the space the panel allots to one of a few canonical icon
//!   sizes, so themed raster icons are drawn crisp instead of interpolated.
//! - Resolving icons by theme name or absolute path and scaling them while
//!   preserving their aspect ratio.
//! - Compositing a severity badge onto the bottom-left corner of the base
//!   icon.
//!
//! # Failure handling
//! A missing or undecodable icon never propagates past [`IconComposer`]: the
//! composer logs the problem and yields no image, and the caller keeps
//! whatever it displayed before.

pub mod compose;
pub mod composer;
pub mod loader;
pub mod theme;

pub use compose::compose;
pub use composer::IconComposer;
pub use theme::{FilesystemTheme, IconTheme};

use mailwatch_bridge::log::LogLevel;

/// Margin, in pixels, kept between the icon and the button border.
pub const ICON_MARGIN: u32 = 2;
/// Largest available size that still maps to [`SMALL_ICON_SIZE`].
pub const SMALL_ICON_MAX: u32 = 21;
/// Largest available size that still maps to [`MEDIUM_ICON_SIZE`].
pub const MEDIUM_ICON_MAX: u32 = 29;
/// Largest available size that still maps to [`LARGE_ICON_SIZE`].
pub const LARGE_ICON_MAX: u32 = 40;
pub const SMALL_ICON_SIZE: u32 = 16;
pub const MEDIUM_ICON_SIZE: u32 = 24;
pub const LARGE_ICON_SIZE: u32 = 32;

/// Errors that can occur while resolving or decoding an icon.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// The themed name could not be resolved to a file.
    #[error("icon {0:?} not found in the icon theme")]
    NotFound(String),
    /// The icon file could not be opened.
    #[error("failed to read icon: {0}")]
    IoError(#[from] std::io::Error),
    /// The icon file is not a supported image.
    #[error("failed to decode icon: {0}")]
    DecodeError(#[from] image::ImageError),
    /// Scaling was requested to a zero-sized target.
    #[error("icon target size is zero")]
    ZeroSize,
}

/// Maps the space the panel allots to the applet to an icon size.
///
/// `padding` and a [`ICON_MARGIN`] are subtracted from `available` first.
/// Small results snap to 16, 24 or 32 pixels; anything above
/// [`LARGE_ICON_MAX`] passes through unchanged. Because of the margin a
/// 60 pixel panel yields 58; [`step_icon_size`] is the stepping alone.
pub fn compute_isize(available: u32, padding: u32) -> u32 {
    step_icon_size(available.saturating_sub(ICON_MARGIN + padding))
}

/// Snaps an icon size that already excludes padding and margin.
pub fn step_icon_size(size: u32) -> u32 {
    match size {
        0..=SMALL_ICON_MAX => SMALL_ICON_SIZE,
        22..=MEDIUM_ICON_MAX => MEDIUM_ICON_SIZE,
        30..=LARGE_ICON_MAX => LARGE_ICON_SIZE,
        _ => size,
    }
}

/// Picks the badge to draw for the highest unacknowledged severity.
///
/// Any logged entry produces a badge, Info included; only "nothing logged"
/// (`None`) or disabled badges yield no badge.
pub fn select_badge(max_severity: Option<LogLevel>, badges_enabled: bool) -> Option<LogLevel> {
    if badges_enabled { max_severity } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_snap_to_canonical_steps() {
        assert_eq!(compute_isize(20, 0), 16);
        assert_eq!(compute_isize(28, 0), 24);
        assert_eq!(compute_isize(35, 0), 32);
        assert_eq!(compute_isize(60, 0), 58);
    }

    #[test]
    fn large_sizes_pass_through() {
        assert_eq!(step_icon_size(20), 16);
        assert_eq!(step_icon_size(28), 24);
        assert_eq!(step_icon_size(35), 32);
        assert_eq!(step_icon_size(60), 60);
    }

    #[test]
    fn step_boundaries() {
        // available - 2 lands exactly on each threshold
        assert_eq!(compute_isize(23, 0), 16);
        assert_eq!(compute_isize(24, 0), 24);
        assert_eq!(compute_isize(31, 0), 24);
        assert_eq!(compute_isize(32, 0), 32);
        assert_eq!(compute_isize(42, 0), 32);
        assert_eq!(compute_isize(43, 0), 41);
    }

    #[test]
    fn padding_is_subtracted_and_saturates() {
        assert_eq!(compute_isize(36, 6), 24);
        assert_eq!(compute_isize(3, 10), 16);
    }

    #[test]
    fn badge_requires_flag_and_severity() {
        assert_eq!(select_badge(None, true), None);
        assert_eq!(select_badge(Some(LogLevel::Error), false), None);
        assert_eq!(select_badge(Some(LogLevel::Info), true), Some(LogLevel::Info));
        assert_eq!(
            select_badge(Some(LogLevel::Warning), true),
            Some(LogLevel::Warning)
        );
    }
}
