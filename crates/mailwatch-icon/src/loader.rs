use std::path::{Path, PathBuf};

use image::{ImageReader, RgbaImage, imageops::FilterType};
use mailwatch_bridge::presentation::Orientation;

use crate::{IconError, theme::IconTheme};

/// Size at which badge mini-icons are looked up before being scaled down.
const MINI_ICON_LOOKUP_SIZE: u32 = 48;

/// Resolves an icon identifier to a file. Absolute paths are used as-is;
/// anything else is looked up in `theme`.
pub fn resolve(theme: &dyn IconTheme, name: &str, size: u32) -> Result<PathBuf, IconError> {
    let path = Path::new(name);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    theme
        .lookup(name, size)
        .ok_or_else(|| IconError::NotFound(name.to_string()))
}

/// Decodes an image file into RGBA pixels.
pub fn decode(path: &Path) -> Result<RgbaImage, IconError> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image.into_rgba8())
}

/// Scales `image` so that its constrained dimension equals `target`,
/// preserving the aspect ratio. Horizontal panels constrain the height,
/// vertical panels the width.
pub fn scale_to_fit(
    image: RgbaImage,
    target: u32,
    orientation: Orientation,
) -> Result<RgbaImage, IconError> {
    let (width, height) = image.dimensions();
    if target == 0 || width == 0 || height == 0 {
        return Err(IconError::ZeroSize);
    }

    let (new_width, new_height) = match orientation {
        Orientation::Horizontal => (scale_dimension(width, target, height), target),
        Orientation::Vertical => (target, scale_dimension(height, target, width)),
    };

    if (new_width, new_height) == (width, height) {
        return Ok(image);
    }
    Ok(image::imageops::resize(
        &image,
        new_width,
        new_height,
        FilterType::Triangle,
    ))
}

/// `value * numerator / denominator`, rounded, never below one pixel.
fn scale_dimension(value: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (u64::from(value) * u64::from(numerator) + u64::from(denominator) / 2)
        / u64::from(denominator);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

/// Loads a base icon by theme name or absolute path, scaled to `target`.
pub fn load_base_icon(
    theme: &dyn IconTheme,
    name: &str,
    target: u32,
    orientation: Orientation,
) -> Result<RgbaImage, IconError> {
    let path = resolve(theme, name, target)?;
    let image = decode(&path)?;
    scale_to_fit(image, target, orientation)
}

/// Loads a badge mini-icon as a square half the size of `base_dimension`.
pub fn load_mini_icon(
    theme: &dyn IconTheme,
    name: &str,
    base_dimension: u32,
) -> Result<RgbaImage, IconError> {
    let side = base_dimension / 2;
    if side == 0 {
        return Err(IconError::ZeroSize);
    }

    let path = resolve(theme, name, MINI_ICON_LOOKUP_SIZE)?;
    let image = decode(&path)?;
    if image.width() == side {
        return Ok(image);
    }
    Ok(image::imageops::resize(&image, side, side, FilterType::Triangle))
}
