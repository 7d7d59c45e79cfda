use image::RgbaImage;

/// Flattens `badge` onto a copy of `base`.
///
/// The badge keeps its own size and is alpha-blended at full opacity into
/// the bottom-left corner of the base. Parts of a badge larger than the base
/// are clipped. Without a badge the base is returned unchanged.
pub fn compose(base: &RgbaImage, badge: Option<&RgbaImage>) -> RgbaImage {
    let mut composed = base.clone();
    if let Some(badge) = badge {
        let y = i64::from(base.height()) - i64::from(badge.height());
        image::imageops::overlay(&mut composed, badge, 0, y);
    }
    composed
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const BASE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const BADGE: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn without_badge_the_base_is_unchanged() {
        let base = RgbaImage::from_pixel(8, 8, BASE);
        assert_eq!(compose(&base, None), base);
    }

    #[test]
    fn badge_lands_in_the_bottom_left_corner() {
        let base = RgbaImage::from_pixel(8, 8, BASE);
        let badge = RgbaImage::from_pixel(4, 4, BADGE);
        let composed = compose(&base, Some(&badge));

        assert_eq!(composed.dimensions(), (8, 8));
        assert_eq!(*composed.get_pixel(0, 7), BADGE);
        assert_eq!(*composed.get_pixel(3, 4), BADGE);
        assert_eq!(*composed.get_pixel(4, 7), BASE);
        assert_eq!(*composed.get_pixel(0, 3), BASE);
        assert_eq!(*composed.get_pixel(7, 0), BASE);
    }

    #[test]
    fn transparent_badge_pixels_keep_the_base() {
        let base = RgbaImage::from_pixel(4, 4, BASE);
        let mut badge = RgbaImage::from_pixel(2, 2, BADGE);
        badge.put_pixel(0, 1, Rgba([0, 0, 0, 0]));
        let composed = compose(&base, Some(&badge));

        assert_eq!(*composed.get_pixel(0, 3), BASE);
        assert_eq!(*composed.get_pixel(1, 3), BADGE);
    }

    #[test]
    fn oversized_badges_are_clipped() {
        let base = RgbaImage::from_pixel(4, 4, BASE);
        let badge = RgbaImage::from_pixel(6, 6, BADGE);
        let composed = compose(&base, Some(&badge));

        assert_eq!(composed.dimensions(), (4, 4));
        assert_eq!(*composed.get_pixel(3, 0), BADGE);
    }
}
