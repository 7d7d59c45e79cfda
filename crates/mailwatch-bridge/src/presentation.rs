use image::RgbaImage;

/// Orientation of the panel hosting the applet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Panel runs left to right; icons are constrained by height.
    #[default]
    Horizontal,
    /// Panel runs top to bottom; icons are constrained by width.
    Vertical,
}

/// Padding of the button that hosts the icon, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Padding {
    /// Sum of the left and right padding.
    pub horizontal: u32,
    /// Sum of the top and bottom padding.
    pub vertical: u32,
}

impl Padding {
    /// The thickness subtracted from the available space.
    pub fn thickness(&self) -> u32 {
        self.horizontal.max(self.vertical)
    }
}

/// Space the panel allots to the applet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelGeometry {
    /// Panel size in pixels across all rows.
    pub size: u32,
    /// Number of rows the panel is divided into; the applet uses one.
    pub rows: u32,
    pub orientation: Orientation,
    pub padding: Padding,
}

impl PanelGeometry {
    /// Size available to a single row.
    pub fn row_size(&self) -> u32 {
        self.size / self.rows.max(1)
    }
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            size: 24,
            rows: 1,
            orientation: Orientation::Horizontal,
            padding: Padding::default(),
        }
    }
}

/// Mouse buttons the presentation layer reports clicks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
}

/// Tooltip text for the applet button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tooltip {
    /// Plain text.
    Plain(String),
    /// Pango-style markup.
    Markup(String),
}

impl Tooltip {
    /// Raw text of the tooltip, markup included.
    pub fn text(&self) -> &str {
        match self {
            Tooltip::Plain(text) | Tooltip::Markup(text) => text,
        }
    }
}

/// A flattened icon ready to be drawn by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedIcon {
    /// Base icon with the severity badge, if any, composited on top.
    pub image: RgbaImage,
    /// Size the button hosting the image should request, as
    /// `(width, height)`.
    pub size_request: (u32, u32),
}

impl ComposedIcon {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
