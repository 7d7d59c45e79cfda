use image::RgbaImage;
use mailwatch_bridge::{
    config::IconsConfig,
    log::LogLevel,
    presentation::{ComposedIcon, Orientation, PanelGeometry},
};

use crate::{compose, compute_isize, loader, theme::IconTheme};

/// Identifies the inputs an [`IconSet`] was loaded for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IconSetKey {
    isize: u32,
    orientation: Orientation,
    normal_icon: String,
    new_mail_icon: String,
}

const LEVEL_COUNT: usize = LogLevel::ALL.len();

/// Decoded and scaled pixmaps for one panel size.
#[derive(Debug)]
struct IconSet {
    normal: Option<RgbaImage>,
    new_mail: Option<RgbaImage>,
    badges: [Option<RgbaImage>; LEVEL_COUNT],
}

impl IconSet {
    fn load(theme: &dyn IconTheme, key: &IconSetKey) -> Self {
        let load_base = |name: &str| {
            loader::load_base_icon(theme, name, key.isize, key.orientation)
                .inspect_err(|err| log::warn!("Could not load icon {name:?}: {err}"))
                .ok()
        };
        let normal = load_base(&key.normal_icon);
        let new_mail = load_base(&key.new_mail_icon);

        // badges are sized from the smallest dimension of the smaller base
        // icon so they never dominate it
        let smallest = [normal.as_ref(), new_mail.as_ref()]
            .into_iter()
            .flatten()
            .map(|image| image.width().min(image.height()))
            .min();
        let badges = LogLevel::ALL.map(|level| {
            let dimension = smallest?;
            loader::load_mini_icon(theme, level.icon_name(), dimension)
                .inspect_err(|err| log::warn!("Could not load {level:?} badge: {err}"))
                .ok()
        });

        Self {
            normal,
            new_mail,
            badges,
        }
    }

    fn badge(&self, level: LogLevel) -> Option<&RgbaImage> {
        self.badges[level as usize].as_ref()
    }
}

/// Composes the applet icon from the current state.
///
/// Loaded pixmaps are cached per panel size, orientation and icon names,
/// so a state change only costs a composite. Call
/// [`IconComposer::invalidate`] when the files behind the names may have
/// changed.
pub struct IconComposer {
    theme: Box<dyn IconTheme>,
    cache: Option<(IconSetKey, IconSet)>,
}

impl IconComposer {
    pub fn new(theme: impl IconTheme + 'static) -> Self {
        Self {
            theme: Box::new(theme),
            cache: None,
        }
    }

    /// Replaces the icon theme and drops every cached pixmap.
    pub fn set_theme(&mut self, theme: impl IconTheme + 'static) {
        self.theme = Box::new(theme);
        self.invalidate();
    }

    /// Drops every cached pixmap.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Builds the icon for the given state.
    ///
    /// Returns `None` when the base icon for the state cannot be loaded; the
    /// caller is expected to keep its previous image. A badge that cannot be
    /// loaded is simply left out.
    pub fn compose_icon(
        &mut self,
        geometry: &PanelGeometry,
        icons: &IconsConfig,
        mail_present: bool,
        badge: Option<LogLevel>,
    ) -> Option<ComposedIcon> {
        let row_size = geometry.row_size();
        let isize = compute_isize(row_size, geometry.padding.thickness());
        let key = IconSetKey {
            isize,
            orientation: geometry.orientation,
            normal_icon: icons.normal_icon().to_string(),
            new_mail_icon: icons.new_mail_icon().to_string(),
        };

        let cached = matches!(&self.cache, Some((cached_key, _)) if *cached_key == key);
        if !cached {
            log::debug!("Loading icons for {key:?}");
            let set = IconSet::load(self.theme.as_ref(), &key);
            self.cache = Some((key, set));
        }
        let (_, set) = self.cache.as_ref()?;

        let base = if mail_present {
            set.new_mail.as_ref()
        } else {
            set.normal.as_ref()
        };
        let base = base?;
        let image = compose(base, badge.and_then(|level| set.badge(level)));

        let extra = i64::from(row_size) - i64::from(isize);
        let request = |dimension: u32| {
            u32::try_from((i64::from(dimension) + extra).max(0)).unwrap_or(u32::MAX)
        };
        let size_request = (request(image.width()), request(image.height()));

        Some(ComposedIcon {
            image,
            size_request,
        })
    }
}
