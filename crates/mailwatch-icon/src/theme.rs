//! Icon theme lookup.
//!
//! Resolves themed icon names to raster files following the freedesktop
//! directory layout (`<base>/<theme>/<N>x<N>/<context>/<name>.png`).

use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// Theme that is always searched after the configured one.
pub const FALLBACK_THEME: &str = "hicolor";

/// Resolves icon names to files.
pub trait IconTheme: Send + Sync {
    /// Returns the file that best matches `name` at `size` pixels.
    fn lookup(&self, name: &str, size: u32) -> Option<PathBuf>;
}

impl<T: IconTheme + ?Sized> IconTheme for Box<T> {
    fn lookup(&self, name: &str, size: u32) -> Option<PathBuf> {
        (**self).lookup(name, size)
    }
}

/// Icon theme backed by directories on the local filesystem.
#[derive(Debug, Clone)]
pub struct FilesystemTheme {
    base_dirs: Vec<PathBuf>,
    themes: Vec<String>,
}

impl FilesystemTheme {
    /// Creates a theme searching `base_dirs` in order, trying `theme` before
    /// [`FALLBACK_THEME`].
    pub fn new(base_dirs: Vec<PathBuf>, theme: Option<&str>) -> Self {
        let mut themes = Vec::with_capacity(2);
        if let Some(theme) = theme.filter(|theme| *theme != FALLBACK_THEME) {
            themes.push(theme.to_string());
        }
        themes.push(FALLBACK_THEME.to_string());
        Self { base_dirs, themes }
    }

    /// Creates a theme searching the user's and the system's XDG data
    /// directories, then `/usr/share/pixmaps`.
    pub fn system(theme: Option<&str>) -> Self {
        let mut base_dirs = Vec::new();
        if let Some(dirs) = BaseDirs::new() {
            base_dirs.push(dirs.data_dir().join("icons"));
        }

        let data_dirs = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
        base_dirs.extend(
            data_dirs
                .split(':')
                .filter(|dir| !dir.is_empty())
                .map(|dir| Path::new(dir).join("icons")),
        );
        base_dirs.push(PathBuf::from("/usr/share/pixmaps"));

        Self::new(base_dirs, theme)
    }

    /// Collects every sized raster candidate for `name` inside one theme
    /// directory.
    fn sized_candidates(theme_dir: &Path, name: &str) -> Vec<(u32, PathBuf)> {
        let file_name = format!("{name}.png");
        let Ok(size_dirs) = std::fs::read_dir(theme_dir) else {
            return Vec::new();
        };

        let mut candidates = Vec::new();
        for size_dir in size_dirs.flatten() {
            let Some(size) = parse_size_dir(&size_dir.file_name().to_string_lossy()) else {
                continue;
            };
            let Ok(contexts) = std::fs::read_dir(size_dir.path()) else {
                continue;
            };
            for context in contexts.flatten() {
                let path = context.path().join(&file_name);
                if path.is_file() {
                    candidates.push((size, path));
                }
            }
        }

        candidates
    }
}

impl IconTheme for FilesystemTheme {
    fn lookup(&self, name: &str, size: u32) -> Option<PathBuf> {
        for theme in &self.themes {
            for base in &self.base_dirs {
                let candidates = Self::sized_candidates(&base.join(theme), name);
                if let Some(path) = best_match(candidates, size) {
                    log::trace!("Resolved icon {name:?} at {size}px to {path:?}");
                    return Some(path);
                }
            }
        }

        self.base_dirs
            .iter()
            .map(|base| base.join(format!("{name}.png")))
            .find(|path| path.is_file())
    }
}

/// Parses a `NxN` size directory name.
fn parse_size_dir(name: &str) -> Option<u32> {
    let (width, height) = name.split_once('x')?;
    let width: u32 = width.parse().ok()?;
    let height: u32 = height.parse().ok()?;
    (width == height).then_some(width)
}

/// Picks the exact size, then the smallest larger size, then the largest
/// smaller one.
fn best_match(mut candidates: Vec<(u32, PathBuf)>, size: u32) -> Option<PathBuf> {
    candidates.sort_by_key(|(candidate, _)| *candidate);
    let larger = candidates.iter().position(|(candidate, _)| *candidate >= size);
    let index = match larger {
        Some(index) => index,
        None => candidates.len().checked_sub(1)?,
    };
    Some(candidates.swap_remove(index).1)
}
