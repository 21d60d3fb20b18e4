//! Icon loading from image files and icon-theme style directories.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{IndicatorError, IndicatorResult, host::IconBitmapLoader, pixels::PixelBuffer};

/// Loads application icons from PNG files.
///
/// An application is resolved through an explicit file registered for its
/// id first, then by icon name inside each search directory, trying
/// `<dir>/<size>x<size>/apps/<name>.png` before `<dir>/<name>.png`.
#[derive(Debug, Clone, Default)]
pub struct FileIconLoader {
    files: HashMap<String, PathBuf>,
    icon_names: HashMap<String, String>,
    search_paths: Vec<PathBuf>,
}

impl FileIconLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `path` as the icon of `app_id`.
    pub fn with_file<A: Into<String>, P: Into<PathBuf>>(mut self, app_id: A, path: P) -> Self {
        self.files.insert(app_id.into(), path.into());
        self
    }

    /// Look `app_id` up under `icon_name` instead of its id minus any
    /// `.desktop` suffix.
    pub fn with_icon_name<A: Into<String>, N: Into<String>>(mut self, app_id: A, name: N) -> Self {
        self.icon_names.insert(app_id.into(), name.into());
        self
    }

    pub fn with_search_path<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.search_paths.push(dir.into());
        self
    }

    fn icon_name<'a>(&'a self, app_id: &'a str) -> &'a str {
        self.icon_names
            .get(app_id)
            .map(String::as_str)
            .unwrap_or_else(|| app_id.strip_suffix(".desktop").unwrap_or(app_id))
    }

    /// First existing file for `app_id` at `size`.
    pub fn find_icon(&self, app_id: &str, size: u32) -> Option<PathBuf> {
        if let Some(path) = self.files.get(app_id) {
            return Some(path.clone());
        }

        let name = format!("{}.png", self.icon_name(app_id));
        let sized = format!("{size}x{size}");
        self.search_paths
            .iter()
            .flat_map(|dir| [dir.join(&sized).join("apps").join(&name), dir.join(&name)])
            .find(|candidate| candidate.is_file())
    }
}

impl IconBitmapLoader for FileIconLoader {
    fn load_icon(&self, app_id: &str, size: u32) -> IndicatorResult<PixelBuffer> {
        let path = self
            .find_icon(app_id, size)
            .ok_or_else(|| IndicatorError::no_bitmap(app_id, "no icon file found"))?;
        debug!("Loading icon for {} from {}", app_id, path.display());
        load_png(&path).map_err(|e| IndicatorError::no_bitmap(app_id, e))
    }
}

/// Decode an image file into RGBA pixels.
pub fn load_png(path: &Path) -> IndicatorResult<PixelBuffer> {
    let image = image::open(path)?;
    Ok(PixelBuffer::from(image.to_rgba8()))
}
