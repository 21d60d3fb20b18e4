use core::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::{
    IndicatorResult,
    cache::SharedPaletteCache,
    color::Rgb,
    config::BacklightConfig,
    host::{IconBitmapLoader, StyleSink},
    indicator::state::IndicatorState,
    palette::Palette,
};

const GLOW_BORDER_RADIUS: u32 = 5;
const FALLBACK_GLOW_START: Rgb = Rgb::new(0xe0, 0xe0, 0xe0);
const FALLBACK_GLOW_END: Rgb = Rgb::DARK_GRAY;

/// Border and body colors for the dots of an application without a palette.
pub const FALLBACK_DOT_COLORS: (Rgb, Rgb) = (Rgb::WHITE, Rgb::GRAY);

/// File name of the glossy highlight drawn over backlit icons.
pub const GLOSSY_OVERLAY_IMAGE: &str = "glossy.svg";

/// Style declarations of the glossy highlight, with the image looked up in
/// `media_dir`.
pub fn glossy_overlay_style(media_dir: &Path) -> String {
    format!(
        "background-image: url('{}');background-size: contain;",
        media_dir.join(GLOSSY_OVERLAY_IMAGE).display()
    )
}

/// Vertical gradient painted behind a running application's icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BacklightStyle {
    pub border_radius: u32,
    pub gradient_start: Rgb,
    pub gradient_end: Rgb,
}

impl BacklightStyle {
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            border_radius: GLOW_BORDER_RADIUS,
            gradient_start: palette.original,
            gradient_end: palette.darker,
        }
    }

    /// Neutral glow used when no palette could be extracted.
    pub fn fallback() -> Self {
        Self {
            border_radius: GLOW_BORDER_RADIUS,
            gradient_start: FALLBACK_GLOW_START,
            gradient_end: FALLBACK_GLOW_END,
        }
    }
}

impl fmt::Display for BacklightStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "border-radius: {}px;\
             background-gradient-direction: vertical;\
             background-gradient-start: {};\
             background-gradient-end: {};",
            self.border_radius, self.gradient_start, self.gradient_end
        )
    }
}

/// Finds the palette of an application, from the cache or by extracting it
/// from the application's icon.
#[derive(Clone)]
pub struct PaletteResolver {
    cache: SharedPaletteCache,
    loader: Arc<dyn IconBitmapLoader>,
    icon_size: u32,
}

impl fmt::Debug for PaletteResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaletteResolver")
            .field("icon_size", &self.icon_size)
            .finish_non_exhaustive()
    }
}

impl PaletteResolver {
    pub fn new(
        cache: SharedPaletteCache,
        loader: Arc<dyn IconBitmapLoader>,
        config: &BacklightConfig,
    ) -> Self {
        Self {
            cache,
            loader,
            icon_size: config.dominant_color_icon_size,
        }
    }

    pub fn cache(&self) -> &SharedPaletteCache {
        &self.cache
    }

    /// Load and scan the icon without consulting or filling the cache.
    pub fn compute(&self, app_id: &str) -> IndicatorResult<Palette> {
        let bitmap = self.loader.load_icon(app_id, self.icon_size)?;
        Palette::from_bitmap(&bitmap, self.icon_size)
    }

    /// Cached palette of `app_id`, extracting and storing it on a miss.
    ///
    /// Returns `None` when the icon cannot be loaded or carries no color;
    /// failures are not cached, so the next call tries again.
    pub fn resolve(&self, app_id: &str) -> Option<Palette> {
        match self.try_resolve(app_id) {
            Ok(palette) => Some(palette),
            Err(e) => {
                debug!("No palette for {}: {}", app_id, e);
                None
            }
        }
    }

    fn try_resolve(&self, app_id: &str) -> IndicatorResult<Palette> {
        if let Some(palette) = self.cache.lock()?.get(app_id) {
            return Ok(palette);
        }

        // The lock is not held while loading; concurrent misses may both
        // compute, and store the same palette.
        let palette = self.compute(app_id)?;
        self.cache.lock()?.put(app_id, palette);
        debug!(app_id, original = %palette.original, "Cached palette");
        Ok(palette)
    }

    /// Like [`PaletteResolver::resolve`], with loading and extraction moved to
    /// the blocking thread pool.
    #[cfg(feature = "async")]
    pub async fn resolve_async(&self, app_id: &str) -> Option<Palette> {
        match self.cache.lock() {
            Ok(cache) => {
                if let Some(palette) = cache.get(app_id) {
                    return Some(palette);
                }
            }
            Err(e) => {
                tracing::warn!("Palette cache poisoned: {}", e);
                return None;
            }
        }

        let resolver = self.clone();
        let owned_id = app_id.to_string();
        let computed = tokio::task::spawn_blocking(move || resolver.compute(&owned_id)).await;

        match computed {
            Ok(Ok(palette)) => {
                if let Ok(mut cache) = self.cache.lock() {
                    cache.put(app_id, palette);
                }
                Some(palette)
            }
            Ok(Err(e)) => {
                debug!("No palette for {}: {}", app_id, e);
                None
            }
            Err(e) => {
                tracing::warn!("Palette task failed for {}: {}", app_id, e);
                None
            }
        }
    }
}

/// Whether a glow is currently applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BacklightPhase {
    #[default]
    Plain,
    Glowing,
}

/// Applies or removes the glow of one dock icon as its running flag changes.
#[derive(Debug)]
pub struct BacklightController {
    resolver: PaletteResolver,
    phase: BacklightPhase,
    applied: Option<BacklightStyle>,
}

impl BacklightController {
    pub fn new(resolver: PaletteResolver) -> Self {
        Self {
            resolver,
            phase: BacklightPhase::Plain,
            applied: None,
        }
    }

    /// Glow while the application is running, clear the glow when it stops.
    ///
    /// Every running update re-applies the glow and asks for the dots to be
    /// repainted; the style is cleared once, on the transition to plain.
    pub fn on_update<S: StyleSink + ?Sized>(&mut self, state: &IndicatorState, sink: &mut S) {
        if state.is_running() {
            let style = match self.resolver.resolve(state.app_id()) {
                Some(palette) => BacklightStyle::from_palette(&palette),
                None => BacklightStyle::fallback(),
            };
            sink.set_style(&style);
            sink.queue_redraw();
            self.applied = Some(style);
            self.phase = BacklightPhase::Glowing;
        } else if self.phase == BacklightPhase::Glowing {
            sink.clear_style();
            self.applied = None;
            self.phase = BacklightPhase::Plain;
        }
    }

    /// Border and body colors for the dots: the palette's lighter and
    /// darker variants, or white and gray.
    pub fn dot_colors(&self, app_id: &str) -> (Rgb, Rgb) {
        self.resolver
            .resolve(app_id)
            .map(|palette| (palette.lighter, palette.darker))
            .unwrap_or(FALLBACK_DOT_COLORS)
    }

    /// Remove the glow if one is applied.
    pub fn release<S: StyleSink + ?Sized>(&mut self, sink: &mut S) {
        if self.phase == BacklightPhase::Glowing {
            sink.clear_style();
        }
        self.applied = None;
        self.phase = BacklightPhase::Plain;
    }

    pub fn phase(&self) -> BacklightPhase {
        self.phase
    }

    pub fn applied_style(&self) -> Option<&BacklightStyle> {
        self.applied.as_ref()
    }
}
