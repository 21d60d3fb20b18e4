//! Interfaces to the desktop shell hosting the indicators.
//!
//! Window tracking, focus, icon loading, styling and settings all belong to
//! the host. Indicators only talk to it through these traits.
use crate::{
    IndicatorResult,
    indicator::{BacklightStyle, Circle, DotsStyle},
    pixels::PixelBuffer,
};

/// Opaque window handle as reported by the host.
pub type WindowId = u64;

/// Lifecycle state of an application as tracked by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Stopped,
    Starting,
    Running,
}

/// Windows of one application that count towards its indicator.
///
/// Implementations apply the dock's workspace/monitor isolation policy
/// before returning.
pub trait WindowInfoSource {
    fn interesting_windows(&self) -> Vec<WindowId>;
}

/// The application currently holding keyboard focus.
pub trait FocusTracker {
    fn focused_app(&self) -> Option<String>;
}

pub trait AppRuntimeState {
    fn app_state(&self) -> AppState;
}

/// Produces decoded RGBA icons for palette extraction.
pub trait IconBitmapLoader: Send + Sync {
    /// Load the icon of `app_id` at (approximately) `size` pixels.
    fn load_icon(&self, app_id: &str, size: u32) -> IndicatorResult<PixelBuffer>;
}

/// The styling surface of one dock icon.
pub trait StyleSink {
    /// Replace the icon container style with a glow.
    fn set_style(&mut self, style: &BacklightStyle);
    /// Remove any style previously set.
    fn clear_style(&mut self);
    /// Ask for the custom dots overlay to be repainted.
    fn queue_redraw(&mut self);
    /// Show or hide the host's own running dot.
    fn set_default_dot_visible(&mut self, visible: bool);
    /// Make the host's own dot transparent while custom dots are drawn in
    /// its place.
    fn set_default_dot_suppressed(&mut self, suppressed: bool);
    /// Put the glossy highlight over the icon image, or take it away. See
    /// [`crate::indicator::glossy_overlay_style`] for the declarations.
    fn set_glossy_overlay(&mut self, enabled: bool);
}

/// Typed access to user settings.
pub trait SettingsSource {
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn get_int(&self, key: &str) -> Option<i64>;
    fn get_string(&self, key: &str) -> Option<String>;
}

/// Drawing routine for the per-window dots.
pub trait DotCanvas {
    /// Stroke every circle with the border color, then fill with the body
    /// color.
    fn draw_dots(&mut self, circles: &[Circle], style: &DotsStyle);
}
