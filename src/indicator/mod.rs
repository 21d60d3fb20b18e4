//! Indicators attached to dock application icons.
//!
//! Every indicator owns the shared window/focus/running state of its icon;
//! the configured variant decides what is drawn on top of it.
mod backlight;
mod dots;
mod state;

pub use backlight::{
    BacklightController, BacklightPhase, BacklightStyle, FALLBACK_DOT_COLORS,
    GLOSSY_OVERLAY_IMAGE, PaletteResolver, glossy_overlay_style,
};
pub use dots::{Circle, DotTheme, DotsStyle, Side, layout_dots};
pub use state::{IndicatorState, MAX_WINDOWS_CLASSES};

use std::sync::Arc;

use tracing::debug;

use crate::{
    cache::SharedPaletteCache,
    config::{IndicatorConfig, IndicatorStyle, RUNNING_DOTS_KEYS},
    host::{
        AppRuntimeState, AppState, DotCanvas, FocusTracker, IconBitmapLoader, SettingsSource,
        StyleSink, WindowInfoSource,
    },
};

#[derive(Debug)]
enum Decoration {
    Default,
    RunningDots,
    GlossyBacklit(BacklightController),
}

/// The indicator of one dock icon, bound to that icon's styling surface.
///
/// Dropping the indicator releases everything it applied to the surface.
#[derive(Debug)]
pub struct AppIconIndicator<S: StyleSink> {
    state: IndicatorState,
    decoration: Decoration,
    sink: S,
    destroyed: bool,
}

impl<S: StyleSink> AppIconIndicator<S> {
    /// Only toggles the host's default dot.
    pub fn plain<A: Into<String>>(app_id: A, sink: S) -> Self {
        Self::attach(app_id.into(), Decoration::Default, sink)
    }

    /// Draws one dot per window in place of the host's default dot.
    pub fn running_dots<A: Into<String>>(app_id: A, sink: S) -> Self {
        Self::attach(app_id.into(), Decoration::RunningDots, sink)
    }

    /// Running dots plus a glow in the icon's dominant color.
    pub fn glossy_backlit<A: Into<String>>(
        app_id: A,
        sink: S,
        resolver: PaletteResolver,
    ) -> Self {
        let controller = BacklightController::new(resolver);
        Self::attach(app_id.into(), Decoration::GlossyBacklit(controller), sink)
    }

    /// Build the variant selected by `config.style`.
    ///
    /// Glossy backlit indicators extract colors at
    /// `config.backlight.dominant_color_icon_size`. The cache keeps its own
    /// limits; pass [`crate::PaletteCache::shared_with`] to apply
    /// `config.backlight` to the process-wide one.
    pub fn from_config<A: Into<String>>(
        app_id: A,
        config: &IndicatorConfig,
        sink: S,
        cache: SharedPaletteCache,
        loader: Arc<dyn IconBitmapLoader>,
    ) -> Self {
        match config.style {
            IndicatorStyle::Default => Self::plain(app_id, sink),
            IndicatorStyle::RunningDots => Self::running_dots(app_id, sink),
            IndicatorStyle::GlossyBacklit => {
                let resolver = PaletteResolver::new(cache, loader, &config.backlight);
                Self::glossy_backlit(app_id, sink, resolver)
            }
        }
    }

    fn attach(app_id: String, decoration: Decoration, mut sink: S) -> Self {
        if !matches!(decoration, Decoration::Default) {
            sink.set_default_dot_suppressed(true);
        }
        if matches!(decoration, Decoration::GlossyBacklit(_)) {
            sink.set_glossy_overlay(true);
        }
        debug!(app_id = %app_id, style = ?decoration_style(&decoration), "Attached indicator");

        Self {
            state: IndicatorState::new(app_id),
            decoration,
            sink,
            destroyed: false,
        }
    }

    /// Recompute the state from the pre-filtered window list, the focused
    /// application and the application's lifecycle state, then restyle.
    pub fn update<W>(&mut self, windows: &[W], focused_app: Option<&str>, app_state: AppState) {
        if self.destroyed {
            return;
        }

        self.state.update(windows, focused_app, app_state);
        self.sink.set_default_dot_visible(self.state.is_running());

        match &mut self.decoration {
            Decoration::Default => {}
            Decoration::RunningDots => self.sink.queue_redraw(),
            Decoration::GlossyBacklit(controller) => {
                self.sink.queue_redraw();
                controller.on_update(&self.state, &mut self.sink);
            }
        }
    }

    /// [`AppIconIndicator::update`] with inputs gathered from the host.
    pub fn refresh(
        &mut self,
        windows: &dyn WindowInfoSource,
        focus: &dyn FocusTracker,
        runtime: &dyn AppRuntimeState,
    ) {
        let window_list = windows.interesting_windows();
        let focused_app = focus.focused_app();
        self.update(&window_list, focused_app.as_deref(), runtime.app_state());
    }

    /// React to a change of the settings key `key`.
    ///
    /// Dots are repainted when one of [`RUNNING_DOTS_KEYS`] changes; returns
    /// whether a repaint was requested.
    pub fn on_setting_changed(&mut self, key: &str) -> bool {
        if self.destroyed
            || matches!(self.decoration, Decoration::Default)
            || !RUNNING_DOTS_KEYS.contains(&key)
        {
            return false;
        }

        debug!(app_id = self.state.app_id(), key, "Dot settings changed");
        self.sink.queue_redraw();
        true
    }

    /// Style of the dots for a surface `surface_width` wide, or `None` for
    /// the default variant which draws no dots of its own.
    pub fn dots_style(
        &self,
        surface_width: f64,
        theme: &DotTheme,
        settings: &dyn SettingsSource,
    ) -> Option<DotsStyle> {
        match &self.decoration {
            Decoration::Default => None,
            Decoration::RunningDots => Some(DotsStyle::resolve(surface_width, theme, settings)),
            Decoration::GlossyBacklit(controller) => {
                let (border, body) = controller.dot_colors(self.state.app_id());
                Some(DotsStyle::resolve(surface_width, theme, settings).glossy(border, body))
            }
        }
    }

    /// Draw one dot per counted window on a `width` x `height` surface.
    pub fn repaint(
        &self,
        canvas: &mut dyn DotCanvas,
        width: f64,
        height: f64,
        theme: &DotTheme,
        settings: &dyn SettingsSource,
    ) {
        if self.destroyed {
            return;
        }

        let Some(style) = self.dots_style(width, theme, settings) else {
            return;
        };
        let side = Side::from_settings(settings);
        let circles = layout_dots(side, width, height, self.state.window_count(), &style);
        canvas.draw_dots(&circles, &style);
    }

    /// The glow currently applied to the icon, if any.
    pub fn style_contribution(&self) -> Option<&BacklightStyle> {
        match &self.decoration {
            Decoration::GlossyBacklit(controller) => controller.applied_style(),
            _ => None,
        }
    }

    pub fn state(&self) -> &IndicatorState {
        &self.state
    }

    pub fn style(&self) -> IndicatorStyle {
        decoration_style(&self.decoration)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Remove the glow and hand the default dot back to the host.
    ///
    /// Later calls, and updates after it, do nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        match &mut self.decoration {
            Decoration::Default => {}
            Decoration::RunningDots => self.sink.set_default_dot_suppressed(false),
            Decoration::GlossyBacklit(controller) => {
                controller.release(&mut self.sink);
                self.sink.set_glossy_overlay(false);
                self.sink.set_default_dot_suppressed(false);
            }
        }
        debug!(app_id = self.state.app_id(), "Destroyed indicator");
    }
}

impl<S: StyleSink> Drop for AppIconIndicator<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn decoration_style(decoration: &Decoration) -> IndicatorStyle {
    match decoration {
        Decoration::Default => IndicatorStyle::Default,
        Decoration::RunningDots => IndicatorStyle::RunningDots,
        Decoration::GlossyBacklit(_) => IndicatorStyle::GlossyBacklit,
    }
}
