//! Per-window running dots: style resolution and circle layout.
use tracing::warn;

use crate::{
    color::{Color, Rgb},
    config::{
        KEY_APPLY_CUSTOM_THEME, KEY_CUSTOM_RUNNING_DOTS, KEY_CUSTOMIZE_RUNNING_DOTS,
        KEY_DOCK_POSITION, KEY_RUNNING_DOTS_BORDER_COLOR, KEY_RUNNING_DOTS_BORDER_WIDTH,
        KEY_RUNNING_DOTS_COLOR,
    },
    host::SettingsSource,
};

const GLOSSY_DOT_PADDING: f64 = 1.45;
const GLOSSY_DOT_BORDER_WIDTH: f64 = 2.0;

/// Edge of the icon the dots are drawn along; follows the dock position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    Top,
    Right,
    Bottom,
    #[default]
    Left,
}

impl Side {
    /// Read the dock position, either as a name (`"BOTTOM"`) or as its enum
    /// index (top, right, bottom, left).
    pub fn from_settings(settings: &dyn SettingsSource) -> Side {
        if let Some(name) = settings.get_string(KEY_DOCK_POSITION) {
            return match name.to_ascii_uppercase().as_str() {
                "TOP" => Side::Top,
                "RIGHT" => Side::Right,
                "BOTTOM" => Side::Bottom,
                _ => Side::Left,
            };
        }

        match settings.get_int(KEY_DOCK_POSITION) {
            Some(0) => Side::Top,
            Some(1) => Side::Right,
            Some(2) => Side::Bottom,
            _ => Side::Left,
        }
    }
}

/// Style of the host's default dot, reused when the user has not
/// customized the running dots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotTheme {
    pub border_color: Color,
    pub border_width: f64,
    pub body_color: Color,
}

impl Default for DotTheme {
    fn default() -> Self {
        Self {
            border_color: Color::opaque(Rgb::WHITE),
            border_width: 1.0,
            body_color: Color::opaque(Rgb::WHITE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotsStyle {
    pub border_color: Color,
    pub border_width: f64,
    pub body_color: Color,
    pub radius: f64,
    /// Distance between the dots and the icon edge.
    pub padding: f64,
    /// Gap between two consecutive dots.
    pub spacing: f64,
}

impl DotsStyle {
    /// Style of plain running dots for a drawing surface `surface_width`
    /// wide.
    ///
    /// Custom colors and width are used only when the user asked for
    /// customized running dots outside of the built-in custom theme.
    pub fn resolve(surface_width: f64, theme: &DotTheme, settings: &dyn SettingsSource) -> Self {
        let flag = |key: &str| settings.get_bool(key).unwrap_or(false);
        let customized = !flag(KEY_APPLY_CUSTOM_THEME)
            && flag(KEY_CUSTOM_RUNNING_DOTS)
            && flag(KEY_CUSTOMIZE_RUNNING_DOTS);

        let (border_color, border_width, body_color) = if customized {
            (
                custom_color(settings, KEY_RUNNING_DOTS_BORDER_COLOR, theme.border_color),
                settings
                    .get_int(KEY_RUNNING_DOTS_BORDER_WIDTH)
                    .map(|w| w.max(0) as f64)
                    .unwrap_or(theme.border_width),
                custom_color(settings, KEY_RUNNING_DOTS_COLOR, theme.body_color),
            )
        } else {
            (theme.border_color, theme.border_width, theme.body_color)
        };

        // Large enough to leave room for the border stroke.
        let radius = (surface_width / 22.0).max(border_width / 2.0);

        Self {
            border_color,
            border_width,
            body_color,
            radius,
            padding: 0.0,
            spacing: radius + border_width,
        }
    }

    /// The dot style used next to a glow: thicker border, slight inset and
    /// the given palette colors. Radius and spacing are kept.
    pub fn glossy(self, border: Rgb, body: Rgb) -> Self {
        Self {
            border_color: Color::opaque(border),
            border_width: GLOSSY_DOT_BORDER_WIDTH,
            body_color: Color::opaque(body),
            padding: GLOSSY_DOT_PADDING,
            ..self
        }
    }
}

fn custom_color(settings: &dyn SettingsSource, key: &str, fallback: Color) -> Color {
    let Some(value) = settings.get_string(key) else {
        return fallback;
    };

    Color::parse(&value).unwrap_or_else(|e| {
        warn!("Ignoring {}: {}", key, e);
        fallback
    })
}

/// Center and radius of one dot, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Lay out `count` dots centred along `side` of a `width` x `height`
/// surface.
pub fn layout_dots(
    side: Side,
    width: f64,
    height: f64,
    count: usize,
    style: &DotsStyle,
) -> Vec<Circle> {
    let r = style.radius;
    let n = count as f64;
    let run = 2.0 * n * r + (n - 1.0) * style.spacing;
    let inset = r + style.border_width / 2.0;

    (0..count)
        .map(|i| {
            let along = (2 * i + 1) as f64 * r + i as f64 * style.spacing;
            let (x, y) = match side {
                Side::Top => ((width - run) / 2.0 + along, style.padding + inset),
                Side::Bottom => ((width - run) / 2.0 + along, height - style.padding - inset),
                Side::Left => (style.padding + inset, (height - run) / 2.0 + along),
                Side::Right => (width - style.padding - inset, (height - run) / 2.0 + along),
            };
            Circle { x, y, radius: r }
        })
        .collect()
}
