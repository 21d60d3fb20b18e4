use std::collections::HashMap;

use crate::host::SettingsSource;

/// Settings key selecting the indicator variant (0, 1 or 2).
pub const KEY_INDICATOR_STYLE: &str = "running-indicator-style";
pub const KEY_DOCK_POSITION: &str = "dock-position";
pub const KEY_APPLY_CUSTOM_THEME: &str = "apply-custom-theme";
pub const KEY_CUSTOM_RUNNING_DOTS: &str = "custom-theme-running-dots";
pub const KEY_CUSTOMIZE_RUNNING_DOTS: &str = "custom-theme-customize-running-dots";
pub const KEY_RUNNING_DOTS_COLOR: &str = "custom-theme-running-dots-color";
pub const KEY_RUNNING_DOTS_BORDER_COLOR: &str = "custom-theme-running-dots-border-color";
pub const KEY_RUNNING_DOTS_BORDER_WIDTH: &str = "custom-theme-running-dots-border-width";

/// Keys whose change must be followed by a repaint of the running dots,
/// see [`crate::AppIconIndicator::on_setting_changed`].
pub const RUNNING_DOTS_KEYS: [&str; 3] = [
    KEY_RUNNING_DOTS_COLOR,
    KEY_RUNNING_DOTS_BORDER_COLOR,
    KEY_RUNNING_DOTS_BORDER_WIDTH,
];

/// Which decoration an application icon gets on top of the shared
/// running/focus state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorStyle {
    /// Only the host's own dot.
    #[default]
    Default,
    /// One custom-drawn dot per window.
    RunningDots,
    /// Running dots plus a glow in the icon's dominant color.
    GlossyBacklit,
}

impl IndicatorStyle {
    /// Map the integer stored in settings; unknown values select `Default`.
    pub fn from_setting(value: i64) -> Self {
        match value {
            1 => IndicatorStyle::RunningDots,
            2 => IndicatorStyle::GlossyBacklit,
            _ => IndicatorStyle::Default,
        }
    }
}

/// Limits for dominant-color extraction and the palette cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklightConfig {
    /// Icon size requested from the loader; bitmaps at least twice this
    /// size are subsampled before scanning.
    /// Default: 64
    pub dominant_color_icon_size: u32,
    /// Maximum number of cached palettes.
    /// Default: 1000
    pub max_cached_items: usize,
    /// How many of the oldest palettes are dropped when the cache is full.
    /// Default: 50
    pub batch_size_to_delete: usize,
}

impl Default for BacklightConfig {
    fn default() -> Self {
        Self {
            dominant_color_icon_size: 64,
            max_cached_items: 1000,
            batch_size_to_delete: 50,
        }
    }
}

impl BacklightConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the icon size used for color extraction
    ///
    /// # Panics
    /// Panics if the size is zero or too large (> 512)
    pub fn with_icon_size(mut self, size: u32) -> Self {
        if size == 0 {
            panic!("Icon size cannot be zero");
        }
        if size > 512 {
            panic!("Icon size cannot be greater than 512 pixels");
        }
        self.dominant_color_icon_size = size;
        self
    }

    /// Set the cache capacity and eviction batch
    ///
    /// # Panics
    /// Panics if either value is zero or the batch exceeds the capacity
    pub fn with_cache_limits(mut self, max_items: usize, batch: usize) -> Self {
        if max_items == 0 {
            panic!("Cache capacity cannot be zero");
        }
        if batch == 0 {
            panic!("Eviction batch cannot be zero");
        }
        if batch > max_items {
            panic!("Eviction batch cannot exceed cache capacity");
        }
        self.max_cached_items = max_items;
        self.batch_size_to_delete = batch;
        self
    }
}

/// Configuration for a dock icon indicator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorConfig {
    /// Default: IndicatorStyle::Default
    pub style: IndicatorStyle,
    /// Default: BacklightConfig::default()
    pub backlight: BacklightConfig,
}

impl IndicatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the indicator style from settings, keeping default limits.
    pub fn from_settings(settings: &dyn SettingsSource) -> Self {
        let style = settings
            .get_int(KEY_INDICATOR_STYLE)
            .map(IndicatorStyle::from_setting)
            .unwrap_or_default();
        Self::new().with_style(style)
    }

    pub fn with_style(mut self, style: IndicatorStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_backlight(mut self, backlight: BacklightConfig) -> Self {
        self.backlight = backlight;
        self
    }
}

/// A value held by [`MemorySettings`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Settings kept in memory, for embedding without a settings backend and
/// for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<String, SettingValue>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K: Into<String>>(&mut self, key: K, value: SettingValue) {
        self.values.insert(key.into(), value);
    }

    pub fn with_bool<K: Into<String>>(mut self, key: K, value: bool) -> Self {
        self.set(key, SettingValue::Bool(value));
        self
    }

    pub fn with_int<K: Into<String>>(mut self, key: K, value: i64) -> Self {
        self.set(key, SettingValue::Int(value));
        self
    }

    pub fn with_string<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.set(key, SettingValue::Str(value.into()));
        self
    }
}

impl SettingsSource for MemorySettings {
    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(SettingValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(SettingValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    fn get_string(&self, key: &str) -> Option<String> {
        match self.values.get(key) {
            Some(SettingValue::Str(s)) => Some(s.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IndicatorConfig::default();
        assert_eq!(config.style, IndicatorStyle::Default);
        assert_eq!(config.backlight.dominant_color_icon_size, 64);
        assert_eq!(config.backlight.max_cached_items, 1000);
        assert_eq!(config.backlight.batch_size_to_delete, 50);
    }

    #[test]
    fn test_style_from_setting() {
        assert_eq!(IndicatorStyle::from_setting(0), IndicatorStyle::Default);
        assert_eq!(IndicatorStyle::from_setting(1), IndicatorStyle::RunningDots);
        assert_eq!(IndicatorStyle::from_setting(2), IndicatorStyle::GlossyBacklit);
        assert_eq!(IndicatorStyle::from_setting(42), IndicatorStyle::Default);
    }

    #[test]
    fn test_from_settings() {
        let settings = MemorySettings::new().with_int(KEY_INDICATOR_STYLE, 2);
        let config = IndicatorConfig::from_settings(&settings);
        assert_eq!(config.style, IndicatorStyle::GlossyBacklit);
    }

    #[test]
    fn test_from_settings_wrong_type_uses_default() {
        let settings = MemorySettings::new().with_string(KEY_INDICATOR_STYLE, "2");
        assert_eq!(
            IndicatorConfig::from_settings(&settings).style,
            IndicatorStyle::Default
        );
    }

    #[test]
    fn test_backlight_builder() {
        let backlight = BacklightConfig::new()
            .with_icon_size(32)
            .with_cache_limits(10, 2);
        assert_eq!(backlight.dominant_color_icon_size, 32);
        assert_eq!(backlight.max_cached_items, 10);
        assert_eq!(backlight.batch_size_to_delete, 2);
    }

    #[test]
    #[should_panic(expected = "Icon size cannot be zero")]
    fn test_zero_icon_size_panics() {
        BacklightConfig::new().with_icon_size(0);
    }

    #[test]
    #[should_panic(expected = "Icon size cannot be greater than 512 pixels")]
    fn test_large_icon_size_panics() {
        BacklightConfig::new().with_icon_size(1024);
    }

    #[test]
    #[should_panic(expected = "Eviction batch cannot exceed cache capacity")]
    fn test_batch_larger_than_capacity_panics() {
        BacklightConfig::new().with_cache_limits(10, 11);
    }

    #[test]
    fn test_memory_settings_types_are_distinct() {
        let settings = MemorySettings::new()
            .with_bool("flag", true)
            .with_int("width", 3)
            .with_string("color", "#fff");
        assert_eq!(settings.get_bool("flag"), Some(true));
        assert_eq!(settings.get_int("flag"), None);
        assert_eq!(settings.get_int("width"), Some(3));
        assert_eq!(settings.get_string("color").as_deref(), Some("#fff"));
        assert_eq!(settings.get_string("missing"), None);
    }
}
