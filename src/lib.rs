//! Running/focus indicators for dock application icons, with a glow in the
//! dominant color of each application's icon.
pub mod cache;
pub mod color;
pub mod config;
mod error;
pub mod host;
pub mod icon_loader;
pub mod indicator;
pub mod palette;
pub mod pixels;

#[cfg(target_os = "linux")]
#[path = "linux/mod.rs"]
pub mod platform;

pub use cache::{PaletteCache, SharedPaletteCache};
pub use color::{Color, Rgb};
pub use config::{BacklightConfig, IndicatorConfig, IndicatorStyle, MemorySettings};
pub use error::{IndicatorError, IndicatorResult};
pub use host::{
    AppRuntimeState, AppState, DotCanvas, FocusTracker, IconBitmapLoader, SettingsSource,
    StyleSink, WindowId, WindowInfoSource,
};
pub use icon_loader::FileIconLoader;
pub use indicator::{
    AppIconIndicator, BacklightController, BacklightPhase, BacklightStyle, IndicatorState,
    PaletteResolver,
};
pub use palette::Palette;
pub use pixels::PixelBuffer;
