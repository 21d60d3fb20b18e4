//! Follow the focused X11 application and print what its indicator does
//!
//! Usage: cargo run --example xorg_indicator [-- --current-workspace]

use std::sync::Arc;
use std::time::Duration;

use ferrous_indicator::{
    AppIconIndicator, BacklightStyle, FocusTracker, IndicatorConfig, IndicatorStyle,
    PaletteCache, StyleSink,
    platform::{WorkspaceIsolation, XorgSession},
};

/// Prints every styling request instead of applying it.
struct PrintingSink {
    app_id: String,
}

impl StyleSink for PrintingSink {
    fn set_style(&mut self, style: &BacklightStyle) {
        println!("[{}] glow: {}", self.app_id, style);
    }

    fn clear_style(&mut self) {
        println!("[{}] glow cleared", self.app_id);
    }

    fn queue_redraw(&mut self) {}

    fn set_default_dot_visible(&mut self, visible: bool) {
        println!("[{}] default dot visible: {}", self.app_id, visible);
    }

    fn set_default_dot_suppressed(&mut self, suppressed: bool) {
        println!("[{}] default dot suppressed: {}", self.app_id, suppressed);
    }

    fn set_glossy_overlay(&mut self, enabled: bool) {
        println!("[{}] glossy overlay: {}", self.app_id, enabled);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let isolation = if std::env::args().any(|a| a == "--current-workspace") {
        WorkspaceIsolation::CurrentWorkspace
    } else {
        WorkspaceIsolation::AllWorkspaces
    };

    let session = Arc::new(XorgSession::connect()?);
    let config = IndicatorConfig::new().with_style(IndicatorStyle::GlossyBacklit);
    let cache = PaletteCache::shared_with(&config.backlight)?;

    println!("Switch between applications; press Ctrl+C to quit.");

    let mut current: Option<AppIconIndicator<PrintingSink>> = None;
    loop {
        if let Some(app_id) = session.focused_app() {
            let changed = current
                .as_ref()
                .is_none_or(|indicator| indicator.state().app_id() != app_id);
            if changed {
                // Dropping the previous indicator releases its glow.
                let sink = PrintingSink {
                    app_id: app_id.clone(),
                };
                current = Some(AppIconIndicator::from_config(
                    app_id.as_str(),
                    &config,
                    sink,
                    cache.clone(),
                    session.clone(),
                ));
            }

            if let Some(indicator) = current.as_mut() {
                let app = session.app(&app_id, isolation);
                indicator.refresh(&app, session.as_ref(), &app);
            }
        }

        std::thread::sleep(Duration::from_millis(500));
    }
}
