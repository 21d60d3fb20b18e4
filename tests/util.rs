//! Common test utilities for ferrous-indicator integration tests
#![allow(dead_code)]

use ferrous_indicator::{
    AppRuntimeState, AppState, BacklightConfig, BacklightStyle, DotCanvas, FocusTracker,
    IconBitmapLoader, IndicatorError, IndicatorResult, PaletteCache, PaletteResolver, PixelBuffer,
    SharedPaletteCache, StyleSink, WindowId, WindowInfoSource,
    indicator::{Circle, DotsStyle},
};
use std::cell::RefCell;
use std::env;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Icon loader returning a fixed bitmap and counting how often it is asked.
#[derive(Debug, Default)]
pub struct CountingLoader {
    bitmap: Option<PixelBuffer>,
    calls: AtomicUsize,
    sizes: Mutex<Vec<u32>>,
}

impl CountingLoader {
    pub fn with_bitmap(bitmap: PixelBuffer) -> Arc<Self> {
        Arc::new(Self {
            bitmap: Some(bitmap),
            ..Self::default()
        })
    }

    /// A loader for which every icon is missing.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Icon sizes requested so far, in call order.
    pub fn requested_sizes(&self) -> Vec<u32> {
        self.sizes.lock().unwrap().clone()
    }
}

impl IconBitmapLoader for CountingLoader {
    fn load_icon(&self, app_id: &str, size: u32) -> IndicatorResult<PixelBuffer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sizes.lock().unwrap().push(size);
        self.bitmap.clone().ok_or_else(|| IndicatorError::NoBitmap {
            app_id: app_id.to_string(),
            reason: "missing theme entry".to_string(),
        })
    }
}

/// Everything a sink was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    SetStyle(BacklightStyle),
    ClearStyle,
    Redraw,
    DefaultDotVisible(bool),
    DefaultDotSuppressed(bool),
    GlossyOverlay(bool),
}

/// Style sink recording into a log that outlives the indicator.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&SinkEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn clears(&self) -> usize {
        self.count(|e| matches!(e, SinkEvent::ClearStyle))
    }

    pub fn last_style(&self) -> Option<BacklightStyle> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            SinkEvent::SetStyle(style) => Some(*style),
            _ => None,
        })
    }

    pub fn reset(&self) {
        self.events.borrow_mut().clear();
    }
}

impl StyleSink for RecordingSink {
    fn set_style(&mut self, style: &BacklightStyle) {
        self.events.borrow_mut().push(SinkEvent::SetStyle(*style));
    }

    fn clear_style(&mut self) {
        self.events.borrow_mut().push(SinkEvent::ClearStyle);
    }

    fn queue_redraw(&mut self) {
        self.events.borrow_mut().push(SinkEvent::Redraw);
    }

    fn set_default_dot_visible(&mut self, visible: bool) {
        self.events
            .borrow_mut()
            .push(SinkEvent::DefaultDotVisible(visible));
    }

    fn set_default_dot_suppressed(&mut self, suppressed: bool) {
        self.events
            .borrow_mut()
            .push(SinkEvent::DefaultDotSuppressed(suppressed));
    }

    fn set_glossy_overlay(&mut self, enabled: bool) {
        self.events
            .borrow_mut()
            .push(SinkEvent::GlossyOverlay(enabled));
    }
}

/// Canvas keeping the last set of dots it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub draws: Vec<(Vec<Circle>, DotsStyle)>,
}

impl DotCanvas for RecordingCanvas {
    fn draw_dots(&mut self, circles: &[Circle], style: &DotsStyle) {
        self.draws.push((circles.to_vec(), *style));
    }
}

/// Host state for one application, as the dock would report it.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    pub windows: Vec<WindowId>,
    pub focused: Option<String>,
    pub state: AppState,
}

impl FakeHost {
    pub fn running(app_id: &str, windows: usize) -> Self {
        Self {
            windows: (1..=windows as WindowId).collect(),
            focused: Some(app_id.to_string()),
            state: AppState::Running,
        }
    }

    pub fn stopped() -> Self {
        Self::default()
    }
}

impl WindowInfoSource for FakeHost {
    fn interesting_windows(&self) -> Vec<WindowId> {
        self.windows.clone()
    }
}

impl FocusTracker for FakeHost {
    fn focused_app(&self) -> Option<String> {
        self.focused.clone()
    }
}

impl AppRuntimeState for FakeHost {
    fn app_state(&self) -> AppState {
        self.state
    }
}

/// A private cache so tests do not share palettes.
pub fn fresh_cache() -> SharedPaletteCache {
    PaletteCache::with_config(&BacklightConfig::default()).into_shared()
}

pub fn resolver(cache: &SharedPaletteCache, loader: Arc<CountingLoader>) -> PaletteResolver {
    PaletteResolver::new(cache.clone(), loader, &BacklightConfig::default())
}

/// The warm orange icon used across tests; its palette is `#e68250`.
pub fn warm_icon() -> PixelBuffer {
    PixelBuffer::filled(64, 64, [200, 100, 50, 255])
}

/// Check if integration tests should run
///
/// Tests will only run if INTEGRATION_TEST=1 environment variable is set
pub fn should_run_integration_tests() -> bool {
    env::var("INTEGRATION_TEST")
        .map(|v| v == "1")
        .unwrap_or(false)
}
