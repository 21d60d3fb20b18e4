use crate::host::{AppRuntimeState, AppState, FocusTracker, WindowInfoSource};

/// Highest window count an indicator distinguishes.
pub const MAX_WINDOWS_CLASSES: usize = 4;

/// Window count, focus and running flags of one dock icon.
///
/// The window list must already be filtered by the dock's isolation
/// policy, so an application whose windows all live on another workspace
/// or monitor counts as neither running nor focused here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorState {
    app_id: String,
    window_count: usize,
    is_focused: bool,
    is_running: bool,
}

impl IndicatorState {
    pub fn new<S: Into<String>>(app_id: S) -> Self {
        Self {
            app_id: app_id.into(),
            window_count: 0,
            is_focused: false,
            is_running: false,
        }
    }

    pub fn update<W>(&mut self, windows: &[W], focused_app: Option<&str>, app_state: AppState) {
        self.window_count = windows.len().min(MAX_WINDOWS_CLASSES);
        self.is_focused = focused_app == Some(self.app_id.as_str()) && self.window_count > 0;
        self.is_running = app_state != AppState::Stopped && self.window_count > 0;
    }

    /// Gather the inputs of [`IndicatorState::update`] from the host.
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

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn window_count(&self) -> usize {
        self.window_count
    }

    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = "org.gnome.Nautilus.desktop";

    #[test]
    fn test_window_count_is_clamped() {
        let mut state = IndicatorState::new(APP);
        for len in 0..10usize {
            let windows = vec![0u64; len];
            state.update(&windows, None, AppState::Running);
            assert_eq!(state.window_count(), len.min(4));
        }
    }

    #[test]
    fn test_focus_requires_windows() {
        let mut state = IndicatorState::new(APP);
        state.update::<u64>(&[], Some(APP), AppState::Running);
        assert!(!state.is_focused());

        state.update(&[1u64], Some(APP), AppState::Running);
        assert!(state.is_focused());
    }

    #[test]
    fn test_focus_on_other_app() {
        let mut state = IndicatorState::new(APP);
        state.update(&[1u64, 2], Some("firefox.desktop"), AppState::Running);
        assert!(!state.is_focused());
        state.update(&[1u64, 2], None, AppState::Running);
        assert!(!state.is_focused());
    }

    #[test]
    fn test_running_requires_windows() {
        let mut state = IndicatorState::new(APP);
        for app_state in [AppState::Stopped, AppState::Starting, AppState::Running] {
            state.update::<u64>(&[], None, app_state);
            assert!(!state.is_running());
        }
    }

    #[test]
    fn test_stopped_app_is_not_running() {
        let mut state = IndicatorState::new(APP);
        state.update(&[1u64], None, AppState::Stopped);
        assert!(!state.is_running());
        state.update(&[1u64], None, AppState::Starting);
        assert!(state.is_running());
    }
}
