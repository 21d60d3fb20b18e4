//! X11 implementation of the host interfaces, via EWMH properties.
use crate::{
    IndicatorError, IndicatorResult,
    host::{
        AppRuntimeState, AppState, FocusTracker, IconBitmapLoader, WindowId, WindowInfoSource,
    },
    pixels::PixelBuffer,
};
use tracing::info;
use x11rb::{
    connection::Connection,
    protocol::xproto::{AtomEnum, ConnectionExt},
    rust_connection::RustConnection,
};

/// `_NET_WM_DESKTOP` value of windows shown on every desktop.
const ALL_DESKTOPS: u32 = 0xFFFF_FFFF;

/// Which windows count towards an application's indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkspaceIsolation {
    #[default]
    AllWorkspaces,
    CurrentWorkspace,
}

#[derive(Debug, Clone)]
struct X11Atoms {
    net_active_window: u32,
    net_client_list: u32,
    net_current_desktop: u32,
    net_wm_desktop: u32,
    net_wm_icon: u32,
}

/// A connection to the X server used to answer window, focus and icon
/// queries. Applications are identified by the class part of `WM_CLASS`.
pub struct XorgSession {
    conn: RustConnection,
    root: u32,
    atoms: X11Atoms,
}

impl std::fmt::Debug for XorgSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XorgSession")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl XorgSession {
    pub fn connect() -> IndicatorResult<Self> {
        let (conn, screen_num) = connect_to_x11()?;
        let root = conn.setup().roots[screen_num].root;
        let atoms = setup_atoms(&conn)?;
        Ok(Self { conn, root, atoms })
    }

    /// Windows managed by the window manager, in mapping order.
    pub fn client_windows(&self) -> IndicatorResult<Vec<u32>> {
        let reply = self
            .conn
            .get_property(
                false,
                self.root,
                self.atoms.net_client_list,
                AtomEnum::WINDOW,
                0,
                u32::MAX,
            )
            .map_err(|e| IndicatorError::Platform(format!("Failed to get client list: {e}")))?
            .reply()
            .map_err(|e| IndicatorError::Platform(format!("Failed to get client list: {e}")))?;

        Ok(reply.value32().map(|v| v.collect()).unwrap_or_default())
    }

    /// The application class of `window`, if it sets `WM_CLASS`.
    pub fn app_id_of(&self, window: u32) -> IndicatorResult<Option<String>> {
        let reply = self
            .conn
            .get_property(
                false,
                window,
                AtomEnum::WM_CLASS,
                AtomEnum::STRING,
                0,
                u32::MAX,
            )
            .map_err(|e| IndicatorError::Platform(format!("Failed to get WM_CLASS: {e}")))?
            .reply()
            .map_err(|e| IndicatorError::Platform(format!("Failed to get WM_CLASS: {e}")))?;

        Ok(parse_wm_class(&reply.value))
    }

    /// Client windows belonging to `app_id`.
    pub fn windows_of(&self, app_id: &str) -> IndicatorResult<Vec<u32>> {
        let mut windows = Vec::new();
        for window in self.client_windows()? {
            match self.app_id_of(window) {
                Ok(Some(class)) if class == app_id => windows.push(window),
                Ok(_) => {}
                Err(e) => info!("Skipping window {}: {}", window, e),
            }
        }
        Ok(windows)
    }

    pub fn active_window(&self) -> IndicatorResult<Option<u32>> {
        self.get_cardinal(self.root, self.atoms.net_active_window, AtomEnum::WINDOW)
    }

    pub fn current_desktop(&self) -> IndicatorResult<Option<u32>> {
        self.get_cardinal(
            self.root,
            self.atoms.net_current_desktop,
            AtomEnum::CARDINAL,
        )
    }

    pub fn window_desktop(&self, window: u32) -> IndicatorResult<Option<u32>> {
        self.get_cardinal(window, self.atoms.net_wm_desktop, AtomEnum::CARDINAL)
    }

    /// View of one application under the given isolation policy.
    pub fn app<'a>(&'a self, app_id: &'a str, isolation: WorkspaceIsolation) -> XorgApp<'a> {
        XorgApp {
            session: self,
            app_id,
            isolation,
        }
    }

    /// Read the embedded icon of a window.
    pub fn window_icon(&self, window: u32, size: u32) -> IndicatorResult<PixelBuffer> {
        let reply = self
            .conn
            .get_property(
                false,
                window,
                self.atoms.net_wm_icon,
                AtomEnum::CARDINAL,
                0,
                u32::MAX / 4, // Limit size to avoid huge icons
            )
            .map_err(|e| {
                IndicatorError::Platform(format!("Failed to request icon property: {e}"))
            })?
            .reply()
            .map_err(|e| IndicatorError::Platform(format!("Failed to get icon property: {e}")))?;

        if reply.value_len == 0 {
            return Err(IndicatorError::Unsupported);
        }

        let values: Vec<u32> = reply
            .value32()
            .ok_or_else(|| {
                IndicatorError::Platform("Failed to parse icon data as 32-bit values".to_string())
            })?
            .collect();

        decode_net_wm_icon(&values, size)
    }

    fn get_cardinal(
        &self,
        window: u32,
        property: u32,
        kind: AtomEnum,
    ) -> IndicatorResult<Option<u32>> {
        let reply = self
            .conn
            .get_property(false, window, property, kind, 0, 1)
            .map_err(|e| IndicatorError::Platform(format!("Failed to get property: {e}")))?
            .reply()
            .map_err(|e| IndicatorError::Platform(format!("Failed to get property: {e}")))?;

        Ok(reply.value32().and_then(|mut v| v.next()))
    }
}

impl FocusTracker for XorgSession {
    fn focused_app(&self) -> Option<String> {
        let window = match self.active_window() {
            Ok(Some(window)) if window != 0 => window,
            Ok(_) => return None,
            Err(e) => {
                info!("Failed to get active window: {}", e);
                return None;
            }
        };

        self.app_id_of(window).unwrap_or_else(|e| {
            info!("Failed to get class of window {}: {}", window, e);
            None
        })
    }
}

impl IconBitmapLoader for XorgSession {
    fn load_icon(&self, app_id: &str, size: u32) -> IndicatorResult<PixelBuffer> {
        let windows = self
            .windows_of(app_id)
            .map_err(|e| IndicatorError::no_bitmap(app_id, e))?;

        // Any window of the application may carry the icon.
        let mut last_error = IndicatorError::no_bitmap(app_id, "no window");
        for window in windows {
            match self.window_icon(window, size) {
                Ok(icon) => return Ok(icon),
                Err(e) => last_error = IndicatorError::no_bitmap(app_id, e),
            }
        }
        Err(last_error)
    }
}

/// An application as seen through an [`XorgSession`].
#[derive(Debug, Clone, Copy)]
pub struct XorgApp<'a> {
    session: &'a XorgSession,
    app_id: &'a str,
    isolation: WorkspaceIsolation,
}

impl XorgApp<'_> {
    fn on_current_desktop(&self, window: u32, current: Option<u32>) -> bool {
        let Some(current) = current else {
            return true;
        };
        match self.session.window_desktop(window) {
            Ok(Some(desktop)) => desktop == current || desktop == ALL_DESKTOPS,
            Ok(None) => true,
            Err(e) => {
                info!("Failed to get desktop of window {}: {}", window, e);
                true
            }
        }
    }
}

impl WindowInfoSource for XorgApp<'_> {
    fn interesting_windows(&self) -> Vec<WindowId> {
        let windows = match self.session.windows_of(self.app_id) {
            Ok(windows) => windows,
            Err(e) => {
                info!("Failed to list windows of {}: {}", self.app_id, e);
                return Vec::new();
            }
        };

        let current = match self.isolation {
            WorkspaceIsolation::AllWorkspaces => None,
            WorkspaceIsolation::CurrentWorkspace => {
                self.session.current_desktop().unwrap_or_default()
            }
        };

        windows
            .into_iter()
            .filter(|&w| self.on_current_desktop(w, current))
            .map(WindowId::from)
            .collect()
    }
}

impl AppRuntimeState for XorgApp<'_> {
    fn app_state(&self) -> AppState {
        match self.session.windows_of(self.app_id) {
            Ok(windows) if !windows.is_empty() => AppState::Running,
            Ok(_) => AppState::Stopped,
            Err(e) => {
                info!("Failed to list windows of {}: {}", self.app_id, e);
                AppState::Stopped
            }
        }
    }
}

/// Connect to X11 server with proper error handling.
fn connect_to_x11() -> IndicatorResult<(RustConnection, usize)> {
    RustConnection::connect(None).map_err(|e| {
        let error_str = e.to_string();
        // Check if this is a "no display" error
        if error_str.contains("DISPLAY")
            || error_str.contains("display")
            || error_str.contains("No such file or directory")
        {
            IndicatorError::NoDisplay
        } else {
            IndicatorError::Platform(error_str)
        }
    })
}

fn setup_atoms<C: Connection>(conn: &C) -> IndicatorResult<X11Atoms> {
    Ok(X11Atoms {
        net_active_window: get_atom(conn, b"_NET_ACTIVE_WINDOW")?,
        net_client_list: get_atom(conn, b"_NET_CLIENT_LIST")?,
        net_current_desktop: get_atom(conn, b"_NET_CURRENT_DESKTOP")?,
        net_wm_desktop: get_atom(conn, b"_NET_WM_DESKTOP")?,
        net_wm_icon: get_atom(conn, b"_NET_WM_ICON")?,
    })
}

fn get_atom<C: Connection>(conn: &C, name: &[u8]) -> IndicatorResult<u32> {
    let cookie = conn
        .intern_atom(false, name)
        .map_err(|e| IndicatorError::Platform(e.to_string()))?;

    let reply = cookie
        .reply()
        .map_err(|e| IndicatorError::Platform(e.to_string()))?;

    Ok(reply.atom)
}

/// The class (second) string of a `WM_CLASS` value.
fn parse_wm_class(value: &[u8]) -> Option<String> {
    value
        .split(|&b| b == 0)
        .nth(1)
        .filter(|class| !class.is_empty())
        .map(|class| String::from_utf8_lossy(class).into_owned())
}

/// Decode `_NET_WM_ICON` data (repeated width, height, ARGB pixels) and
/// return the smallest icon at least `size` wide, or the largest one.
fn decode_net_wm_icon(values: &[u32], size: u32) -> IndicatorResult<PixelBuffer> {
    let mut best: Option<(u32, u32, &[u32])> = None;
    let mut rest = values;

    while rest.len() >= 2 {
        let (width, height) = (rest[0], rest[1]);
        if width == 0 || height == 0 {
            break;
        }

        let expected_pixels = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| IndicatorError::Platform("Icon dimensions overflow".into()))?;
        let available_pixels = rest.len() - 2;
        if available_pixels < expected_pixels {
            break;
        }

        let pixels = &rest[2..2 + expected_pixels];
        let better = match best {
            None => true,
            Some((best_width, _, _)) if best_width < size => width > best_width,
            Some((best_width, _, _)) => width >= size && width < best_width,
        };
        if better {
            best = Some((width, height, pixels));
        }

        rest = &rest[2 + expected_pixels..];
    }

    let (width, height, argb) =
        best.ok_or_else(|| IndicatorError::Platform("Invalid icon data".to_string()))?;

    // Convert ARGB u32 values to RGBA u8 bytes
    let mut rgba = Vec::with_capacity(argb.len() * 4);
    for &pixel in argb {
        let a = ((pixel >> 24) & 0xFF) as u8;
        let r = ((pixel >> 16) & 0xFF) as u8;
        let g = ((pixel >> 8) & 0xFF) as u8;
        let b = (pixel & 0xFF) as u8;
        rgba.extend_from_slice(&[r, g, b, a]);
    }

    PixelBuffer::from_raw(width, height, rgba)
}
