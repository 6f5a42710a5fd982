//! Seams between the Explorer tiers and the Win32 / UI Automation APIs.
//!
//! The tiers only talk to these traits, so the tab logic runs against fakes
//! on any host. The real implementations live in `win32` and `uia`.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::Result;
use crate::models::WindowRect;
use crate::retry::poll_until;

/// Opaque top-level window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

/// Keys the tiers press on Explorer's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Control,
    T,
    L,
    Return,
}

/// Top-level window and keyboard operations.
pub trait WindowAutomation: Send + Sync {
    /// Every Explorer top-level window, in z-order.
    fn explorer_windows(&self) -> Vec<WindowHandle>;

    fn is_explorer_window(&self, hwnd: WindowHandle) -> bool;

    fn foreground_window(&self) -> Option<WindowHandle>;

    fn window_rect(&self, hwnd: WindowHandle) -> Option<WindowRect>;

    fn move_window(&self, hwnd: WindowHandle, rect: WindowRect) -> bool;

    /// Restore `hwnd` if minimised and make it the foreground window.
    fn bring_to_foreground(&self, hwnd: WindowHandle) -> bool;

    /// Launch `explorer.exe <path>` without waiting for it.
    fn spawn_explorer(&self, path: &str) -> Result<()>;

    /// Press `modifier` + `key` and release both.
    fn send_key_combo(&self, modifier: Key, key: Key) -> Result<()>;

    fn press_key(&self, key: Key) -> Result<()>;

    /// Type `text` as Unicode keystrokes into the focused control.
    fn type_text(&self, text: &str) -> Result<()>;
}

/// Entry point to the accessibility API.
pub trait AccessibilityBackend: Send + Sync {
    /// Whether the backend could work on this machine. Must stay cheap:
    /// nothing is loaded or initialised here.
    fn is_available(&self) -> bool;

    /// Connect to `hwnd`, initialising the backend on first use.
    fn attach(&self, hwnd: WindowHandle) -> Result<Box<dyn AddressBar>>;
}

/// The address bar of one attached Explorer window.
pub trait AddressBar {
    fn focus_window(&self) -> Result<()>;

    /// Block until the address bar exists and accepts input.
    fn wait_ready(&self, timeout: Duration) -> bool;

    fn set_text(&self, text: &str) -> Result<()>;

    /// Current address bar text.
    fn text(&self) -> Result<String>;

    /// Whether the address bar (edit mode) currently has keyboard focus.
    fn has_keyboard_focus(&self) -> bool;
}

/// Wait for an Explorer window that was not in `before`.
pub fn find_new_window(
    automation: &dyn WindowAutomation,
    before: &HashSet<WindowHandle>,
    timeout: Duration,
    interval: Duration,
) -> Option<WindowHandle> {
    poll_until(timeout, interval, || {
        automation
            .explorer_windows()
            .into_iter()
            .find(|hwnd| !before.contains(hwnd))
    })
}

/// Move `hwnd` to `rect`. Failures are logged and otherwise ignored.
pub fn apply_window_rect(automation: &dyn WindowAutomation, hwnd: WindowHandle, rect: WindowRect) {
    if automation.move_window(hwnd, rect) {
        log::debug!(
            "Window geometry applied: {}x{}+{}+{}",
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );
    } else {
        log::warn!("Failed to apply window geometry to {:?}", hwnd);
    }
}

/// Snapshot of the Explorer windows open right now.
pub fn snapshot_windows(automation: &dyn WindowAutomation) -> HashSet<WindowHandle> {
    automation.explorer_windows().into_iter().collect()
}
