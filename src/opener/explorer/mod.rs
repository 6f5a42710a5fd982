//! Opening folders as Explorer tabs on Windows 11.
//!
//! Explorer has no scripting interface for tabs, so the opener drives its
//! UI from the outside. Three tiers are tried in order:
//!
//! 1. **UI Automation.** Ctrl+T for a new tab, then the address bar text
//!    is set through the value pattern and read back before Enter.
//! 2. **SendInput.** Ctrl+T, Ctrl+L, the path typed as Unicode keystrokes,
//!    Enter. Nothing is verified.
//! 3. **Separate windows.** One `explorer.exe` per folder.
//!
//! Tier 1 initialises COM on first use only. Its availability probe never
//! loads the UI Automation library, since initialising COM at startup
//! interferes with the native file dialogs used elsewhere in the process.
//!
//! Paths are deduplicated (first occurrence wins) before any tier runs.
//! Tier failures are logged and never reach the caller; only per-path
//! failures inside a tier are reported.

pub mod automation;
mod tiers;
#[cfg(windows)]
mod uia;
#[cfg(windows)]
mod win32;

use std::time::Duration;

use crate::constants::limits::ADDRESS_BAR_VERIFY_ATTEMPTS;
use crate::constants::timing;
use crate::models::WindowRect;
use crate::opener::tiers::{run_tiers, TierContext};
use crate::opener::{FolderOpener, Reporter};
use crate::paths::{dedup_paths, normalize_path};

pub use automation::{
    apply_window_rect, find_new_window, snapshot_windows, AccessibilityBackend, AddressBar, Key,
    WindowAutomation, WindowHandle,
};
use tiers::{SendInputTier, SeparateWindowsTier, UiaTier};
#[cfg(windows)]
pub use uia::UiaBackend;
#[cfg(windows)]
pub use win32::Win32Automation;

/// Every delay and bound the Explorer tiers wait on.
#[derive(Debug, Clone)]
pub struct ExplorerTimings {
    pub window_find_timeout: Duration,
    pub window_find_timeout_short: Duration,
    pub window_poll_interval: Duration,
    pub separate_window_pacing: Duration,

    pub uia_new_tab_settle: Duration,
    pub address_bar_ready_timeout: Duration,
    pub address_bar_retry_pause: Duration,
    pub verify_attempts: u32,
    pub verify_settle: Duration,
    pub verify_retry_delay: Duration,
    pub before_enter: Duration,
    pub navigation_poll_interval: Duration,
    pub navigation_render: Duration,

    pub sendinput_launch_settle: Duration,
    pub sendinput_foreground_settle: Duration,
    pub sendinput_new_tab: Duration,
    pub sendinput_focus_address: Duration,
    pub sendinput_typed: Duration,
    pub sendinput_navigate: Duration,
}

impl Default for ExplorerTimings {
    fn default() -> Self {
        Self {
            window_find_timeout: timing::WINDOW_FIND_TIMEOUT,
            window_find_timeout_short: timing::WINDOW_FIND_TIMEOUT_SHORT,
            window_poll_interval: timing::WINDOW_POLL_INTERVAL,
            separate_window_pacing: timing::SEPARATE_WINDOW_PACING,

            uia_new_tab_settle: timing::UIA_NEW_TAB_SETTLE,
            address_bar_ready_timeout: timing::ADDRESS_BAR_READY_TIMEOUT,
            address_bar_retry_pause: timing::ADDRESS_BAR_RETRY_PAUSE,
            verify_attempts: ADDRESS_BAR_VERIFY_ATTEMPTS,
            verify_settle: timing::VERIFY_SETTLE,
            verify_retry_delay: timing::VERIFY_RETRY_DELAY,
            before_enter: timing::BEFORE_ENTER,
            navigation_poll_interval: timing::NAVIGATION_POLL_INTERVAL,
            navigation_render: timing::NAVIGATION_RENDER,

            sendinput_launch_settle: timing::SENDINPUT_LAUNCH_SETTLE,
            sendinput_foreground_settle: timing::SENDINPUT_FOREGROUND_SETTLE,
            sendinput_new_tab: timing::SENDINPUT_NEW_TAB,
            sendinput_focus_address: timing::SENDINPUT_FOCUS_ADDRESS,
            sendinput_typed: timing::SENDINPUT_TYPED,
            sendinput_navigate: timing::SENDINPUT_NAVIGATE,
        }
    }
}

impl ExplorerTimings {
    /// Zero delays with the real attempt counts. Window discovery still
    /// polls, but a miss gives up after a few milliseconds.
    pub fn immediate() -> Self {
        Self {
            window_find_timeout: Duration::from_millis(20),
            window_find_timeout_short: Duration::from_millis(20),
            window_poll_interval: Duration::from_millis(1),
            separate_window_pacing: Duration::ZERO,

            uia_new_tab_settle: Duration::ZERO,
            address_bar_ready_timeout: Duration::ZERO,
            address_bar_retry_pause: Duration::ZERO,
            verify_attempts: ADDRESS_BAR_VERIFY_ATTEMPTS,
            verify_settle: Duration::ZERO,
            verify_retry_delay: Duration::ZERO,
            before_enter: Duration::ZERO,
            navigation_poll_interval: Duration::from_millis(1),
            navigation_render: Duration::ZERO,

            sendinput_launch_settle: Duration::ZERO,
            sendinput_foreground_settle: Duration::ZERO,
            sendinput_new_tab: Duration::ZERO,
            sendinput_focus_address: Duration::ZERO,
            sendinput_typed: Duration::ZERO,
            sendinput_navigate: Duration::ZERO,
        }
    }
}

pub struct ExplorerOpener<A, U> {
    automation: A,
    accessibility: U,
    timings: ExplorerTimings,
}

#[cfg(windows)]
impl ExplorerOpener<Win32Automation, UiaBackend> {
    pub fn system() -> Self {
        Self::new(Win32Automation, UiaBackend::default(), ExplorerTimings::default())
    }
}

impl<A: WindowAutomation, U: AccessibilityBackend> ExplorerOpener<A, U> {
    pub fn new(automation: A, accessibility: U, timings: ExplorerTimings) -> Self {
        Self {
            automation,
            accessibility,
            timings,
        }
    }

    pub fn automation(&self) -> &A {
        &self.automation
    }

    pub fn accessibility(&self) -> &U {
        &self.accessibility
    }
}

impl<A: WindowAutomation, U: AccessibilityBackend> FolderOpener for ExplorerOpener<A, U> {
    fn open_single_folder(&self, path: &str, window_rect: Option<WindowRect>) -> bool {
        let before = window_rect.map(|_| snapshot_windows(&self.automation));

        if let Err(e) = self.automation.spawn_explorer(&normalize_path(path)) {
            log::error!("Failed to open: {} -> {}", path, e);
            return false;
        }

        if let (Some(rect), Some(before)) = (window_rect, before) {
            let found = find_new_window(
                &self.automation,
                &before,
                self.timings.window_find_timeout_short,
                self.timings.window_poll_interval,
            );
            match found {
                Some(hwnd) => apply_window_rect(&self.automation, hwnd, rect.clamped()),
                None => log::warn!("New Explorer window not found for {}", path),
            }
        }
        true
    }

    fn open_folders_as_tabs(
        &self,
        paths: &[String],
        reporter: &mut Reporter<'_>,
        timeout: Duration,
        window_rect: Option<WindowRect>,
    ) -> bool {
        if paths.is_empty() {
            return false;
        }

        let paths = dedup_paths(paths);
        log::info!("Opening as tabs: {} paths, timeout={:?}", paths.len(), timeout);
        for (i, p) in paths.iter().enumerate() {
            log::debug!("  [{}] {}", i, p);
        }

        let uia = UiaTier {
            automation: &self.automation,
            accessibility: &self.accessibility,
            timings: &self.timings,
        };
        let send_input = SendInputTier {
            automation: &self.automation,
            timings: &self.timings,
        };
        let separate = SeparateWindowsTier {
            automation: &self.automation,
            timings: &self.timings,
        };

        let mut ctx = TierContext {
            reporter,
            timeout,
            window_rect: window_rect.map(WindowRect::clamped),
        };
        run_tiers(&[&uia, &send_input, &separate], &paths, &mut ctx)
    }

    fn frontmost_window_rect(&self) -> Option<WindowRect> {
        let hwnd = match self.automation.foreground_window() {
            Some(hwnd) if self.automation.is_explorer_window(hwnd) => hwnd,
            _ => match self.automation.explorer_windows().first() {
                Some(hwnd) => *hwnd,
                None => {
                    log::debug!("No Explorer window found");
                    return None;
                }
            },
        };

        let rect = self.automation.window_rect(hwnd);
        if rect.is_none() {
            log::warn!("GetWindowRect failed for {:?}", hwnd);
        }
        rect
    }
}
