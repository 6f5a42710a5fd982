use std::time::Duration;

use super::automation::{
    apply_window_rect, find_new_window, snapshot_windows, AccessibilityBackend, AddressBar, Key,
    WindowAutomation, WindowHandle,
};
use super::ExplorerTimings;
use crate::error::{AppError, Result};
use crate::opener::tiers::{Tier, TierContext, TierFailure};
use crate::paths::normalize_path;
use crate::retry::{pause, poll_until, retry};

/// Spawn Explorer on `path` and wait for its window.
fn launch_and_find(
    automation: &dyn WindowAutomation,
    path: &str,
    find_timeout: Duration,
    timings: &ExplorerTimings,
    settle: Duration,
) -> Result<Option<WindowHandle>> {
    let before = snapshot_windows(automation);
    log::debug!("Existing Explorer windows: {}", before.len());

    automation.spawn_explorer(path)?;
    log::debug!("Launched explorer.exe: {}", path);
    pause(settle);

    let found = find_new_window(automation, &before, find_timeout, timings.window_poll_interval);
    match found {
        Some(hwnd) => log::debug!("New Explorer window found: {:?}", hwnd),
        None => log::warn!("New Explorer window not found (timeout={:?})", find_timeout),
    }
    Ok(found)
}

/// Tier 1: set the address bar of each new tab through UI Automation and
/// read it back before navigating.
pub(super) struct UiaTier<'a> {
    pub automation: &'a dyn WindowAutomation,
    pub accessibility: &'a dyn AccessibilityBackend,
    pub timings: &'a ExplorerTimings,
}

impl Tier for UiaTier<'_> {
    fn name(&self) -> &'static str {
        "UI Automation"
    }

    fn is_available(&self) -> bool {
        self.accessibility.is_available()
    }

    fn attempt(
        &self,
        paths: &[String],
        ctx: &mut TierContext<'_, '_>,
    ) -> std::result::Result<(), TierFailure> {
        let total = paths.len();
        let first = normalize_path(&paths[0]);
        let find_timeout = ctx.timeout.min(self.timings.window_find_timeout);

        let hwnd = launch_and_find(
            self.automation,
            &first,
            find_timeout,
            self.timings,
            Duration::ZERO,
        )?
        .ok_or(AppError::WindowNotFound)?;

        if total > 1 {
            let bar = self.accessibility.attach(hwnd)?;
            bar.focus_window()?;
            log::debug!("Connected via UI Automation: {:?}", hwnd);
            ctx.reporter.progress(1, total, &paths[0]);

            for (i, path) in paths.iter().enumerate().skip(1) {
                log::debug!("Adding tab: [{}/{}] {}", i + 1, total, path);
                match self.add_tab(bar.as_ref(), path, ctx.timeout) {
                    Ok(()) => ctx.reporter.progress(i + 1, total, path),
                    Err(e) => {
                        log::error!("Tab addition failed: {} -> {}", path, e);
                        ctx.reporter.error(path, &e.to_string());
                    }
                }
            }
        } else {
            ctx.reporter.progress(1, total, &paths[0]);
        }

        if let Some(rect) = ctx.window_rect {
            apply_window_rect(self.automation, hwnd, rect);
        }
        Ok(())
    }
}

impl UiaTier<'_> {
    fn add_tab(&self, bar: &dyn AddressBar, path: &str, timeout: Duration) -> Result<()> {
        let target = normalize_path(path);

        self.automation.send_key_combo(Key::Control, Key::T)?;
        pause(self.timings.uia_new_tab_settle);

        let mut keyboard_error = None;
        let verified = retry(
            self.timings.verify_attempts,
            self.timings.verify_retry_delay,
            |attempt| match self.enter_address(bar, &target, attempt) {
                Ok(done) => done,
                Err(e) => {
                    keyboard_error = Some(e);
                    true
                }
            },
        );
        if let Some(e) = keyboard_error {
            return Err(e);
        }
        if !verified {
            log::warn!("Path set failed after retries, proceeding anyway: {}", target);
        }

        pause(self.timings.before_enter);
        self.automation.press_key(Key::Return)?;
        self.wait_for_navigation(bar, timeout);
        Ok(())
    }

    /// One focus-set-verify round. `Ok(true)` once the address bar holds
    /// `target`, or when its text cannot be read back at all.
    fn enter_address(&self, bar: &dyn AddressBar, target: &str, attempt: u32) -> Result<bool> {
        self.automation.send_key_combo(Key::Control, Key::L)?;

        if bar.wait_ready(self.timings.address_bar_ready_timeout) {
            log::debug!("Address bar ready (attempt {})", attempt);
        } else {
            log::debug!("Address bar wait failed (attempt {})", attempt);
            pause(self.timings.address_bar_retry_pause);
        }

        if let Err(e) = bar.set_text(target) {
            log::debug!("Value pattern failed ({}), falling back to keyboard", e);
            self.automation.type_text(target)?;
        }
        pause(self.timings.verify_settle);

        match bar.text() {
            Ok(current) if !current.is_empty() && normalize_path(&current) == target => {
                log::debug!("Path verified: {}", current);
                Ok(true)
            }
            Ok(current) => {
                log::warn!(
                    "Path mismatch (attempt {}): expected={}, got={}",
                    attempt,
                    target,
                    current
                );
                Ok(false)
            }
            Err(e) => {
                log::debug!("Could not verify path (attempt {}): {}", attempt, e);
                Ok(true)
            }
        }
    }

    /// The address bar drops keyboard focus once Explorer has navigated and
    /// restored the breadcrumb view.
    fn wait_for_navigation(&self, bar: &dyn AddressBar, timeout: Duration) -> bool {
        let done = poll_until(timeout, self.timings.navigation_poll_interval, || {
            (!bar.has_keyboard_focus()).then_some(())
        });
        match done {
            Some(()) => {
                pause(self.timings.navigation_render);
                true
            }
            None => {
                log::warn!("Navigation timeout ({:?})", timeout);
                false
            }
        }
    }
}

/// Tier 2: synthesized keystrokes with fixed delays and no read-back.
pub(super) struct SendInputTier<'a> {
    pub automation: &'a dyn WindowAutomation,
    pub timings: &'a ExplorerTimings,
}

impl Tier for SendInputTier<'_> {
    fn name(&self) -> &'static str {
        "SendInput"
    }

    fn attempt(
        &self,
        paths: &[String],
        ctx: &mut TierContext<'_, '_>,
    ) -> std::result::Result<(), TierFailure> {
        let total = paths.len();
        let first = normalize_path(&paths[0]);

        if total == 1 {
            let find_timeout = ctx.timeout.min(self.timings.window_find_timeout_short);
            let hwnd = launch_and_find(
                self.automation,
                &first,
                find_timeout,
                self.timings,
                self.timings.sendinput_launch_settle,
            )?;
            ctx.reporter.progress(1, total, &paths[0]);
            if let (Some(hwnd), Some(rect)) = (hwnd, ctx.window_rect) {
                apply_window_rect(self.automation, hwnd, rect);
            }
            return Ok(());
        }

        let find_timeout = ctx.timeout.min(self.timings.window_find_timeout);
        let hwnd = launch_and_find(
            self.automation,
            &first,
            find_timeout,
            self.timings,
            self.timings.sendinput_launch_settle,
        )?
        .ok_or(AppError::WindowNotFound)?;

        if !self.automation.bring_to_foreground(hwnd) {
            log::debug!("SetForegroundWindow refused for {:?}", hwnd);
        }
        pause(self.timings.sendinput_foreground_settle);
        ctx.reporter.progress(1, total, &paths[0]);

        for (i, path) in paths.iter().enumerate().skip(1) {
            log::debug!("SendInput: [{}/{}] {}", i + 1, total, path);
            match self.add_tab(path) {
                Ok(()) => ctx.reporter.progress(i + 1, total, path),
                Err(e) => {
                    log::error!("SendInput failed: {} -> {}", path, e);
                    ctx.reporter.error(path, &e.to_string());
                }
            }
        }

        if let Some(rect) = ctx.window_rect {
            apply_window_rect(self.automation, hwnd, rect);
        }
        Ok(())
    }
}

impl SendInputTier<'_> {
    fn add_tab(&self, path: &str) -> Result<()> {
        let t = self.timings;
        self.automation.send_key_combo(Key::Control, Key::T)?;
        pause(t.sendinput_new_tab);
        self.automation.send_key_combo(Key::Control, Key::L)?;
        pause(t.sendinput_focus_address);
        self.automation.type_text(&normalize_path(path))?;
        pause(t.sendinput_typed);
        self.automation.press_key(Key::Return)?;
        pause(t.sendinput_navigate);
        Ok(())
    }
}

/// Tier 3: one Explorer window per path. Always succeeds as a batch.
pub(super) struct SeparateWindowsTier<'a> {
    pub automation: &'a dyn WindowAutomation,
    pub timings: &'a ExplorerTimings,
}

impl Tier for SeparateWindowsTier<'_> {
    fn name(&self) -> &'static str {
        "separate windows (fallback)"
    }

    fn attempt(
        &self,
        paths: &[String],
        ctx: &mut TierContext<'_, '_>,
    ) -> std::result::Result<(), TierFailure> {
        let total = paths.len();
        for (i, path) in paths.iter().enumerate() {
            match self.open_window(path, ctx) {
                Ok(()) => {
                    ctx.reporter.progress(i + 1, total, path);
                    pause(self.timings.separate_window_pacing);
                }
                Err(e) => {
                    log::error!("Failed to open: {} -> {}", path, e);
                    ctx.reporter.error(path, &e.to_string());
                }
            }
        }
        Ok(())
    }
}

impl SeparateWindowsTier<'_> {
    fn open_window(&self, path: &str, ctx: &TierContext<'_, '_>) -> Result<()> {
        let Some(rect) = ctx.window_rect else {
            return self.automation.spawn_explorer(&normalize_path(path));
        };

        let hwnd = launch_and_find(
            self.automation,
            &normalize_path(path),
            self.timings.window_find_timeout_short,
            self.timings,
            Duration::ZERO,
        )?;
        match hwnd {
            Some(hwnd) => apply_window_rect(self.automation, hwnd, rect),
            None => log::debug!("Skipping window geometry for {}", path),
        }
        Ok(())
    }
}
