//! Opening folders as Finder tabs on macOS.
//!
//! Two tiers, tried in order:
//! 1. One AppleScript that creates a window, then presses ⌘T through
//!    System Events and retries `set target` for every further path.
//!    System Events needs Accessibility permission.
//! 2. A separate Finder window per path.

pub mod osascript;
pub mod script;

use std::time::Duration;

use crate::constants::limits::FINDER_SET_TARGET_ATTEMPTS;
use crate::constants::timing::{
    BOUNDS_QUERY_TIMEOUT, FINDER_SET_TARGET_DELAY, SEPARATE_WINDOW_PACING,
};
use crate::models::WindowRect;
use crate::opener::tiers::{run_tiers, Tier, TierContext, TierFailure};
use crate::opener::{FolderOpener, Reporter};
use crate::paths::expand_home;
use crate::retry::pause;

pub use osascript::{OsaScript, ScriptRunner};
use script::{
    build_open_window_script, build_tabs_script, parse_bounds, SetTargetRetry,
    FRONT_WINDOW_BOUNDS_SCRIPT,
};

#[derive(Debug, Clone, Copy)]
pub struct FinderTimings {
    pub set_target: SetTargetRetry,
    pub separate_window_pacing: Duration,
    pub bounds_query_timeout: Duration,
}

impl Default for FinderTimings {
    fn default() -> Self {
        Self {
            set_target: SetTargetRetry {
                max_attempts: FINDER_SET_TARGET_ATTEMPTS,
                delay: FINDER_SET_TARGET_DELAY,
            },
            separate_window_pacing: SEPARATE_WINDOW_PACING,
            bounds_query_timeout: BOUNDS_QUERY_TIMEOUT,
        }
    }
}

impl FinderTimings {
    /// No pacing between separate windows; script-side retry is unchanged.
    pub fn immediate() -> Self {
        Self {
            separate_window_pacing: Duration::ZERO,
            ..Self::default()
        }
    }
}

pub struct FinderOpener<R: ScriptRunner> {
    runner: R,
    timings: FinderTimings,
}

impl FinderOpener<OsaScript> {
    pub fn system() -> Self {
        Self::new(OsaScript, FinderTimings::default())
    }
}

impl<R: ScriptRunner> FinderOpener<R> {
    pub fn new(runner: R, timings: FinderTimings) -> Self {
        Self { runner, timings }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: ScriptRunner> FolderOpener for FinderOpener<R> {
    fn open_single_folder(&self, path: &str, window_rect: Option<WindowRect>) -> bool {
        let script =
            build_open_window_script(&expand_home(path), window_rect.map(WindowRect::clamped));
        match self.runner.spawn(&script) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to open: {} -> {}", path, e);
                false
            }
        }
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

        log::info!("Opening as tabs: {} paths", paths.len());
        for (i, p) in paths.iter().enumerate() {
            log::debug!("  [{}] {}", i, p);
        }

        let expanded: Vec<String> = paths.iter().map(|p| expand_home(p)).collect();

        let tabs = FinderTabsTier {
            runner: &self.runner,
            retry: self.timings.set_target,
        };
        let windows = FinderWindowsTier {
            runner: &self.runner,
            pacing: self.timings.separate_window_pacing,
        };

        let mut ctx = TierContext {
            reporter,
            timeout,
            window_rect: window_rect.map(WindowRect::clamped),
        };
        run_tiers(&[&tabs, &windows], &expanded, &mut ctx)
    }

    fn frontmost_window_rect(&self) -> Option<WindowRect> {
        match self
            .runner
            .run(FRONT_WINDOW_BOUNDS_SCRIPT, self.timings.bounds_query_timeout)
        {
            Ok(output) => parse_bounds(&output),
            Err(e) => {
                log::warn!("Failed to get Finder bounds: {}", e);
                None
            }
        }
    }
}

/// AppleScript + System Events: ⌘T, then `set target` with retries.
struct FinderTabsTier<'r, R: ScriptRunner> {
    runner: &'r R,
    retry: SetTargetRetry,
}

impl<R: ScriptRunner> Tier for FinderTabsTier<'_, R> {
    fn name(&self) -> &'static str {
        "AppleScript"
    }

    fn attempt(&self, paths: &[String], ctx: &mut TierContext<'_, '_>) -> Result<(), TierFailure> {
        let script = build_tabs_script(paths, ctx.window_rect, self.retry);
        log::debug!("Running AppleScript ({} lines)", script.lines().count());

        match self.runner.run(&script, ctx.timeout) {
            Ok(_) => {
                log::info!("AppleScript succeeded");
                for (i, path) in paths.iter().enumerate() {
                    ctx.reporter.progress(i + 1, paths.len(), path);
                }
                Ok(())
            }
            Err(e) => Err(TierFailure::surfaced(e.to_string())),
        }
    }
}

/// Last resort: each folder in its own Finder window. Never fails as a whole.
struct FinderWindowsTier<'r, R: ScriptRunner> {
    runner: &'r R,
    pacing: Duration,
}

impl<R: ScriptRunner> Tier for FinderWindowsTier<'_, R> {
    fn name(&self) -> &'static str {
        "separate windows (fallback)"
    }

    fn attempt(&self, paths: &[String], ctx: &mut TierContext<'_, '_>) -> Result<(), TierFailure> {
        let total = paths.len();
        for (i, path) in paths.iter().enumerate() {
            let script = build_open_window_script(path, ctx.window_rect);
            match self.runner.spawn(&script) {
                Ok(()) => {
                    log::debug!("Opened separately: [{}/{}] {}", i + 1, total, path);
                    ctx.reporter.progress(i + 1, total, path);
                    pause(self.pacing);
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
