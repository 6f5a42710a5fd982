//! Opening folders in the native file manager.
//!
//! Each platform has one [`FolderOpener`]. Its tab-opening entry point runs
//! an ordered list of [`tiers::Tier`]s through [`tiers::run_tiers`], from the
//! most faithful technique down to plain separate windows.

pub mod explorer;
pub mod finder;
mod report;
pub mod tiers;

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::WindowRect;

pub use report::{classify_error, Reporter};

/// One file manager's way of showing folders.
///
/// Every method blocks until the file manager has been driven to completion
/// or the relevant wait has run out. Call it off the UI thread.
pub trait FolderOpener: Send + Sync {
    /// Show `path` in a new window. `false` only if the file manager could
    /// not be launched.
    fn open_single_folder(&self, path: &str, window_rect: Option<WindowRect>) -> bool;

    /// Show `paths` as tabs of one new window, degrading to separate windows.
    /// `false` only for an empty `paths`.
    fn open_folders_as_tabs(
        &self,
        paths: &[String],
        reporter: &mut Reporter<'_>,
        timeout: Duration,
        window_rect: Option<WindowRect>,
    ) -> bool;

    /// Position and size of the frontmost file-manager window.
    fn frontmost_window_rect(&self) -> Option<WindowRect>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Unsupported,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unsupported
        }
    }
}

/// The opener for the running OS.
pub fn platform_opener() -> Result<Box<dyn FolderOpener>> {
    match Platform::current() {
        Platform::MacOs => Ok(Box::new(finder::FinderOpener::system())),
        #[cfg(windows)]
        Platform::Windows => Ok(Box::new(explorer::ExplorerOpener::system())),
        _ => Err(AppError::UnsupportedPlatform {
            os: std::env::consts::OS.to_string(),
        }),
    }
}
