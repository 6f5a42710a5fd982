pub mod config;
pub mod constants;
pub mod error;
pub mod i18n;
pub mod models;
pub mod opener;
pub mod paths;
pub mod retry;
pub mod shell;

use std::time::Duration;

pub use error::{AppError, Result};
pub use models::{ErrorEvent, ErrorKind, ProgressEvent, WindowRect};
pub use opener::{platform_opener, FolderOpener, Platform, Reporter};
pub use paths::validate_paths;

fn with_opener<T>(fallback: T, f: impl FnOnce(&dyn FolderOpener) -> T) -> T {
    match platform_opener() {
        Ok(opener) => f(opener.as_ref()),
        Err(e) => {
            log::warn!("{}", e);
            fallback
        }
    }
}

/// Open `path` in a new file-manager window.
pub fn open_single_folder(path: &str, window_rect: Option<WindowRect>) -> bool {
    with_opener(false, |opener| opener.open_single_folder(path, window_rect))
}

/// Open `paths` as tabs of one window, reporting through `reporter`.
///
/// Blocks for as long as the file manager takes; `timeout` bounds each
/// individual wait, not the whole batch. Returns `false` only when `paths`
/// is empty (or the platform has no opener).
pub fn open_folders_as_tabs(
    paths: &[String],
    reporter: &mut Reporter<'_>,
    timeout: Duration,
    window_rect: Option<WindowRect>,
) -> bool {
    if paths.is_empty() {
        return false;
    }
    with_opener(false, |opener| {
        opener.open_folders_as_tabs(paths, reporter, timeout, window_rect)
    })
}

/// Position and size of the frontmost Finder or Explorer window.
pub fn get_frontmost_window_rect() -> Option<WindowRect> {
    with_opener(None, |opener| opener.frontmost_window_rect())
}
