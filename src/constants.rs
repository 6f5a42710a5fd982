use std::time::Duration;

pub mod timing {
    use super::*;
    pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(30);
    pub const BOUNDS_QUERY_TIMEOUT: Duration = Duration::from_secs(5);
    pub const SCRIPT_POLL_INTERVAL: Duration = Duration::from_millis(50);
    pub const FINDER_SET_TARGET_DELAY: Duration = Duration::from_millis(100);
    pub const SEPARATE_WINDOW_PACING: Duration = Duration::from_millis(300);

    pub const WINDOW_FIND_TIMEOUT: Duration = Duration::from_secs(10);
    pub const WINDOW_FIND_TIMEOUT_SHORT: Duration = Duration::from_secs(5);
    pub const WINDOW_POLL_INTERVAL: Duration = Duration::from_millis(200);

    pub const UIA_NEW_TAB_SETTLE: Duration = Duration::from_millis(800);
    pub const ADDRESS_BAR_READY_TIMEOUT: Duration = Duration::from_secs(3);
    pub const ADDRESS_BAR_RETRY_PAUSE: Duration = Duration::from_millis(500);
    pub const VERIFY_SETTLE: Duration = Duration::from_millis(150);
    pub const VERIFY_RETRY_DELAY: Duration = Duration::from_millis(300);
    pub const BEFORE_ENTER: Duration = Duration::from_millis(100);
    pub const NAVIGATION_POLL_INTERVAL: Duration = Duration::from_millis(100);
    pub const NAVIGATION_RENDER: Duration = Duration::from_millis(300);

    pub const SENDINPUT_LAUNCH_SETTLE: Duration = Duration::from_millis(1500);
    pub const SENDINPUT_FOREGROUND_SETTLE: Duration = Duration::from_millis(300);
    pub const SENDINPUT_NEW_TAB: Duration = Duration::from_millis(500);
    pub const SENDINPUT_FOCUS_ADDRESS: Duration = Duration::from_millis(300);
    pub const SENDINPUT_TYPED: Duration = Duration::from_millis(100);
    pub const SENDINPUT_NAVIGATE: Duration = Duration::from_millis(800);
}

pub mod limits {
    pub const FINDER_SET_TARGET_ATTEMPTS: u32 = 30;
    pub const ADDRESS_BAR_VERIFY_ATTEMPTS: u32 = 3;
    pub const HISTORY_MAX: usize = 50;
    pub const MIN_WINDOW_WIDTH: i32 = 528;
    pub const MIN_WINDOW_HEIGHT: i32 = 308;
}

pub const APP_DIR_NAME: &str = "FileTabOpener";
pub const LINUX_APP_DIR_NAME: &str = "file_tab_opener";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CONFIG_VERSION: u32 = 1;
pub const DEFAULT_WINDOW_GEOMETRY: &str = "800x600";

pub const EXPLORER_EXECUTABLE: &str = "explorer.exe";
pub const EXPLORER_WINDOW_CLASS: &str = "CabinetWClass";
pub const OSASCRIPT_EXECUTABLE: &str = "osascript";

/// Lower-cased fragments of the "assistive access" error macOS raises in each
/// supported locale.
pub const ACCESSIBILITY_KEYWORDS: &[&str] = &[
    "assistive",
    "アクセシビリティ",
    "辅助功能",
    "보조",
];
