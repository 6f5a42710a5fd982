use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Tab group not found: {name}")]
    TabGroupNotFound { name: String },

    #[error("Unsupported platform: {os}")]
    UnsupportedPlatform { os: String },

    #[error("AppleScript error: {0}")]
    Script(String),

    #[error("AppleScript execution timed out after {secs}s")]
    ScriptTimeout { secs: u64 },

    #[error("New Explorer window not found")]
    WindowNotFound,

    #[error("Accessibility automation unavailable: {0}")]
    AccessibilityUnavailable(String),

    #[error("Native automation error: {0}")]
    Automation(String),
}

#[cfg(windows)]
impl From<windows::core::Error> for AppError {
    fn from(e: windows::core::Error) -> Self {
        AppError::Automation(e.message().to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
