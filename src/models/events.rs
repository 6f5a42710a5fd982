/// One path finished opening. `current` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub current: usize,
    pub total: usize,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Generic,
    /// macOS refused System Events keystrokes; the user has to grant the
    /// app Accessibility access.
    AccessibilityRequired,
}

/// A path that could not be opened, or a failed tier reported against the
/// first path of its batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    pub path: String,
    pub message: String,
    pub kind: ErrorKind,
}
