use crate::constants::ACCESSIBILITY_KEYWORDS;
use crate::i18n;
use crate::models::{ErrorEvent, ErrorKind, ProgressEvent};

type ProgressFn<'a> = Box<dyn FnMut(&ProgressEvent) + 'a>;
type ErrorFn<'a> = Box<dyn FnMut(&ErrorEvent) + 'a>;

/// Optional progress and error callbacks for one batch.
///
/// The caller decides where events go (a UI thread, a channel, a Vec in a
/// test); the openers only ever call [`Reporter::progress`] and
/// [`Reporter::error`].
#[derive(Default)]
pub struct Reporter<'a> {
    on_progress: Option<ProgressFn<'a>>,
    on_error: Option<ErrorFn<'a>>,
}

impl<'a> Reporter<'a> {
    /// A reporter that drops every event.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn on_progress(mut self, f: impl FnMut(&ProgressEvent) + 'a) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnMut(&ErrorEvent) + 'a) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn progress(&mut self, current: usize, total: usize, path: &str) {
        if let Some(f) = self.on_progress.as_mut() {
            f(&ProgressEvent {
                current,
                total,
                path: path.to_string(),
            });
        }
    }

    /// Report a per-path failure with its raw message.
    pub fn error(&mut self, path: &str, message: &str) {
        self.emit(ErrorEvent {
            path: path.to_string(),
            message: message.to_string(),
            kind: ErrorKind::Generic,
        });
    }

    /// Report a whole-tier failure against `path` (the batch's first path).
    /// Accessibility denials are replaced by the localised remediation text.
    pub fn tier_failed(&mut self, path: &str, raw_message: &str) {
        let kind = classify_error(raw_message);
        let message = match kind {
            ErrorKind::AccessibilityRequired => i18n::t("error.accessibility_required"),
            ErrorKind::Generic => raw_message.to_string(),
        };
        self.emit(ErrorEvent {
            path: path.to_string(),
            message,
            kind,
        });
    }

    fn emit(&mut self, event: ErrorEvent) {
        if let Some(f) = self.on_error.as_mut() {
            f(&event);
        }
    }
}

/// Recognise the "not allowed assistive access" family of macOS errors in
/// any supported locale.
pub fn classify_error(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    if ACCESSIBILITY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        ErrorKind::AccessibilityRequired
    } else {
        ErrorKind::Generic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_locale() {
        for message in [
            "System Events got an error: osascript is not allowed ASSISTIVE access. (-1719)",
            "osascript にはアクセシビリティ機能へのアクセスが許可されていません",
            "osascript 不允许辅助功能访问",
            "osascript에 보조 접근이 허용되지 않습니다",
        ] {
            assert_eq!(classify_error(message), ErrorKind::AccessibilityRequired);
        }
        assert_eq!(
            classify_error("Finder got an error: Can't get folder"),
            ErrorKind::Generic
        );
    }

    #[test]
    fn test_tier_failure_substitutes_remediation() {
        let mut events = Vec::new();
        {
            let mut reporter = Reporter::silent().on_error(|e| events.push(e.clone()));
            reporter.tier_failed("/a", "execution error: not allowed assistive access");
            reporter.tier_failed("/a", "some other failure");
        }
        assert_eq!(events[0].kind, ErrorKind::AccessibilityRequired);
        assert_eq!(events[0].message, i18n::t("error.accessibility_required"));
        assert_ne!(events[0].message, "execution error: not allowed assistive access");
        assert_eq!(events[1].kind, ErrorKind::Generic);
        assert_eq!(events[1].message, "some other failure");
    }

    #[test]
    fn test_silent_reporter_ignores_events() {
        let mut reporter = Reporter::silent();
        reporter.progress(1, 1, "/a");
        reporter.error("/a", "boom");
    }
}
