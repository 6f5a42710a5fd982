//! Dictionary-based localisation.
//!
//! The openers never render text themselves; they ask for strings by key
//! (for example the canned remediation shown when macOS denies
//! Accessibility access).

use parking_lot::RwLock;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Ja,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ja];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ja => "日本語",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "en" => Some(Language::En),
            "ja" => Some(Language::Ja),
            _ => None,
        }
    }
}

/// key, English, Japanese
const STRINGS: &[(&str, &str, &str)] = &[
    ("app.title", "File Tab Opener", "File Tab Opener"),
    (
        "error.accessibility_required",
        "Finder tabs could not be created because Accessibility access is not granted.\nOpen System Settings > Privacy & Security > Accessibility, allow this app (or your terminal), then try again.\nThe folders were opened as separate windows instead.",
        "アクセシビリティが許可されていないため、Finder のタブを作成できませんでした。\nシステム設定 > プライバシーとセキュリティ > アクセシビリティ でこのアプリ（またはターミナル）を許可してから、もう一度お試しください。\n代わりにフォルダを別々のウインドウで開きました。",
    ),
    ("error.title", "Error", "エラー"),
    (
        "error.open_failed",
        "Failed to open:\n{path}\n\n{error}",
        "開けませんでした:\n{path}\n\n{error}",
    ),
    ("error.invalid_paths_title", "Invalid Paths", "無効なパス"),
    (
        "error.invalid_paths_msg",
        "The following paths will be skipped:\n{paths}",
        "以下のパスはスキップされます:\n{paths}",
    ),
    (
        "error.unsupported_platform",
        "Opening folders is only supported on macOS and Windows.",
        "フォルダを開く機能は macOS と Windows でのみ利用できます。",
    ),
    (
        "status.do_not_touch",
        "Opening tabs... Please do not touch the keyboard or mouse.",
        "タブを開いています… キーボードやマウスに触れないでください。",
    ),
    ("status.progress", "[{current}/{total}] {path}", "[{current}/{total}] {path}"),
    ("status.done", "Done.", "完了しました。"),
    ("tab.no_tab_msg", "Tab group not found: {name}", "タブグループが見つかりません: {name}"),
    (
        "tab.no_paths_msg",
        "No folders are registered in this tab.",
        "このタブにフォルダが登録されていません。",
    ),
    (
        "tab.duplicate_msg",
        "A tab with this name already exists.",
        "同じ名前のタブが既に存在します。",
    ),
    ("path.invalid_title", "Invalid Path", "無効なパス"),
    (
        "path.invalid_msg",
        "Folder does not exist:\n{path}",
        "フォルダが存在しません:\n{path}",
    ),
    (
        "window.no_window_msg",
        "No Finder or Explorer window is open.",
        "Finder / Explorer のウインドウが開いていません。",
    ),
    ("history.empty", "History is empty.", "履歴はありません。"),
];

static CURRENT_LANGUAGE: LazyLock<RwLock<Language>> =
    LazyLock::new(|| RwLock::new(Language::default()));

pub fn set_language(language: Language) {
    *CURRENT_LANGUAGE.write() = language;
    log::info!("Language set to: {}", language.code());
}

/// Set the language from a code, falling back to English for unknown codes.
pub fn set_language_code(code: &str) {
    match Language::from_code(code) {
        Some(language) => set_language(language),
        None => {
            log::warn!("Unsupported language: {}, falling back to en", code);
            set_language(Language::En);
        }
    }
}

pub fn language() -> Language {
    *CURRENT_LANGUAGE.read()
}

/// Best match for the system locale, read from `LC_ALL`, `LC_MESSAGES`
/// and `LANG` in that order.
pub fn detect_system_language() -> Language {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .map(|value| language_for_locale(&value))
        .unwrap_or_default()
}

fn language_for_locale(locale: &str) -> Language {
    if locale.to_lowercase().starts_with("ja") {
        Language::Ja
    } else {
        Language::En
    }
}

pub fn init() {
    set_language(detect_system_language());
}

pub fn t(key: &str) -> String {
    t_with(key, &[])
}

/// Translate `key`, replacing `{name}` placeholders from `args`.
/// Unknown keys come back unchanged.
pub fn t_with(key: &str, args: &[(&str, &str)]) -> String {
    translate(language(), key, args)
}

fn translate(language: Language, key: &str, args: &[(&str, &str)]) -> String {
    let Some((_, en, ja)) = STRINGS.iter().find(|(k, _, _)| *k == key) else {
        log::warn!("Missing i18n key: {}", key);
        return key.to_string();
    };

    let template = match language {
        Language::En => en,
        Language::Ja if ja.is_empty() => en,
        Language::Ja => ja,
    };

    args.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{}}}", name), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_both_languages() {
        assert_eq!(translate(Language::En, "error.title", &[]), "Error");
        assert_eq!(translate(Language::Ja, "error.title", &[]), "エラー");
    }

    #[test]
    fn test_placeholders_are_replaced() {
        let text = translate(
            Language::En,
            "error.open_failed",
            &[("path", "/tmp/x"), ("error", "boom")],
        );
        assert_eq!(text, "Failed to open:\n/tmp/x\n\nboom");
    }

    #[test]
    fn test_unknown_key_returns_key() {
        assert_eq!(translate(Language::Ja, "no.such.key", &[]), "no.such.key");
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("JA"), Some(Language::Ja));
        assert_eq!(Language::from_code("fr"), None);
        for language in Language::ALL {
            assert_eq!(Language::from_code(language.code()), Some(language));
        }
    }

    #[test]
    fn test_locale_detection() {
        assert_eq!(language_for_locale("ja_JP.UTF-8"), Language::Ja);
        assert_eq!(language_for_locale("en_US.UTF-8"), Language::En);
        assert_eq!(language_for_locale("C"), Language::En);
    }

    #[test]
    fn test_every_key_has_both_languages() {
        for (key, en, ja) in STRINGS {
            assert!(!en.is_empty(), "{} has no English text", key);
            assert!(!ja.is_empty(), "{} has no Japanese text", key);
        }
    }
}
