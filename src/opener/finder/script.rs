//! AppleScript generation for Finder.
//!
//! Every builder is a pure function of its arguments, so the same input
//! always yields byte-identical script text.

use std::fmt::Write;
use std::time::Duration;

use crate::models::WindowRect;

/// Keystroke that asks Finder for a new tab in the front window.
pub const NEW_TAB_KEYSTROKE: &str = r#"keystroke "t" using command down"#;

pub const FRONT_WINDOW_BOUNDS_SCRIPT: &str =
    r#"tell application "Finder" to get bounds of front Finder window"#;

/// How long the script keeps retrying `set target` after a new tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetTargetRetry {
    pub max_attempts: u32,
    pub delay: Duration,
}

/// Quote-safe form of `value` for an AppleScript string literal.
///
/// AppleScript strings cannot hold a literal line break, so CR and LF are
/// removed outright.
pub fn escape_applescript(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .fold(String::with_capacity(value.len()), |mut out, c| {
            if c == '\\' || c == '"' {
                out.push('\\');
            }
            out.push(c);
            out
        })
}

/// `{left, top, right, bottom}` as Finder's `bounds` property expects.
pub fn bounds_literal(rect: WindowRect) -> String {
    format!("{{{}, {}, {}, {}}}", rect.x, rect.y, rect.right(), rect.bottom())
}

fn push_new_window(script: &mut String, path: &str, window_rect: Option<WindowRect>) {
    script.push_str("tell application \"Finder\"\n");
    script.push_str("  activate\n");
    let _ = writeln!(
        script,
        "  make new Finder window to POSIX file \"{}\" as alias",
        escape_applescript(path)
    );
    if let Some(rect) = window_rect {
        let _ = writeln!(
            script,
            "  set bounds of front Finder window to {}",
            bounds_literal(rect)
        );
    }
    script.push_str("end tell");
}

/// Script that opens `path` in a brand-new Finder window.
///
/// `open` would reuse a window already showing the folder, so the window is
/// created explicitly.
pub fn build_open_window_script(path: &str, window_rect: Option<WindowRect>) -> String {
    let mut script = String::new();
    push_new_window(&mut script, path, window_rect);
    script
}

/// Script that opens `paths` as tabs of one new Finder window.
///
/// After each ⌘T the script retries `set target` until Finder accepts it,
/// so fast machines move on immediately and slow ones wait at most
/// `max_attempts × delay`. A single path produces only the window block.
pub fn build_tabs_script(
    paths: &[String],
    window_rect: Option<WindowRect>,
    retry: SetTargetRetry,
) -> String {
    let Some((first, rest)) = paths.split_first() else {
        return String::new();
    };

    let mut script = build_open_window_script(first, window_rect);
    if rest.is_empty() {
        return script;
    }

    let delay = retry.delay.as_secs_f64();
    for path in rest {
        let escaped = escape_applescript(path);
        script.push_str("\n\ntell application \"System Events\"\n");
        script.push_str("  tell process \"Finder\"\n");
        let _ = writeln!(script, "    {}", NEW_TAB_KEYSTROKE);
        script.push_str("  end tell\n");
        script.push_str("end tell\n\n");
        let _ = writeln!(script, "repeat {} times", retry.max_attempts);
        script.push_str("  try\n");
        script.push_str("    tell application \"Finder\"\n");
        let _ = writeln!(
            script,
            "      set target of front Finder window to POSIX file \"{}\" as alias",
            escaped
        );
        script.push_str("    end tell\n");
        script.push_str("    exit repeat\n");
        script.push_str("  on error\n");
        let _ = writeln!(script, "    delay {}", delay);
        script.push_str("  end try\n");
        script.push_str("end repeat");
    }
    script
}

/// Parse `get bounds` output (`"x1, y1, x2, y2"`) into a rect.
pub fn parse_bounds(output: &str) -> Option<WindowRect> {
    let parts: Vec<i32> = output
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .split(',')
        .map(|s| s.trim().parse::<i32>())
        .collect::<Result<_, _>>()
        .ok()?;

    match parts.as_slice() {
        [left, top, right, bottom] => Some(WindowRect::from_corners(*left, *top, *right, *bottom)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RETRY: SetTargetRetry = SetTargetRetry {
        max_attempts: 30,
        delay: Duration::from_millis(100),
    };

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// AppleScript's own reading of a string literal body.
    fn unescape_applescript(literal: &str) -> String {
        let mut out = String::new();
        let mut chars = literal.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    fn literal_after<'s>(script: &'s str, prefix: &str) -> &'s str {
        let start = script.find(prefix).unwrap() + prefix.len();
        let rest = &script[start..];
        let mut escaped = false;
        for (i, c) in rest.char_indices() {
            match c {
                '\\' if !escaped => escaped = true,
                '"' if !escaped => return &rest[..i],
                _ => escaped = false,
            }
        }
        panic!("unterminated literal");
    }

    #[test]
    fn test_generation_is_deterministic() {
        let paths = strings(&["/Users/me/a", "/Users/me/b", "/Users/me/c"]);
        let rect = Some(WindowRect::new(1, 2, 600, 400));
        assert_eq!(
            build_tabs_script(&paths, rect, RETRY),
            build_tabs_script(&paths, rect, RETRY)
        );
    }

    #[test]
    fn test_single_path_has_no_tab_section() {
        let script = build_tabs_script(&strings(&["/tmp"]), None, RETRY);
        assert!(!script.contains(NEW_TAB_KEYSTROKE));
        assert!(!script.contains("repeat"));
        assert!(!script.contains("System Events"));
        assert_eq!(script, build_open_window_script("/tmp", None));
    }

    #[test]
    fn test_keystroke_count_matches_extra_paths() {
        for n in 2..6 {
            let paths: Vec<String> = (0..n).map(|i| format!("/tmp/{}", i)).collect();
            let script = build_tabs_script(&paths, None, RETRY);
            assert_eq!(script.matches(NEW_TAB_KEYSTROKE).count(), n - 1);
            assert_eq!(script.matches("repeat 30 times").count(), n - 1);
        }
    }

    #[test]
    fn test_retry_block_shape() {
        let script = build_tabs_script(&strings(&["/a", "/b"]), None, RETRY);
        assert!(script.contains(
            "      set target of front Finder window to POSIX file \"/b\" as alias\n"
        ));
        assert!(script.contains("    delay 0.1\n"));
        assert!(script.contains("    exit repeat\n"));
    }

    #[test]
    fn test_escaping_round_trip() {
        let original = r#"/Users/me/odd "quoted" \ dir"#;
        let script = build_open_window_script(original, None);
        let literal = literal_after(&script, "POSIX file \"");
        assert_eq!(unescape_applescript(literal), original);
    }

    #[test]
    fn test_escaping_strips_line_breaks() {
        assert_eq!(escape_applescript("/a\nb\r\nc"), "/abc");
        assert_eq!(escape_applescript(r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[test]
    fn test_bounds_are_corner_coordinates() {
        let script = build_open_window_script("/tmp", Some(WindowRect::new(100, 200, 800, 600)));
        assert!(script.contains("set bounds of front Finder window to {100, 200, 900, 800}"));
    }

    #[test]
    fn test_rect_only_in_window_block() {
        let script = build_tabs_script(
            &strings(&["/a", "/b"]),
            Some(WindowRect::new(0, 0, 600, 400)),
            RETRY,
        );
        assert_eq!(script.matches("set bounds").count(), 1);
    }

    #[test]
    fn test_parse_bounds() {
        assert_eq!(
            parse_bounds("100, 200, 900, 800\n"),
            Some(WindowRect::new(100, 200, 800, 600))
        );
        assert_eq!(
            parse_bounds("{-10, 0, 518, 308}"),
            Some(WindowRect::new(-10, 0, 528, 308))
        );
        assert_eq!(parse_bounds("1, 2, 3"), None);
        assert_eq!(parse_bounds("error"), None);
        assert_eq!(parse_bounds(""), None);
    }

    #[test]
    fn test_parse_bounds_with_extreme_values() {
        let rect = parse_bounds("-2147483648, 0, 2147483647, 10").unwrap();
        assert_eq!(rect.x, i32::MIN);
        assert_eq!(rect.width, i32::MAX);
    }

    #[test]
    fn test_empty_paths_give_empty_script() {
        assert!(build_tabs_script(&[], None, RETRY).is_empty());
    }
}
