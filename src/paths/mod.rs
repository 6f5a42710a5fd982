//! Path helpers shared by the openers and the configuration store.
//!
//! Everything here is a pure function over strings, except [`validate_paths`],
//! which asks the filesystem whether each candidate is a directory.
//!
//! # UNC paths
//!
//! Network shares (`\\server\share`, or `//server/share`) are never
//! existence-checked. Reaching a share may need credentials that only the
//! native shell knows how to prompt for, so a local `is_dir` call reports
//! valid-but-unauthenticated shares as missing.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Whether `path` names a network share (`\\host\share`, either separator).
pub fn is_unc_path(path: &str) -> bool {
    let mut chars = path.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), Some(host)) => is_separator(a) && is_separator(b) && !is_separator(host),
        _ => false,
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> String {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(is_separator) => rest,
        _ => return path.to_string(),
    };

    match dirs::home_dir() {
        Some(home) => {
            let trimmed = rest.trim_start_matches(is_separator);
            if trimmed.is_empty() {
                home.to_string_lossy().into_owned()
            } else {
                home.join(trimmed).to_string_lossy().into_owned()
            }
        }
        None => path.to_string(),
    }
}

/// Lexically normalise a path: collapse repeated separators, drop `.` and
/// resolve `..` against preceding components. Uses the platform separator.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if is_unc_path(path) {
        return if cfg!(windows) {
            path.replace('/', "\\")
        } else {
            path.to_string()
        };
    }

    let mut out = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        ".".to_string()
    } else {
        out.to_string_lossy().into_owned()
    }
}

/// Drop repeated paths, keeping the first occurrence of each in order.
pub fn dedup_paths(paths: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .filter(|p| seen.insert(p.as_str()))
        .cloned()
        .collect()
}

/// Strip one pair of matching surrounding quotes, as left behind by
/// "Copy as path" in Explorer or shell quoting.
pub fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Split `paths` into openable and non-openable, preserving input order.
///
/// Valid entries come back home-expanded; invalid ones are returned exactly
/// as given so they can be shown to the user.
pub fn validate_paths(paths: &[String]) -> (Vec<String>, Vec<String>) {
    validate_paths_with(paths, |p| p.is_dir())
}

/// [`validate_paths`] with an injectable directory check.
pub fn validate_paths_with<F>(paths: &[String], is_dir: F) -> (Vec<String>, Vec<String>)
where
    F: Fn(&Path) -> bool,
{
    let mut valid = Vec::new();
    let mut invalid = Vec::new();

    for path in paths {
        let expanded = expand_home(path);
        if is_unc_path(&expanded) || is_dir(Path::new(&expanded)) {
            valid.push(expanded);
        } else {
            log::debug!("Invalid path: {}", path);
            invalid.push(path.clone());
        }
    }

    (valid, invalid)
}
