//! Persisted history, tab groups and settings.
//!
//! The whole configuration lives in one JSON file under the OS config
//! directory. Loading is forgiving (missing or corrupt files fall back to
//! defaults) and saving goes through a temporary sibling file so a crash
//! mid-write never leaves a truncated config behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::constants::limits::HISTORY_MAX;
use crate::constants::timing::DEFAULT_OPEN_TIMEOUT;
use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME, LINUX_APP_DIR_NAME};
use crate::error::{AppError, Result};
use crate::models::{
    AppConfig, HistoryEntry, TabGroup, WindowRect, SETTING_LANGUAGE, SETTING_TIMEOUT,
};
use crate::paths::{normalize_path, strip_quotes};

static NUMBERED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s+(\d+)$").expect("valid numbered-name pattern"));

/// OS-specific location of `config.json`.
pub fn config_path() -> Result<PathBuf> {
    if cfg!(any(target_os = "macos", target_os = "windows")) {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| AppError::Path("Could not determine config directory".to_string()))?;
        Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    } else {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Path("Could not determine home directory".to_string()))?;
        Ok(home
            .join(".config")
            .join(LINUX_APP_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }
}

pub struct ConfigManager {
    path: PathBuf,
    pub data: AppConfig,
}

impl ConfigManager {
    /// Manager bound to the default config location, not yet loaded.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(config_path()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            data: AppConfig::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load from disk. A missing or unreadable file leaves the defaults in place.
    pub fn load(&mut self) {
        if !self.path.exists() {
            log::debug!("Config file not found, using defaults: {}", self.path.display());
            return;
        }

        let parsed = fs::read_to_string(&self.path)
            .map_err(AppError::from)
            .and_then(|text| serde_json::from_str::<AppConfig>(&text).map_err(AppError::from));

        match parsed {
            Ok(data) => {
                log::debug!(
                    "Config loaded: {} history, {} tab groups",
                    data.history.len(),
                    data.tab_groups.len()
                );
                self.data = data;
            }
            Err(e) => {
                log::warn!("Config file is corrupt, using defaults: {}", e);
                self.data = AppConfig::default();
            }
        }
    }

    /// Write the config through a temporary file and rename it into place.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let text = serde_json::to_string_pretty(&self.data)?;
        let temp_path = self
            .path
            .with_extension(format!("json.tmp-{}", uuid::Uuid::new_v4()));

        let atomic = (|| -> Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(text.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp_path, &self.path)?;
            Ok(())
        })();

        if let Err(e) = atomic {
            log::warn!("Atomic rename failed ({}), falling back to direct write", e);
            let _ = fs::remove_file(&temp_path);
            fs::write(&self.path, text.as_bytes())?;
        }

        log::debug!("Config saved: {}", self.path.display());
        Ok(())
    }

    // ── Settings ────────────────────────────────────────────────────────────

    /// Per-batch timeout for opening tabs; bad or missing values mean 30 s.
    pub fn timeout(&self) -> Duration {
        self.data
            .settings
            .get(SETTING_TIMEOUT)
            .and_then(|v| v.as_f64())
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(DEFAULT_OPEN_TIMEOUT)
    }

    pub fn set_timeout(&mut self, secs: u64) {
        self.data
            .settings
            .insert(SETTING_TIMEOUT.to_string(), serde_json::Value::from(secs));
    }

    pub fn language(&self) -> Option<&str> {
        self.data
            .settings
            .get(SETTING_LANGUAGE)
            .and_then(|v| v.as_str())
    }

    pub fn set_language(&mut self, code: &str) {
        self.data.settings.insert(
            SETTING_LANGUAGE.to_string(),
            serde_json::Value::from(code),
        );
    }

    // ── History ─────────────────────────────────────────────────────────────

    /// Record a use of `path`: touch an existing entry or append a new one.
    pub fn add_history(&mut self, path: &str) {
        let normalized = normalize_path(strip_quotes(path.trim()));
        if let Some(entry) = self
            .data
            .history
            .iter_mut()
            .find(|e| normalize_path(&e.path) == normalized)
        {
            entry.touch();
            log::debug!("History updated (existing): {}", normalized);
            return;
        }

        let mut entry = HistoryEntry::new(normalized.clone());
        entry.touch();
        self.data.history.push(entry);
        self.trim_history();
        log::debug!("History added (new): {}", normalized);
    }

    pub fn remove_history(&mut self, path: &str) {
        let normalized = normalize_path(path);
        self.data
            .history
            .retain(|e| normalize_path(&e.path) != normalized);
    }

    pub fn clear_history(&mut self, keep_pinned: bool) {
        let before = self.data.history.len();
        if keep_pinned {
            self.data.history.retain(|e| e.pinned);
        } else {
            self.data.history.clear();
        }
        log::info!(
            "History cleared: {} -> {} entries (keep_pinned={})",
            before,
            self.data.history.len(),
            keep_pinned
        );
    }

    /// Flip the pin on `path`. Returns the new state, or `None` if unknown.
    pub fn toggle_pin(&mut self, path: &str) -> Option<bool> {
        let normalized = normalize_path(path);
        let entry = self
            .data
            .history
            .iter_mut()
            .find(|e| normalize_path(&e.path) == normalized)?;
        entry.pinned = !entry.pinned;
        log::debug!("Pin toggled: {} -> pinned={}", normalized, entry.pinned);
        Some(entry.pinned)
    }

    /// Pinned entries first, each group most recently used first.
    pub fn sorted_history(&self) -> Vec<&HistoryEntry> {
        let mut pinned: Vec<_> = self.data.history.iter().filter(|e| e.pinned).collect();
        let mut unpinned: Vec<_> = self.data.history.iter().filter(|e| !e.pinned).collect();
        pinned.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        unpinned.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        pinned.extend(unpinned);
        pinned
    }

    fn trim_history(&mut self) {
        if self.data.history.len() <= HISTORY_MAX {
            return;
        }
        let (pinned, mut unpinned): (Vec<_>, Vec<_>) =
            self.data.history.drain(..).partition(|e| e.pinned);
        let keep = HISTORY_MAX.saturating_sub(pinned.len());
        unpinned.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        unpinned.truncate(keep);
        self.data.history = pinned;
        self.data.history.extend(unpinned);
    }

    // ── Tab groups ──────────────────────────────────────────────────────────

    pub fn tab_group(&self, name: &str) -> Option<&TabGroup> {
        self.data.tab_groups.iter().find(|g| g.name == name)
    }

    fn tab_group_mut(&mut self, name: &str) -> Result<&mut TabGroup> {
        self.data
            .tab_groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| AppError::TabGroupNotFound {
                name: name.to_string(),
            })
    }

    /// Create an empty group. Empty or duplicate names are rejected.
    pub fn add_tab_group(&mut self, name: &str) -> Result<&TabGroup> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidInput {
                message: "Tab group name cannot be empty".to_string(),
            });
        }
        if self.tab_group(name).is_some() {
            return Err(AppError::InvalidInput {
                message: format!("Tab group already exists: {}", name),
            });
        }
        self.data.tab_groups.push(TabGroup::new(name));
        log::info!("Tab group added: {}", name);
        Ok(&self.data.tab_groups[self.data.tab_groups.len() - 1])
    }

    pub fn delete_tab_group(&mut self, name: &str) {
        self.data.tab_groups.retain(|g| g.name != name);
        log::info!("Tab group deleted: {}", name);
    }

    pub fn rename_tab_group(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        if new_name.trim().is_empty() {
            return Err(AppError::InvalidInput {
                message: "Tab group name cannot be empty".to_string(),
            });
        }
        if old_name != new_name && self.tab_group(new_name).is_some() {
            return Err(AppError::InvalidInput {
                message: format!("Tab group already exists: {}", new_name),
            });
        }
        self.tab_group_mut(old_name)?.name = new_name.to_string();
        log::info!("Tab group renamed: {} -> {}", old_name, new_name);
        Ok(())
    }

    /// Duplicate a group as `"<base> N"`, where `<base>` drops any trailing
    /// number and N is the first free suffix starting at 1.
    pub fn copy_tab_group(&mut self, name: &str) -> Result<&TabGroup> {
        let source = self
            .tab_group(name)
            .cloned()
            .ok_or_else(|| AppError::TabGroupNotFound {
                name: name.to_string(),
            })?;

        let base = NUMBERED_NAME
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map_or(name, |m| m.as_str())
            .to_string();

        let mut suffix = 1;
        while self.tab_group(&format!("{} {}", base, suffix)).is_some() {
            suffix += 1;
        }

        let copy = TabGroup {
            name: format!("{} {}", base, suffix),
            ..source
        };
        log::info!(
            "Tab group copied: {} -> {} ({} paths)",
            name,
            copy.name,
            copy.paths.len()
        );
        self.data.tab_groups.push(copy);
        Ok(&self.data.tab_groups[self.data.tab_groups.len() - 1])
    }

    pub fn move_tab_group(&mut self, old_index: usize, new_index: usize) {
        move_item(&mut self.data.tab_groups, old_index, new_index);
    }

    pub fn add_path_to_group(&mut self, group_name: &str, path: &str) -> Result<()> {
        let normalized = normalize_path(path);
        self.tab_group_mut(group_name)?.paths.push(normalized.clone());
        log::debug!("Path added to group '{}': {}", group_name, normalized);
        Ok(())
    }

    /// Remove the path at `index`, returning it. Out-of-range indexes are a no-op.
    pub fn remove_path_from_group(
        &mut self,
        group_name: &str,
        index: usize,
    ) -> Result<Option<String>> {
        let group = self.tab_group_mut(group_name)?;
        if index >= group.paths.len() {
            return Ok(None);
        }
        let removed = group.paths.remove(index);
        log::debug!("Path removed from group '{}': [{}] {}", group_name, index, removed);
        Ok(Some(removed))
    }

    pub fn move_path_in_group(
        &mut self,
        group_name: &str,
        old_index: usize,
        new_index: usize,
    ) -> Result<()> {
        move_item(&mut self.tab_group_mut(group_name)?.paths, old_index, new_index);
        Ok(())
    }

    /// Store a window rect on a group, clamped to the minimum window size.
    pub fn set_group_window_rect(
        &mut self,
        group_name: &str,
        rect: Option<WindowRect>,
    ) -> Result<()> {
        self.tab_group_mut(group_name)?
            .set_window_rect(rect.map(WindowRect::clamped));
        Ok(())
    }
}

fn move_item<T>(items: &mut Vec<T>, old_index: usize, new_index: usize) {
    if old_index < items.len() && new_index < items.len() {
        let item = items.remove(old_index);
        items.insert(new_index, item);
    }
}
