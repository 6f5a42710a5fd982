use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_VERSION, DEFAULT_WINDOW_GEOMETRY};
use crate::models::WindowRect;

pub const SETTING_LANGUAGE: &str = "language";
pub const SETTING_TIMEOUT: &str = "timeout";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    pub path: String,
    pub pinned: bool,
    pub last_used: String,
    pub use_count: u32,
}

impl HistoryEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Refresh the last-used timestamp and bump the use count.
    pub fn touch(&mut self) {
        self.last_used = chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();
        self.use_count += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TabGroup {
    pub name: String,
    #[serde(alias = "folders")]
    pub paths: Vec<String>,
    pub window_x: Option<i32>,
    pub window_y: Option<i32>,
    pub window_width: Option<i32>,
    pub window_height: Option<i32>,
}

impl TabGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The saved window rect, only when all four values are present.
    pub fn window_rect(&self) -> Option<WindowRect> {
        Some(WindowRect::new(
            self.window_x?,
            self.window_y?,
            self.window_width?,
            self.window_height?,
        ))
    }

    pub fn set_window_rect(&mut self, rect: Option<WindowRect>) {
        self.window_x = rect.map(|r| r.x);
        self.window_y = rect.map(|r| r.y);
        self.window_width = rect.map(|r| r.width);
        self.window_height = rect.map(|r| r.height);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub config_version: u32,
    pub history: Vec<HistoryEntry>,
    pub tab_groups: Vec<TabGroup>,
    pub window_geometry: String,
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION,
            history: Vec::new(),
            tab_groups: Vec::new(),
            window_geometry: DEFAULT_WINDOW_GEOMETRY.to_string(),
            settings: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_rect_requires_all_fields() {
        let mut group = TabGroup::new("work");
        group.window_x = Some(10);
        group.window_y = Some(20);
        group.window_width = Some(800);
        assert_eq!(group.window_rect(), None);

        group.window_height = Some(600);
        assert_eq!(group.window_rect(), Some(WindowRect::new(10, 20, 800, 600)));
    }

    #[test]
    fn test_folders_alias_and_missing_keys() {
        let json = r#"{"name": "legacy", "folders": ["/tmp/a", "/tmp/b"]}"#;
        let group: TabGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.paths, vec!["/tmp/a", "/tmp/b"]);
        assert_eq!(group.window_x, None);
    }

    #[test]
    fn test_touch_updates_usage() {
        let mut entry = HistoryEntry::new("/tmp");
        entry.touch();
        entry.touch();
        assert_eq!(entry.use_count, 2);
        assert_eq!(entry.last_used.len(), "2024-01-01T00:00:00".len());
    }

    #[test]
    fn test_app_config_defaults_for_empty_object() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.window_geometry, "800x600");
    }
}
