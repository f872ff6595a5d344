use crate::zones::FeatureFlags;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DRAG_THRESHOLD: f32 = 8.0;
const MIN_DRAG_THRESHOLD: f32 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SidebarConfig {
    #[serde(default = "default_true")]
    pub plugin_enabled: bool,
    #[serde(default = "default_true")]
    pub allow_pinning: bool,
    #[serde(default = "default_true")]
    pub allow_hiding: bool,
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f32,
    #[serde(default)]
    pub last_pos: Option<(f32, f32)>,
    #[serde(default)]
    pub last_size: Option<(f32, f32)>,
}

fn default_true() -> bool {
    true
}

fn default_drag_threshold() -> f32 {
    DEFAULT_DRAG_THRESHOLD
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            plugin_enabled: true,
            allow_pinning: true,
            allow_hiding: true,
            drag_threshold: default_drag_threshold(),
            last_pos: None,
            last_size: None,
        }
    }
}

impl SidebarConfig {
    pub const FILE_NAME: &'static str = "config.json";

    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "sidebar_nav", "sidebar_nav")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn load() -> Self {
        match Self::config_dir() {
            Some(dir) => Self::load_from(&dir.join(Self::FILE_NAME)),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::File::open(path) {
            Ok(file) => match serde_json::from_reader::<_, Self>(file) {
                Ok(config) => config.sanitized(),
                Err(err) => {
                    warn!("Failed to parse config ({err}), using default");
                    Self::default()
                }
            },
            Err(err) => {
                warn!("Failed to open config ({err}), using default");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(dir) = Self::config_dir() {
            self.save_to(&dir.join(Self::FILE_NAME));
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                warn!("Cannot create config directory {}", parent.display());
                return;
            }
        }
        match std::fs::File::create(path) {
            Ok(file) => {
                if let Err(err) = serde_json::to_writer_pretty(file, self) {
                    warn!("Failed to write config: {err}");
                }
            }
            Err(err) => warn!("Failed to create config file: {err}"),
        }
    }

    pub fn flags(&self) -> FeatureFlags {
        FeatureFlags::from_settings(self.plugin_enabled, self.allow_pinning, self.allow_hiding)
    }

    fn sanitized(mut self) -> Self {
        self.drag_threshold = sanitize_threshold(self.drag_threshold);
        self
    }
}

fn sanitize_threshold(value: f32) -> f32 {
    if !value.is_finite() {
        return DEFAULT_DRAG_THRESHOLD;
    }
    value.max(MIN_DRAG_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: SidebarConfig = serde_json::from_str(r#"{"allow_hiding": false}"#).unwrap();
        assert!(config.plugin_enabled);
        assert!(config.allow_pinning);
        assert!(!config.allow_hiding);
        assert_eq!(config.drag_threshold, DEFAULT_DRAG_THRESHOLD);
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SidebarConfig::FILE_NAME);
        let config = SidebarConfig {
            allow_pinning: false,
            drag_threshold: 12.0,
            last_size: Some((200.0, 500.0)),
            ..SidebarConfig::default()
        };
        config.save_to(&path);
        assert_eq!(SidebarConfig::load_from(&path), config);
    }

    #[test]
    fn tiny_threshold_is_clamped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SidebarConfig::FILE_NAME);
        std::fs::write(&path, r#"{"drag_threshold": 0.0}"#).unwrap();
        assert_eq!(SidebarConfig::load_from(&path).drag_threshold, MIN_DRAG_THRESHOLD);
    }

    #[test]
    fn unparseable_config_falls_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SidebarConfig::FILE_NAME);
        std::fs::write(&path, "[]").unwrap();
        assert_eq!(SidebarConfig::load_from(&path), SidebarConfig::default());
    }

    #[test]
    fn plugin_switch_disables_both_zones() {
        let config = SidebarConfig {
            plugin_enabled: false,
            ..SidebarConfig::default()
        };
        assert!(!config.flags().drag_allowed());
    }
}
