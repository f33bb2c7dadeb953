use crate::error::{PlatenError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_FILE_EXT: &str = ".html";
const DEFAULT_LANDING_SLUG: &str = "blog";

/// Configuration for platen, stored next to the site file as config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatenConfig {
    /// File extension for compose buffers (e.g., ".html", ".md")
    #[serde(default = "default_file_ext")]
    pub file_ext: String,

    /// Slug of the page that lists posts and backstops missed addresses
    #[serde(default = "default_landing_slug")]
    pub landing_slug: String,
}

fn default_file_ext() -> String {
    DEFAULT_FILE_EXT.to_string()
}

fn default_landing_slug() -> String {
    DEFAULT_LANDING_SLUG.to_string()
}

impl Default for PlatenConfig {
    fn default() -> Self {
        Self {
            file_ext: DEFAULT_FILE_EXT.to_string(),
            landing_slug: DEFAULT_LANDING_SLUG.to_string(),
        }
    }
}

impl PlatenConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(PlatenError::Io)?;
        let config: PlatenConfig =
            serde_json::from_str(&content).map_err(PlatenError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        // Ensure directory exists
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(PlatenError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(PlatenError::Serialization)?;
        fs::write(config_path, content).map_err(PlatenError::Io)?;
        Ok(())
    }

    /// Get the compose file extension (always starts with a dot)
    pub fn get_file_ext(&self) -> &str {
        &self.file_ext
    }

    /// Set the compose file extension (normalizes to start with a dot)
    pub fn set_file_ext(&mut self, ext: &str) {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = PlatenConfig::default();
        assert_eq!(config.file_ext, ".html");
        assert_eq!(config.landing_slug, "blog");
    }

    #[test]
    fn test_set_file_ext_with_dot() {
        let mut config = PlatenConfig::default();
        config.set_file_ext(".md");
        assert_eq!(config.file_ext, ".md");
    }

    #[test]
    fn test_set_file_ext_without_dot() {
        let mut config = PlatenConfig::default();
        config.set_file_ext("md");
        assert_eq!(config.file_ext, ".md");
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = env::temp_dir().join("platen_test_config_missing");
        let _ = fs::remove_dir_all(&temp_dir);

        let config = PlatenConfig::load(&temp_dir).unwrap();
        assert_eq!(config, PlatenConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = env::temp_dir().join("platen_test_config_save");
        let _ = fs::remove_dir_all(&temp_dir);
        fs::create_dir_all(&temp_dir).unwrap();

        let mut config = PlatenConfig::default();
        config.landing_slug = "news".to_string();
        config.save(&temp_dir).unwrap();

        let loaded = PlatenConfig::load(&temp_dir).unwrap();
        assert_eq!(loaded.landing_slug, "news");

        // Cleanup
        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = PlatenConfig {
            file_ext: ".md".to_string(),
            landing_slug: "journal".to_string(),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: PlatenConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, parsed);
    }
}
