//! Configuration management (config.toml in the platform config directory)
//!
//! Settings are stored as TOML. Every field has a default, so a missing file
//! or a partial one is never an error for [`load`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::runtime::RuntimeConfig;

const CONFIG_FILE: &str = "config.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Window settings
    #[serde(default)]
    pub window: WindowConfig,
    /// Which module to load
    #[serde(default)]
    pub module: ModuleConfig,
    /// Per-instance limits
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Window configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title (default: "fcsim")
    #[serde(default = "default_title")]
    pub title: String,
    /// Initial inner width in logical pixels (default: 800)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Initial inner height in logical pixels (default: 600)
    #[serde(default = "default_height")]
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Path to the compiled module (default: "fcsim.wasm")
    #[serde(default = "default_module_path")]
    pub path: PathBuf,
}

fn default_title() -> String {
    "fcsim".to_string()
}
fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}
fn default_module_path() -> PathBuf {
    PathBuf::from("fcsim.wasm")
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            path: default_module_path(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\fcsim\config`
/// On macOS: `~/Library/Application Support/org.fcsim.fcsim`
/// On Linux: `~/.config/fcsim`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("org.fcsim", "", "fcsim")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration from the platform config directory.
///
/// Returns defaults if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_dir().map(|dir| dir.join(CONFIG_FILE)) else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    load_from(&path).unwrap_or_else(|e| {
        tracing::warn!("Ignoring config at {}: {:#}", path.display(), e);
        Config::default()
    })
}

/// Loads the configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Saves the configuration to the platform config directory.
///
/// Creates the directory if it doesn't exist. Does nothing when no config
/// directory can be determined.
pub fn save(config: &Config) -> Result<()> {
    if let Some(dir) = config_dir() {
        save_to(config, &dir.join(CONFIG_FILE))?;
    }
    Ok(())
}

/// Writes the configuration as pretty TOML to `path`.
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================================
    // Defaults
    // =============================================================

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.window.title, "fcsim");
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!(config.module.path, PathBuf::from("fcsim.wasm"));
        assert_eq!(config.runtime, RuntimeConfig::default());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_deserialize_partial_sections() {
        let toml_str = r#"
[window]
width = 1024

[runtime]
min_timer_interval_ms = 16
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600); // default
        assert_eq!(config.runtime.min_timer_interval_ms, 16);
        assert_eq!(
            config.runtime.ram_limit,
            RuntimeConfig::default().ram_limit
        );
    }

    #[test]
    fn test_window_config_serialize() {
        let window = WindowConfig {
            title: "designs".to_string(),
            width: 640,
            height: 480,
        };
        let toml_str = toml::to_string(&window).unwrap();
        assert!(toml_str.contains("title = \"designs\""));
        assert!(toml_str.contains("width = 640"));
    }

    // =============================================================
    // Files
    // =============================================================

    #[test]
    fn test_save_then_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = Config::default();
        config.module.path = PathBuf::from("build/fcsim.wasm");
        config.runtime.diagnostic_history = 8;
        save_to(&config, &path).unwrap();

        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join(CONFIG_FILE)).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }

    #[test]
    fn test_load_from_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[window\nwidth = ").unwrap();

        let err = load_from(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse"));
    }

    #[test]
    fn test_load_returns_valid_config() {
        // Reads whatever is on this machine, or defaults
        let config = load();
        assert!(config.runtime.diagnostic_history > 0 || config.runtime.ram_limit > 0);
    }
}
